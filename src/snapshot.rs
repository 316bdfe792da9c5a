//! One immutable snapshot of every dataset, loaded in a single pass.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::SourcesConfig;
use crate::fetch::{FetchError, GridSource};
use crate::model::{NewClientRecord, SaleRecord, SessionRecord};
use crate::sheet::tables::{scan_tables, LogicalTable};
use crate::sheet::Grid;

/// Everything derived from one load: normalized records per dataset plus
/// the recovered cancellation tables.
///
/// Snapshots are immutable; when inputs change, callers load a fresh one
/// and swap it in whole. Nothing ever patches an existing snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct StudioSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub sales: Vec<SaleRecord>,
    pub sessions: Vec<SessionRecord>,
    pub cancellations: Vec<LogicalTable>,
    pub new_clients: Vec<NewClientRecord>,
}

impl StudioSnapshot {
    /// Fetch all four sources concurrently and derive every collection.
    ///
    /// The first fetch error aborts the whole load and the remaining
    /// fetches are dropped, so a partially-received snapshot can never be
    /// observed.
    pub async fn load(
        source: &dyn GridSource,
        sources: &SourcesConfig,
    ) -> Result<Self, FetchError> {
        let (sales, sessions, cancellations, clients) = futures::try_join!(
            source.fetch_grid(&sources.sales),
            source.fetch_grid(&sources.sessions),
            source.fetch_grid(&sources.late_cancellations),
            source.fetch_grid(&sources.new_clients),
        )?;

        Ok(Self::from_grids(&sales, &sessions, &cancellations, &clients))
    }

    /// Pure derivation step, separated out so fixtures can exercise the
    /// whole pipeline without any source at all.
    pub fn from_grids(
        sales: &Grid,
        sessions: &Grid,
        cancellations: &Grid,
        new_clients: &Grid,
    ) -> Self {
        let snapshot = Self {
            fetched_at: Utc::now(),
            sales: SaleRecord::from_grid(sales),
            sessions: SessionRecord::from_grid(sessions),
            cancellations: scan_tables(cancellations),
            new_clients: NewClientRecord::from_grid(new_clients),
        };
        info!(
            sales = snapshot.sales.len(),
            sessions = snapshot.sessions.len(),
            cancellation_tables = snapshot.cancellations.len(),
            new_clients = snapshot.new_clients.len(),
            "snapshot loaded"
        );
        snapshot
    }
}
