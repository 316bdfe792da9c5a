// src/fetch/mod.rs

pub mod sheets;
pub mod token;

pub use sheets::SheetsClient;
pub use token::{AccessTokenProvider, RefreshTokenSource, StaticToken};

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::sheet::Grid;

/// One spreadsheet tab to pull.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetRef {
    pub spreadsheet_id: String,
    pub tab: String,
}

impl SheetRef {
    pub fn new(spreadsheet_id: impl Into<String>, tab: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            tab: tab.into(),
        }
    }
}

/// Transport-layer failures. Everything past the fetch is total, so this
/// is the only error type the pipeline surfaces.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("token exchange failed: {0}")]
    Token(String),
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("unexpected response body from {url}: {reason}")]
    Body { url: String, reason: String },
}

/// Anything that can produce a raw grid for a sheet reference.
///
/// The pipeline only ever sees this trait; live HTTP, fixtures and
/// fallback composition all live behind it.
#[async_trait]
pub trait GridSource: Send + Sync {
    async fn fetch_grid(&self, sheet: &SheetRef) -> Result<Grid, FetchError>;
}

/// Fixed in-memory grids keyed by tab name, for development fallbacks and
/// tests. Unknown tabs resolve to an empty grid.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    grids: HashMap<String, Grid>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grid(mut self, tab: impl Into<String>, grid: Grid) -> Self {
        self.grids.insert(tab.into(), grid);
        self
    }
}

#[async_trait]
impl GridSource for FixtureSource {
    async fn fetch_grid(&self, sheet: &SheetRef) -> Result<Grid, FetchError> {
        Ok(self.grids.get(&sheet.tab).cloned().unwrap_or_default())
    }
}

/// Tries the primary source and falls back to a secondary on any fetch
/// error.
///
/// Substituting data on failure is a caller decision; composing this at
/// the boundary keeps the sources themselves single-purpose.
#[derive(Debug, Clone)]
pub struct FallbackSource<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackSource<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl<P: GridSource, F: GridSource> GridSource for FallbackSource<P, F> {
    async fn fetch_grid(&self, sheet: &SheetRef) -> Result<Grid, FetchError> {
        match self.primary.fetch_grid(sheet).await {
            Ok(grid) => Ok(grid),
            Err(error) => {
                warn!(tab = %sheet.tab, %error, "primary source failed, using fallback");
                self.fallback.fetch_grid(sheet).await
            }
        }
    }
}
