// src/fetch/sheets.rs

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{AccessTokenProvider, FetchError, GridSource, SheetRef};
use crate::sheet::Grid;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Values-range response body. Only `values` matters here, and the API
/// omits the key entirely for an empty range.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Live spreadsheet-API source: one authorized GET per sheet reference.
pub struct SheetsClient {
    client: Client,
    tokens: Arc<dyn AccessTokenProvider>,
    base_url: Url,
}

impl SheetsClient {
    pub fn new(client: Client, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            client,
            tokens,
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL should parse"),
        }
    }

    /// Point the client at a different endpoint root. Must be an http(s)
    /// URL; used by tests and proxies.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    fn values_url(&self, sheet: &SheetRef) -> Url {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .expect("base URL should accept path segments")
            .pop_if_empty()
            .push(&sheet.spreadsheet_id)
            .push("values")
            .push(&sheet.tab);
        url.set_query(Some("alt=json"));
        url
    }
}

#[async_trait]
impl GridSource for SheetsClient {
    async fn fetch_grid(&self, sheet: &SheetRef) -> Result<Grid, FetchError> {
        let token = self.tokens.access_token().await?;
        let url = self.values_url(sheet);
        debug!(tab = %sheet.tab, %url, "fetching grid");

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body: ValueRange = response.json().await.map_err(|error| FetchError::Body {
            url: url.to_string(),
            reason: error.to_string(),
        })?;

        let grid = Grid::from_values(body.values);
        debug!(tab = %sheet.tab, rows = grid.rows.len(), "grid fetched");
        Ok(grid)
    }
}
