//! YAML configuration: OAuth credentials and the four source sheets.
//!
//! Credentials never live in source; they come from a config file whose
//! path the binary takes from the environment.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::fetch::SheetRef;

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct OauthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

/// Where each of the four datasets lives.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    pub sales: SheetRef,
    pub sessions: SheetRef,
    pub late_cancellations: SheetRef,
    pub new_clients: SheetRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub oauth: OauthConfig,
    pub sources: SourcesConfig,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}
