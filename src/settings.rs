use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

pub const DEFAULT_SOURCE_URL: &str = "https://en.wikipedia.org/wiki/ISO_3166-1_alpha-2";
pub const DEFAULT_TABLE_SELECTOR: &str = "table.wikitable.sortable.sort-under";
pub const DEFAULT_FLAG_EXTENSION: &str = "png";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const ENV_PREFIX: &str = "FLAGS";

/// Runtime settings, read from `FLAGS_*` environment variables over defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub source_url: String,
    /// Parse this saved HTML file instead of fetching `source_url`.
    pub source_file: Option<PathBuf>,
    pub table_selector: String,
    pub flag_extension: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_env(Environment::with_prefix(ENV_PREFIX))
    }

    pub fn from_env(env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("source_url", DEFAULT_SOURCE_URL)?
            .set_default("table_selector", DEFAULT_TABLE_SELECTOR)?
            .set_default("flag_extension", DEFAULT_FLAG_EXTENSION)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("user_agent", default_user_agent())?
            .add_source(env.try_parsing(true))
            .build()
            .context("Failed to read FLAGS_* settings")?;

        settings.try_deserialize().context("Invalid FLAGS_* settings")
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
