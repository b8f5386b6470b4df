use std::path::PathBuf;

use anyhow::Context;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::books_repository::ValidationMode;

const ENV_PREFIX: &str = "BOOK_CATALOG";

/// Service settings, read from defaults, an optional `book_catalog` config file
/// and finally the environment. Environment keys carry the `BOOK_CATALOG_` prefix
/// (`BOOK_CATALOG_HOST`, `BOOK_CATALOG_DATA_PATH`, ...), except the listening
/// port which is plain `PORT`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// JSON file holding the whole collection
    pub data_path: PathBuf,
    pub validation_mode: ValidationMode,
    /// Keeps books in memory only, nothing survives a restart
    pub use_in_memory_db: bool,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_sources(prefixed_environment(), std::env::var("PORT").ok())
    }

    fn from_sources(environment: Environment, port: Option<String>) -> anyhow::Result<Self> {
        defaults()?
            .add_source(File::with_name("book_catalog").required(false))
            .add_source(environment)
            .set_override_option("port", port)?
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }
}

fn prefixed_environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}

fn defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
    Ok(config::Config::builder()
        .set_default("host", "0.0.0.0")?
        .set_default("port", 3000)?
        .set_default("data_path", "data.json")?
        .set_default("validation_mode", "presence")?
        .set_default("use_in_memory_db", false)?)
}
