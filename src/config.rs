//! Configuration management for the book catalog

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::{env, path::PathBuf};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub books_path: PathBuf,
    pub checkouts_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Log file; stderr when unset
    pub file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Minimum number of ratings a book needs to appear in the top list
    pub min_ratings: u64,
    pub top_limit: usize,
    pub value_score_limit: usize,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables, with
    /// `extra_file` layered on top of the default files when given.
    pub fn load_from(extra_file: Option<&str>) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(File::with_name(path));
        }

        let config = builder
            // Environment variables, e.g. BOOK_CATALOG_STORAGE__BOOKS_PATH
            .add_source(
                Environment::with_prefix("BOOK_CATALOG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            books_path: PathBuf::from("books.json"),
            checkouts_path: PathBuf::from("checkout_history.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            min_ratings: 1000,
            top_limit: 10,
            value_score_limit: 10,
        }
    }
}
