//! Book Catalog
//!
//! A personal library catalog: books with metadata and pricing, a checkout
//! ledger kept in lockstep with each book's availability, and simple statistics
//! over the collection. Data lives in flat JSON files and is driven from a text REPL.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;
pub mod repl;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared by the REPL and any other front end
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Open the configured data files and build every service on top of them
    pub fn open(config: AppConfig) -> AppResult<Self> {
        let repository = repository::Repository::open(&config.storage)?;
        let services = services::Services::new(repository, config.analytics.clone());
        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }
}
