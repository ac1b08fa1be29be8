//! Business logic services

pub mod analytics;
pub mod catalog;
pub mod checkouts;

use crate::{config::AnalyticsConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub checkouts: checkouts::CheckoutService,
    pub analytics: analytics::AnalyticsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, analytics_config: AnalyticsConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            checkouts: checkouts::CheckoutService::new(repository),
            analytics: analytics::AnalyticsService::new(analytics_config),
        }
    }
}
