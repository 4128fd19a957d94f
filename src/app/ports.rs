use crate::error::Result;
use crate::types::{AppStoreSource, Catalog, CategoryInfo, ComposeApp};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Source of the merged catalog and the data derived from it.
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Fresh snapshot of every compose app across the registered app stores.
    async fn catalog(&self) -> Result<Catalog>;

    /// Store app ids designated as recommended.
    async fn recommended(&self) -> Result<Vec<String>>;

    /// Categories keyed by name.
    async fn categories(&self) -> Result<BTreeMap<String, CategoryInfo>>;

    async fn compose_app(&self, store_app_id: &str) -> Result<Option<ComposeApp>> {
        Ok(self.catalog().await?.remove(store_app_id))
    }
}

/// Compose apps currently deployed on the host.
#[async_trait]
pub trait InstalledAppsPort: Send + Sync {
    async fn list_installed(&self) -> Result<Vec<ComposeApp>>;
}

/// Persistence and validation of app store sources.
#[async_trait]
pub trait AppStoreLoaderPort: Send + Sync {
    /// Sources persisted from earlier runs, in registration order.
    async fn load_sources(&self) -> Result<Vec<AppStoreSource>>;

    /// Check that `url` serves an app store and persist it. May take a long
    /// time; callers run it in the background.
    async fn validate_and_persist(&self, url: &str) -> Result<AppStoreSource>;

    async fn remove(&self, source: &AppStoreSource) -> Result<()>;
}
