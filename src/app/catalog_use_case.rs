use crate::app::categories::aggregate_categories;
use crate::app::filter::{apply_filters, CatalogQuery};
use crate::app::installed::installed_store_app_ids;
use crate::app::ports::{CatalogPort, InstalledAppsPort};
use crate::app::representation::{select_representation, ComposeAppRepresentation};
use crate::constants::MSG_APP_NOT_FOUND;
use crate::error::{CatalogError, Result};
use crate::metrics::CatalogMetrics;
use crate::types::{CategoryInfo, ComposeApp, StoreInfo};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::error;

/// Filtered catalog listing. `installed` is absent when the installed apps
/// could not be listed; `message` then says why.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreInfoListing {
    pub list: BTreeMap<String, StoreInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed: Option<BTreeSet<String>>,
    #[serde(skip)]
    pub message: Option<String>,
}

/// Read-side queries over the catalog. Every call works on a fresh snapshot.
pub struct CatalogService {
    catalog: Arc<dyn CatalogPort>,
    installed: Arc<dyn InstalledAppsPort>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogPort>, installed: Arc<dyn InstalledAppsPort>) -> Self {
        Self { catalog, installed }
    }

    pub async fn store_info_list(&self, query: &CatalogQuery) -> Result<StoreInfoListing> {
        let catalog = self.catalog.catalog().await.map_err(|e| {
            error!(error = %e, "failed to get catalog");
            e
        })?;

        let filtered = apply_filters(catalog, query, self.catalog.as_ref()).await?;

        let list: BTreeMap<String, StoreInfo> = filtered
            .iter()
            .map(|(store_app_id, compose_app)| {
                let info = compose_app.store_info(true).unwrap_or_else(|e| {
                    CatalogMetrics::record_store_info_failure();
                    error!(store_app_id = %store_app_id, error = %e, "failed to get store info");
                    StoreInfo::default()
                });
                (store_app_id.clone(), info)
            })
            .collect();

        CatalogMetrics::record_list_query(list.len());

        match self.installed.list_installed().await {
            Ok(installed) => Ok(StoreInfoListing {
                list,
                installed: Some(installed_store_app_ids(&installed)),
                message: None,
            }),
            Err(e) => {
                error!(error = %e, "failed to list installed compose apps");
                Ok(StoreInfoListing {
                    list,
                    installed: None,
                    message: Some(e.to_string()),
                })
            }
        }
    }

    pub async fn compose_app(&self, store_app_id: &str) -> Result<ComposeApp> {
        self.catalog
            .compose_app(store_app_id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(MSG_APP_NOT_FOUND.to_string()))
    }

    pub async fn store_info(&self, store_app_id: &str) -> Result<StoreInfo> {
        self.compose_app(store_app_id).await?.store_info(true)
    }

    pub async fn compose_app_representation(
        &self,
        store_app_id: &str,
        accept: Option<&str>,
    ) -> Result<ComposeAppRepresentation> {
        let compose_app = self.compose_app(store_app_id).await?;
        select_representation(&compose_app, accept)
    }

    pub async fn categories(&self) -> Result<Vec<CategoryInfo>> {
        let source = self.catalog.categories().await?;
        CatalogMetrics::record_category_query();
        Ok(aggregate_categories(source))
    }
}
