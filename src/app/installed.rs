use crate::metrics::CatalogMetrics;
use crate::types::ComposeApp;
use std::collections::BTreeSet;
use tracing::error;

/// Store app ids of the installed compose apps. Apps whose store info cannot
/// be read, or that carry no store app id, are left out.
pub fn installed_store_app_ids(installed: &[ComposeApp]) -> BTreeSet<String> {
    installed
        .iter()
        .filter_map(|compose_app| match compose_app.store_info(false) {
            Ok(info) => {
                if info.store_app_id.is_none() {
                    error!(name = %compose_app.name, "failed to get store info - nil value");
                }
                info.store_app_id
            }
            Err(e) => {
                CatalogMetrics::record_store_info_failure();
                error!(name = %compose_app.name, error = %e, "failed to get store info");
                None
            }
        })
        .collect()
}
