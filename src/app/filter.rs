//! Catalog filter pipeline.
//!
//! Each filter only narrows the catalog, so their relative order does not
//! change the result. `apply_filters` runs them as category, author type,
//! then recommendation membership.

use crate::app::ports::CatalogPort;
use crate::error::Result;
use crate::metrics::CatalogMetrics;
use crate::types::{AuthorType, Catalog};
use serde::{de, Deserialize, Deserializer};
use tracing::{debug, error, warn};

/// Query parameters of a catalog listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub author_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub recommend: Option<bool>,
}

/// Boolean query flag. Accepts `1`, `t`, `true` and `0`, `f`, `false` in the
/// usual casings.
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match raw.as_str() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(Some(true)),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(Some(false)),
        other => Err(de::Error::invalid_value(
            de::Unexpected::Str(other),
            &"a boolean flag",
        )),
    }
}

/// Keep entries whose category matches case-insensitively. An empty category
/// keeps everything; entries without readable store info are dropped.
pub fn filter_by_category(mut catalog: Catalog, category: &str) -> Catalog {
    if category.is_empty() {
        return catalog;
    }

    let wanted = category.to_lowercase();
    catalog.retain(|store_app_id, compose_app| match compose_app.store_info(true) {
        Ok(info) => info.category.to_lowercase() == wanted,
        Err(e) => {
            debug!(store_app_id = %store_app_id, error = %e, "excluding app from category filter");
            false
        }
    });
    catalog
}

/// Keep entries of the requested author type. An author type outside the
/// known set matches nothing.
pub fn filter_by_author_type(mut catalog: Catalog, author_type: &str) -> Catalog {
    let wanted = author_type
        .parse::<AuthorType>()
        .unwrap_or(AuthorType::Unknown);

    if !wanted.is_known() {
        CatalogMetrics::record_unknown_author_type();
        warn!(author_type, "unknown author type - returning empty catalog");
        return Catalog::new();
    }

    catalog.retain(|_, compose_app| compose_app.author_type() == wanted);
    catalog
}

/// Keep entries whose store app id is listed in `store_app_ids`.
pub fn filter_by_store_app_ids(mut catalog: Catalog, store_app_ids: &[String]) -> Catalog {
    catalog.retain(|store_app_id, _| store_app_ids.iter().any(|id| id == store_app_id));
    catalog
}

/// Run every filter present in `query`. Failing to fetch the recommended list
/// fails the whole query.
pub async fn apply_filters(
    catalog: Catalog,
    query: &CatalogQuery,
    source: &dyn CatalogPort,
) -> Result<Catalog> {
    let mut catalog = catalog;

    if let Some(category) = &query.category {
        catalog = filter_by_category(catalog, category);
    }

    if let Some(author_type) = &query.author_type {
        catalog = filter_by_author_type(catalog, author_type);
    }

    if query.recommend.unwrap_or(false) {
        let recommended = source.recommended().await.map_err(|e| {
            error!(error = %e, "failed to get recommend list");
            e
        })?;
        catalog = filter_by_store_app_ids(catalog, &recommended);
    }

    Ok(catalog)
}
