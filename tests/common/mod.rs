#![allow(dead_code)]

use appstore_catalog::app::ports::{AppStoreLoaderPort, CatalogPort, InstalledAppsPort};
use appstore_catalog::error::{CatalogError, Result};
use appstore_catalog::types::{AppStoreSource, Catalog, CategoryInfo, ComposeApp};
use async_trait::async_trait;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

/// Loader fake: accepts every URL unless listed in `rejected`, optionally
/// after a delay.
#[derive(Default)]
pub struct FakeLoader {
    pub rejected: Vec<String>,
    pub delay: Option<Duration>,
    pub fail_remove: bool,
    pub persisted: Mutex<Vec<String>>,
    pub removed: Mutex<Vec<String>>,
}

#[async_trait]
impl AppStoreLoaderPort for FakeLoader {
    async fn load_sources(&self) -> Result<Vec<AppStoreSource>> {
        Ok(self
            .persisted
            .lock()
            .unwrap()
            .iter()
            .map(|url| AppStoreSource::new(url.clone()))
            .collect())
    }

    async fn validate_and_persist(&self, url: &str) -> Result<AppStoreSource> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.rejected.iter().any(|r| r.eq_ignore_ascii_case(url)) {
            return Err(CatalogError::NotAnAppStore(url.to_string()));
        }
        self.persisted.lock().unwrap().push(url.to_string());
        Ok(AppStoreSource::new(url))
    }

    async fn remove(&self, source: &AppStoreSource) -> Result<()> {
        if self.fail_remove {
            return Err(CatalogError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )));
        }
        self.removed.lock().unwrap().push(source.url.clone());
        Ok(())
    }
}

/// Catalog fake backed by in-memory data.
#[derive(Default)]
pub struct FakeCatalog {
    pub apps: Catalog,
    pub recommended: Option<Vec<String>>,
    pub categories: BTreeMap<String, CategoryInfo>,
    pub fail_catalog: bool,
    pub installed: Option<Vec<ComposeApp>>,
}

#[async_trait]
impl CatalogPort for FakeCatalog {
    async fn catalog(&self) -> Result<Catalog> {
        if self.fail_catalog {
            return Err(CatalogError::Upstream("catalog unavailable".to_string()));
        }
        Ok(self.apps.clone())
    }

    async fn recommended(&self) -> Result<Vec<String>> {
        self.recommended
            .clone()
            .ok_or_else(|| CatalogError::Upstream("recommend list unavailable".to_string()))
    }

    async fn categories(&self) -> Result<BTreeMap<String, CategoryInfo>> {
        if self.fail_catalog {
            return Err(CatalogError::Upstream("category source unavailable".to_string()));
        }
        Ok(self.categories.clone())
    }
}

#[async_trait]
impl InstalledAppsPort for FakeCatalog {
    async fn list_installed(&self) -> Result<Vec<ComposeApp>> {
        self.installed
            .clone()
            .ok_or_else(|| CatalogError::Upstream("docker daemon unreachable".to_string()))
    }
}

pub fn compose_app(store_app_id: &str, category: &str, author: &str, developer: &str) -> ComposeApp {
    let mut services = BTreeMap::new();
    services.insert(
        store_app_id.to_string(),
        json!({ "image": format!("example/{store_app_id}"), "x-casaos": { "envs": [] } }),
    );
    ComposeApp {
        name: store_app_id.to_string(),
        services,
        extension: Some(json!({
            "store_app_id": store_app_id,
            "category": category,
            "author": author,
            "developer": developer,
            "title": { "en_us": store_app_id },
        })),
        other: BTreeMap::new(),
    }
}

/// `x` is official Media, `y` community Media, `z` by CasaOS Utilities,
/// `broken` carries no store info.
pub fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert("x".into(), compose_app("x", "Media", "Jellyfin", "Jellyfin"));
    catalog.insert("y".into(), compose_app("y", "Media", "someone", "Plex"));
    catalog.insert("z".into(), compose_app("z", "Utilities", "CasaOS Team", "Syncthing"));
    catalog.insert(
        "broken".into(),
        ComposeApp {
            name: "broken".into(),
            ..ComposeApp::default()
        },
    );
    catalog
}

pub fn category(name: &str, count: Option<usize>) -> CategoryInfo {
    CategoryInfo {
        id: None,
        name: name.to_string(),
        font: Some("folder".to_string()),
        description: None,
        count,
    }
}

pub fn sample_fake_catalog() -> FakeCatalog {
    let mut categories = BTreeMap::new();
    categories.insert("B".to_string(), category("B", Some(3)));
    categories.insert("A".to_string(), category("A", Some(2)));

    FakeCatalog {
        apps: sample_catalog(),
        recommended: Some(vec!["y".to_string(), "z".to_string()]),
        categories,
        fail_catalog: false,
        installed: Some(vec![
            compose_app("x", "Media", "Jellyfin", "Jellyfin"),
            ComposeApp {
                name: "hand-written".into(),
                ..ComposeApp::default()
            },
        ]),
    }
}
