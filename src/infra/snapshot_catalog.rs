use crate::app::ports::{CatalogPort, InstalledAppsPort};
use crate::error::{CatalogError, Result};
use crate::types::{Catalog, CategoryInfo, ComposeApp};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategoryDefinition {
    pub font: Option<String>,
    pub description: Option<String>,
}

/// On-disk catalog snapshot
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSnapshot {
    pub apps: Catalog,
    pub recommended: Vec<String>,
    pub categories: BTreeMap<String, CategoryDefinition>,
    pub installed: Vec<ComposeApp>,
}

impl CatalogSnapshot {
    /// Category definitions with their member counts taken from `apps`.
    pub fn category_infos(&self) -> BTreeMap<String, CategoryInfo> {
        self.categories
            .iter()
            .map(|(name, definition)| {
                let wanted = name.to_lowercase();
                let count = self
                    .apps
                    .values()
                    .filter_map(|app| app.store_info(false).ok())
                    .filter(|info| info.category.to_lowercase() == wanted)
                    .count();
                let info = CategoryInfo {
                    id: None,
                    name: name.clone(),
                    font: definition.font.clone(),
                    description: definition.description.clone(),
                    count: Some(count),
                };
                (name.clone(), info)
            })
            .collect()
    }
}

/// Catalog, categories, recommendations and installed apps read from a JSON
/// or YAML file. The file is re-read on every call.
pub struct SnapshotCatalog {
    path: PathBuf,
}

impl SnapshotCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read_snapshot(&self) -> Result<CatalogSnapshot> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CatalogError::Upstream(format!(
                "failed to read catalog snapshot {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let is_yaml = matches!(
            self.path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        let snapshot: CatalogSnapshot = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| {
                CatalogError::Upstream(format!("failed to parse {}: {}", self.path.display(), e))
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| {
                CatalogError::Upstream(format!("failed to parse {}: {}", self.path.display(), e))
            })?
        };

        debug!(
            path = %self.path.display(),
            apps = snapshot.apps.len(),
            installed = snapshot.installed.len(),
            "read catalog snapshot"
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl CatalogPort for SnapshotCatalog {
    async fn catalog(&self) -> Result<Catalog> {
        Ok(self.read_snapshot().await?.apps)
    }

    async fn recommended(&self) -> Result<Vec<String>> {
        Ok(self.read_snapshot().await?.recommended)
    }

    async fn categories(&self) -> Result<BTreeMap<String, CategoryInfo>> {
        Ok(self.read_snapshot().await?.category_infos())
    }
}

#[async_trait]
impl InstalledAppsPort for SnapshotCatalog {
    async fn list_installed(&self) -> Result<Vec<ComposeApp>> {
        Ok(self.read_snapshot().await?.installed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SNAPSHOT_YAML: &str = r#"
apps:
  jellyfin:
    name: jellyfin
    services:
      jellyfin:
        image: jellyfin/jellyfin
    x-casaos:
      store_app_id: jellyfin
      category: Media
      author: Jellyfin
      developer: Jellyfin
  plex:
    name: plex
    x-casaos:
      store_app_id: plex
      category: media
      author: someone
      developer: Plex
  syncthing:
    name: syncthing
    x-casaos:
      store_app_id: syncthing
      category: Backup
recommended: [plex]
categories:
  Media:
    font: play
    description: Movies and music
  Backup:
    font: backup
  Games: {}
installed:
  - name: jellyfin
    x-casaos:
      store_app_id: jellyfin
"#;

    fn write_snapshot(extension: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(extension).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_reads_yaml_snapshot() {
        let file = write_snapshot(".yaml", SNAPSHOT_YAML);
        let source = SnapshotCatalog::new(file.path());

        let catalog = source.catalog().await.unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(source.recommended().await.unwrap(), vec!["plex".to_string()]);
        assert_eq!(source.list_installed().await.unwrap().len(), 1);
        assert!(source.compose_app("plex").await.unwrap().is_some());
        assert!(source.compose_app("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_category_counts_follow_catalog() {
        let file = write_snapshot(".yml", SNAPSHOT_YAML);
        let categories = SnapshotCatalog::new(file.path()).categories().await.unwrap();

        assert_eq!(categories["Media"].count, Some(2));
        assert_eq!(categories["Media"].font.as_deref(), Some("play"));
        assert_eq!(categories["Backup"].count, Some(1));
        assert_eq!(categories["Games"].count, Some(0));
    }

    #[tokio::test]
    async fn test_reads_json_snapshot() {
        let file = write_snapshot(
            ".json",
            r#"{ "apps": { "a": { "name": "a" } }, "recommended": ["a"] }"#,
        );
        let source = SnapshotCatalog::new(file.path());
        assert_eq!(source.catalog().await.unwrap().len(), 1);
        assert!(source.list_installed().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_upstream_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = SnapshotCatalog::new(dir.path().join("catalog.json"));
        assert!(matches!(source.catalog().await, Err(CatalogError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_malformed_snapshot_is_upstream_failure() {
        let file = write_snapshot(".json", "{ not json");
        let source = SnapshotCatalog::new(file.path());
        assert!(matches!(source.categories().await, Err(CatalogError::Upstream(_))));
    }
}
