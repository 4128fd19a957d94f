use crate::constants::{CASAOS_TEAM_AUTHOR, COMPOSE_EXTENSION_KEY};
use crate::error::{CatalogError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Merged catalog keyed by store app id, as of one fetch
pub type Catalog = BTreeMap<String, ComposeApp>;

/// A registered app store. `id` is its position in the registry list and is
/// reassigned every time the list is read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppStoreSource {
    #[serde(default)]
    pub id: usize,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<DateTime<Utc>>,
}

impl AppStoreSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: 0,
            url: url.into(),
            store_path: None,
            registered_at: Some(Utc::now()),
        }
    }

    /// URLs identify app stores case-insensitively.
    pub fn matches_url(&self, url: &str) -> bool {
        self.url.to_lowercase() == url.to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorType {
    Official,
    ByCasaos,
    Community,
    Unknown,
}

impl AuthorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorType::Official => "official",
            AuthorType::ByCasaos => "by_casaos",
            AuthorType::Community => "community",
            AuthorType::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AuthorType::Unknown)
    }
}

impl FromStr for AuthorType {
    type Err = Infallible;

    /// Exact match on the lower-cased tag; anything else is `Unknown`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "official" => AuthorType::Official,
            "by_casaos" => AuthorType::ByCasaos,
            "community" => AuthorType::Community,
            _ => AuthorType::Unknown,
        })
    }
}

impl fmt::Display for AuthorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive metadata of a compose app, read from its `x-casaos` extension.
/// Extension keys without a dedicated field are kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(default)]
    pub title: BTreeMap<String, String>,
    #[serde(default)]
    pub tagline: BTreeMap<String, String>,
    #[serde(default)]
    pub description: BTreeMap<String, String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub developer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apps: Option<BTreeMap<String, Value>>,
    /// Derived from `author` and `developer` when projected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_type: Option<AuthorType>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl StoreInfo {
    pub fn derive_author_type(&self) -> AuthorType {
        let author = self.author.to_lowercase();
        if author == self.developer.to_lowercase() {
            AuthorType::Official
        } else if author == CASAOS_TEAM_AUTHOR.to_lowercase() {
            AuthorType::ByCasaos
        } else {
            AuthorType::Community
        }
    }
}

/// A multi-service deployment definition. Top-level keys other than `name`,
/// `services` and the store extension are carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComposeApp {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub services: BTreeMap<String, Value>,
    #[serde(rename = "x-casaos", default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<Value>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl ComposeApp {
    /// Project the store metadata. With `include_apps`, the per-service
    /// extensions are collected under `apps`.
    pub fn store_info(&self, include_apps: bool) -> Result<StoreInfo> {
        let extension = self.extension.as_ref().ok_or_else(|| {
            CatalogError::StoreInfo(format!(
                "compose app `{}` has no {} extension",
                self.name, COMPOSE_EXTENSION_KEY
            ))
        })?;

        let mut info: StoreInfo = serde_json::from_value(extension.clone())
            .map_err(|e| CatalogError::StoreInfo(format!("compose app `{}`: {}", self.name, e)))?;

        info.author_type = Some(info.derive_author_type());
        info.apps = if include_apps {
            Some(
                self.services
                    .iter()
                    .filter_map(|(name, service)| {
                        service
                            .get(COMPOSE_EXTENSION_KEY)
                            .map(|ext| (name.clone(), ext.clone()))
                    })
                    .collect(),
            )
        } else {
            None
        };

        Ok(info)
    }

    pub fn author_type(&self) -> AuthorType {
        self.store_info(false)
            .map(|info| info.derive_author_type())
            .unwrap_or(AuthorType::Unknown)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<usize>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compose(extension: Option<Value>) -> ComposeApp {
        let mut services = BTreeMap::new();
        services.insert(
            "jellyfin".to_string(),
            json!({ "image": "jellyfin/jellyfin", "x-casaos": { "ports": [] } }),
        );
        services.insert("sidecar".to_string(), json!({ "image": "busybox" }));
        ComposeApp {
            name: "jellyfin".to_string(),
            services,
            extension,
            other: BTreeMap::new(),
        }
    }

    #[test]
    fn test_author_type_from_str() {
        assert_eq!("Official".parse::<AuthorType>().unwrap(), AuthorType::Official);
        assert_eq!("BY_CASAOS".parse::<AuthorType>().unwrap(), AuthorType::ByCasaos);
        assert_eq!("community".parse::<AuthorType>().unwrap(), AuthorType::Community);
        assert_eq!("offic".parse::<AuthorType>().unwrap(), AuthorType::Unknown);
        assert_eq!("".parse::<AuthorType>().unwrap(), AuthorType::Unknown);
        assert!(!AuthorType::Unknown.is_known());
    }

    #[test]
    fn test_store_info_projection() {
        let app = compose(Some(json!({
            "store_app_id": "jellyfin",
            "category": "Media",
            "author": "CasaOS Team",
            "developer": "Jellyfin",
            "title": { "en_us": "Jellyfin" }
        })));

        let info = app.store_info(false).unwrap();
        assert_eq!(info.store_app_id.as_deref(), Some("jellyfin"));
        assert_eq!(info.category, "Media");
        assert!(info.apps.is_none());

        let with_apps = app.store_info(true).unwrap();
        let apps = with_apps.apps.unwrap();
        assert_eq!(apps.len(), 1);
        assert!(apps.contains_key("jellyfin"));
    }

    #[test]
    fn test_store_info_keeps_extension_keys_and_author_type() {
        let app = compose(Some(json!({
            "store_app_id": "jellyfin",
            "category": "Media",
            "author": "Jellyfin",
            "developer": "Jellyfin",
            "architectures": ["amd64", "arm64"],
            "port_map": "8096",
            "scheme": "http",
            "index": "/",
            "screenshot_link": ["https://example.com/1.png"],
        })));

        let info = app.store_info(true).unwrap();
        assert_eq!(info.author_type, Some(AuthorType::Official));
        assert_eq!(info.extra["architectures"], json!(["amd64", "arm64"]));
        assert_eq!(info.extra["port_map"], json!("8096"));
        assert!(!info.extra.contains_key("category"));

        let rendered = serde_json::to_value(&info).unwrap();
        assert_eq!(rendered["author_type"], "official");
        assert_eq!(rendered["scheme"], "http");
        assert_eq!(rendered["index"], "/");
        assert_eq!(rendered["screenshot_link"][0], "https://example.com/1.png");
    }

    #[test]
    fn test_store_info_fails_without_extension() {
        let app = compose(None);
        assert!(matches!(app.store_info(false), Err(CatalogError::StoreInfo(_))));
        assert_eq!(app.author_type(), AuthorType::Unknown);
    }

    #[test]
    fn test_store_info_fails_on_malformed_extension() {
        let app = compose(Some(json!({ "category": 42 })));
        assert!(app.store_info(true).is_err());
    }

    #[test]
    fn test_author_type_derivation() {
        let official = compose(Some(json!({ "author": "Jellyfin", "developer": "jellyfin" })));
        assert_eq!(official.author_type(), AuthorType::Official);

        let by_casaos = compose(Some(json!({ "author": "casaos team", "developer": "Jellyfin" })));
        assert_eq!(by_casaos.author_type(), AuthorType::ByCasaos);

        let community = compose(Some(json!({ "author": "someone", "developer": "Jellyfin" })));
        assert_eq!(community.author_type(), AuthorType::Community);
    }

    #[test]
    fn test_compose_app_keeps_unknown_top_level_keys() {
        let app: ComposeApp = serde_yaml::from_str(
            "name: demo\nservices:\n  web:\n    image: nginx\nnetworks:\n  default: {}\n",
        )
        .unwrap();
        assert!(app.other.contains_key("networks"));
        let yaml = serde_yaml::to_string(&app).unwrap();
        assert!(yaml.contains("networks"));
    }
}
