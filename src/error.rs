use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("cannot unregister the last app store - need at least one app store")]
    LastAppStore,

    #[error("not an app store: {0}")]
    NotAnAppStore(String),

    #[error("upstream fetch failed: {0}")]
    Upstream(String),

    #[error("failed to get store info: {0}")]
    StoreInfo(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Errors caused by the caller's input rather than by this service or its
    /// collaborators.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CatalogError::InvalidInput(_)
                | CatalogError::NotFound(_)
                | CatalogError::LastAppStore
                | CatalogError::NotAnAppStore(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
