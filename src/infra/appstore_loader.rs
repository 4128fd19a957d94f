use crate::app::ports::AppStoreLoaderPort;
use crate::error::{CatalogError, Result};
use crate::types::AppStoreSource;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Validates app store URLs over HTTP and keeps the registered sources in a
/// JSON file.
pub struct HttpAppStoreLoader {
    client: reqwest::Client,
    sources_file: PathBuf,
    default_url: String,
    file_lock: Mutex<()>,
}

impl HttpAppStoreLoader {
    pub fn new(sources_file: impl Into<PathBuf>, default_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            sources_file: sources_file.into(),
            default_url: default_url.into(),
            file_lock: Mutex::new(()),
        }
    }

    pub fn sources_file(&self) -> &Path {
        &self.sources_file
    }

    async fn read_sources(&self) -> Result<Vec<AppStoreSource>> {
        match tokio::fs::read(&self.sources_file).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_sources(&self, sources: &[AppStoreSource]) -> Result<()> {
        if let Some(parent) = self.sources_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(sources)?;
        tokio::fs::write(&self.sources_file, bytes).await?;
        debug!(path = %self.sources_file.display(), count = sources.len(), "persisted app stores");
        Ok(())
    }

    async fn check_reachable(&self, url: &str) -> Result<()> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::NotAnAppStore(format!("{url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::NotAnAppStore(format!(
                "{url}: HTTP {}",
                status.as_u16()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl AppStoreLoaderPort for HttpAppStoreLoader {
    async fn load_sources(&self) -> Result<Vec<AppStoreSource>> {
        let _guard = self.file_lock.lock().await;
        let sources = self.read_sources().await?;
        if !sources.is_empty() {
            return Ok(sources);
        }

        info!(url = %self.default_url, "no app store registered yet - using the default one");
        let seeded = vec![AppStoreSource::new(self.default_url.clone())];
        self.write_sources(&seeded).await?;
        Ok(seeded)
    }

    async fn validate_and_persist(&self, url: &str) -> Result<AppStoreSource> {
        self.check_reachable(url).await?;

        let _guard = self.file_lock.lock().await;
        let mut sources = self.read_sources().await?;
        if let Some(existing) = sources.iter().find(|s| s.matches_url(url)) {
            return Ok(existing.clone());
        }

        let source = AppStoreSource::new(url);
        sources.push(source.clone());
        self.write_sources(&sources).await?;
        Ok(source)
    }

    async fn remove(&self, source: &AppStoreSource) -> Result<()> {
        let _guard = self.file_lock.lock().await;
        let mut sources = self.read_sources().await?;
        sources.retain(|s| !s.matches_url(&source.url));
        self.write_sources(&sources).await
    }
}
