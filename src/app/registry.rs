//! Registry of app store sources.
//!
//! The list is the only mutable shared state of the catalog service. Reads take
//! a consistent snapshot; every mutation goes through the single writer lock so
//! an index-based unregister can never race a registration that shifts indices.
//! The registry never drops below one source.

use crate::app::ports::AppStoreLoaderPort;
use crate::constants::{app_store_not_found_message, MSG_APPSTORE_URL_REQUIRED};
use crate::error::{CatalogError, Result};
use crate::metrics::AppStoreMetrics;
use crate::types::AppStoreSource;
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Outcome of a registration request
#[derive(Debug)]
pub enum Registration {
    /// The URL was already registered (case-insensitive); nothing changed.
    AlreadyRegistered,
    /// Validation and persistence were started in the background.
    Initiated(RegistrationHandle),
}

/// Handle on a background registration. Dropping it leaves the task running.
#[derive(Debug)]
pub struct RegistrationHandle {
    attempt_id: Uuid,
    url: String,
    task: JoinHandle<Result<AppStoreSource>>,
}

impl RegistrationHandle {
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Wait for the background registration to finish.
    pub async fn outcome(self) -> Result<AppStoreSource> {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(CatalogError::Cancelled),
            Err(e) => Err(CatalogError::Internal(format!(
                "registration task failed: {e}"
            ))),
        }
    }
}

pub struct AppStoreRegistry {
    sources: Arc<RwLock<Vec<AppStoreSource>>>,
    loader: Arc<dyn AppStoreLoaderPort>,
    registration_timeout: Duration,
    shutdown: watch::Sender<bool>,
}

impl AppStoreRegistry {
    pub fn new(
        sources: Vec<AppStoreSource>,
        loader: Arc<dyn AppStoreLoaderPort>,
        registration_timeout: Duration,
    ) -> Result<Self> {
        if sources.is_empty() {
            return Err(CatalogError::Config(
                "at least one app store must be registered".to_string(),
            ));
        }

        let (shutdown, _) = watch::channel(false);
        Ok(Self {
            sources: Arc::new(RwLock::new(sources)),
            loader,
            registration_timeout,
            shutdown,
        })
    }

    /// Build the registry from the sources the loader persisted earlier.
    pub async fn load(
        loader: Arc<dyn AppStoreLoaderPort>,
        registration_timeout: Duration,
    ) -> Result<Self> {
        let sources = loader.load_sources().await?;
        info!("Loaded {} app store source(s)", sources.len());
        Self::new(sources, loader, registration_timeout)
    }

    /// Registered sources in order, each `id` set to its position.
    pub async fn list(&self) -> Vec<AppStoreSource> {
        self.sources
            .read()
            .await
            .iter()
            .enumerate()
            .map(|(id, source)| AppStoreSource {
                id,
                ..source.clone()
            })
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.sources.read().await.len()
    }

    /// Register `url`. Returns as soon as the background validation has been
    /// started; poll `list()` to observe the result.
    pub async fn register(&self, url: &str) -> Result<Registration> {
        if url.is_empty() {
            return Err(CatalogError::InvalidInput(
                MSG_APPSTORE_URL_REQUIRED.to_string(),
            ));
        }

        if self.sources.read().await.iter().any(|s| s.matches_url(url)) {
            AppStoreMetrics::record_registration_duplicate();
            info!(url, "app store is already registered");
            return Ok(Registration::AlreadyRegistered);
        }

        let parsed = Url::parse(url).map_err(|e| CatalogError::NotAnAppStore(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CatalogError::NotAnAppStore(format!(
                "{url}: unsupported scheme `{}`",
                parsed.scheme()
            )));
        }

        let attempt_id = Uuid::new_v4();
        let task = tokio::spawn(complete_registration(
            self.sources.clone(),
            self.loader.clone(),
            url.to_string(),
            self.registration_timeout,
            self.shutdown.subscribe(),
            attempt_id,
        ));

        AppStoreMetrics::record_registration_initiated();
        info!(%attempt_id, url, "app store registration initiated");

        Ok(Registration::Initiated(RegistrationHandle {
            attempt_id,
            url: url.to_string(),
            task,
        }))
    }

    /// Remove the source at `index`.
    ///
    /// A registry holding a single source rejects every index with
    /// `LastAppStore`; otherwise an index past the end is `NotFound`. Nothing is
    /// mutated unless the loader confirms the removal.
    pub async fn unregister(&self, index: usize) -> Result<AppStoreSource> {
        let mut sources = self.sources.write().await;

        if sources.len() == 1 {
            return Err(CatalogError::LastAppStore);
        }
        if index >= sources.len() {
            return Err(CatalogError::NotFound(app_store_not_found_message(index)));
        }

        let source = sources[index].clone();
        self.loader
            .remove(&source)
            .await
            .map_err(|e| CatalogError::Internal(e.to_string()))?;
        sources.remove(index);

        AppStoreMetrics::record_unregistration();
        info!(url = %source.url, index, "app store unregistered");

        Ok(AppStoreSource { id: index, ..source })
    }

    /// Cancel every registration still running in the background.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }
}

async fn complete_registration(
    sources: Arc<RwLock<Vec<AppStoreSource>>>,
    loader: Arc<dyn AppStoreLoaderPort>,
    url: String,
    timeout: Duration,
    mut shutdown: watch::Receiver<bool>,
    attempt_id: Uuid,
) -> Result<AppStoreSource> {
    let stopped = *shutdown.borrow();
    let outcome = if stopped {
        Err(CatalogError::Cancelled)
    } else {
        tokio::select! {
            result = tokio::time::timeout(timeout, loader.validate_and_persist(&url)) => {
                result.unwrap_or_else(|_| {
                    Err(CatalogError::Timeout(format!("registering app store {url}")))
                })
            }
            _ = shutdown.changed() => Err(CatalogError::Cancelled),
        }
    };

    match outcome {
        Ok(source) => {
            let mut guard = sources.write().await;
            if guard.iter().any(|s| s.matches_url(&source.url)) {
                info!(%attempt_id, url = %source.url, "app store was registered concurrently");
            } else {
                guard.push(source.clone());
                info!(%attempt_id, url = %source.url, total = guard.len(), "app store registered");
            }
            AppStoreMetrics::record_registration_completed();
            Ok(source)
        }
        Err(e) => {
            AppStoreMetrics::record_registration_failed();
            match &e {
                CatalogError::NotAnAppStore(_) | CatalogError::Cancelled => {
                    warn!(%attempt_id, url = %url, error = %e, "app store registration failed")
                }
                _ => error!(%attempt_id, url = %url, error = %e, "app store registration failed"),
            }
            Err(e)
        }
    }
}
