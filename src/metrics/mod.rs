//! Metrics for the app store registry and the catalog queries
//!
//! Each phase defines its counters in a dedicated submodule so names stay
//! consistent and conflicts are caught at startup.

pub mod appstore;
pub mod catalog;
pub mod registry;

pub use appstore::AppStoreMetrics;
pub use catalog::CatalogMetrics;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing::{info, warn};

static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Install the Prometheus recorder and describe every phase metric.
///
/// Idempotent. Returns the handle used to render `/metrics`, or `None` when a
/// different recorder was already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus recorder installed");
                registry::register_all_metrics();
                Some(handle)
            }
            Err(e) => {
                warn!("Failed to install Prometheus recorder: {}", e);
                None
            }
        })
        .clone()
}

/// Trait for phase-specific metrics collections
pub trait PhaseMetrics {
    /// Describe all metrics for this phase
    fn register_metrics();

    /// Get the phase name used in metric names
    fn phase_name() -> &'static str;

    /// Get documentation for all metrics in this phase
    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
}

#[derive(Debug, Clone)]
pub enum MetricType {
    Counter,
    Histogram,
}

/// Builds metric names following `appstore_{phase}_{name}_{type}`
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("appstore_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("appstore_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;
