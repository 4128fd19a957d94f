//! Registers the metrics of every phase and detects naming conflicts early.

use crate::metrics::{MetricDoc, PhaseMetrics};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

pub fn register_all_metrics() {
    let mut all_metrics = HashMap::new();

    register_phase_metrics::<super::appstore::AppStoreMetrics>(&mut all_metrics);
    register_phase_metrics::<super::catalog::CatalogMetrics>(&mut all_metrics);

    info!(
        "Registered {} total metrics across all phases",
        all_metrics.len()
    );
    log_metrics_summary(&all_metrics);
}

/// Number of registered metrics per phase, keyed by the phase in the name.
fn metrics_per_phase(all_metrics: &HashMap<&'static str, MetricDoc>) -> BTreeMap<&'static str, usize> {
    let mut by_phase = BTreeMap::new();
    for &name in all_metrics.keys() {
        *by_phase.entry(extract_phase_from_metric_name(name)).or_insert(0) += 1;
    }
    by_phase
}

fn log_metrics_summary(all_metrics: &HashMap<&'static str, MetricDoc>) {
    for (phase, count) in metrics_per_phase(all_metrics) {
        info!("Phase '{}': {} metrics", phase, count);
    }
}

fn register_phase_metrics<T: PhaseMetrics>(all_metrics: &mut HashMap<&'static str, MetricDoc>) {
    T::register_metrics();
    let phase_name = T::phase_name();

    for doc in T::metrics_documentation() {
        if let Some(existing) = all_metrics.get(doc.name) {
            warn!(
                "Metric name conflict detected: '{}' ({}) redefined by phase '{}'",
                doc.name, existing.help, phase_name
            );
        } else {
            debug!("  - {} ({:?}): {}", doc.name, doc.metric_type, doc.help);
            all_metrics.insert(doc.name, doc);
        }
    }
}

/// Extract phase name from metric name (e.g. "appstore_catalog_queries_total" -> "catalog")
fn extract_phase_from_metric_name(metric_name: &str) -> &str {
    if let Some(stripped) = metric_name.strip_prefix("appstore_") {
        if let Some(next_underscore) = stripped.find('_') {
            return &stripped[..next_underscore];
        }
    }
    "unknown"
}
