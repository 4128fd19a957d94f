//! App store registry metrics

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct AppStoreMetrics;

impl AppStoreMetrics {
    pub fn record_registration_initiated() {
        ::metrics::counter!(phase_metric!(counter, "registry", "registrations_initiated")).increment(1);
    }

    pub fn record_registration_duplicate() {
        ::metrics::counter!(phase_metric!(counter, "registry", "registrations_duplicate")).increment(1);
    }

    pub fn record_registration_completed() {
        ::metrics::counter!(phase_metric!(counter, "registry", "registrations_completed")).increment(1);
    }

    pub fn record_registration_failed() {
        ::metrics::counter!(phase_metric!(counter, "registry", "registrations_failed")).increment(1);
    }

    pub fn record_unregistration() {
        ::metrics::counter!(phase_metric!(counter, "registry", "unregistrations")).increment(1);
    }
}

impl PhaseMetrics for AppStoreMetrics {
    fn register_metrics() {
        use metrics::describe_counter;

        describe_counter!(
            phase_metric!(counter, "registry", "registrations_initiated"),
            "App store registrations started in the background"
        );
        describe_counter!(
            phase_metric!(counter, "registry", "registrations_duplicate"),
            "Registrations skipped because the URL was already registered"
        );
        describe_counter!(
            phase_metric!(counter, "registry", "registrations_completed"),
            "Background registrations that added a source"
        );
        describe_counter!(
            phase_metric!(counter, "registry", "registrations_failed"),
            "Background registrations that failed, timed out or were cancelled"
        );
        describe_counter!(
            phase_metric!(counter, "registry", "unregistrations"),
            "App stores removed from the registry"
        );
    }

    fn phase_name() -> &'static str {
        "registry"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "registry", "registrations_initiated"),
                metric_type: MetricType::Counter,
                help: "App store registrations started in the background",
            },
            MetricDoc {
                name: phase_metric!(counter, "registry", "registrations_duplicate"),
                metric_type: MetricType::Counter,
                help: "Registrations skipped because the URL was already registered",
            },
            MetricDoc {
                name: phase_metric!(counter, "registry", "registrations_completed"),
                metric_type: MetricType::Counter,
                help: "Background registrations that added a source",
            },
            MetricDoc {
                name: phase_metric!(counter, "registry", "registrations_failed"),
                metric_type: MetricType::Counter,
                help: "Background registrations that failed, timed out or were cancelled",
            },
            MetricDoc {
                name: phase_metric!(counter, "registry", "unregistrations"),
                metric_type: MetricType::Counter,
                help: "App stores removed from the registry",
            },
        ]
    }
}
