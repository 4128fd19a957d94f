//! Catalog query metrics

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct CatalogMetrics;

impl CatalogMetrics {
    /// Record a catalog listing and how many entries survived the filters
    pub fn record_list_query(listed_entries: usize) {
        ::metrics::counter!(phase_metric!(counter, "catalog", "list_queries")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "catalog", "listed_entries"))
            .record(listed_entries as f64);
    }

    pub fn record_unknown_author_type() {
        ::metrics::counter!(phase_metric!(counter, "catalog", "unknown_author_types")).increment(1);
    }

    pub fn record_store_info_failure() {
        ::metrics::counter!(phase_metric!(counter, "catalog", "store_info_failures")).increment(1);
    }

    pub fn record_category_query() {
        ::metrics::counter!(phase_metric!(counter, "catalog", "category_queries")).increment(1);
    }
}

impl PhaseMetrics for CatalogMetrics {
    fn register_metrics() {
        use metrics::{describe_counter, describe_histogram};

        describe_counter!(
            phase_metric!(counter, "catalog", "list_queries"),
            "Catalog listing queries served"
        );
        describe_counter!(
            phase_metric!(counter, "catalog", "unknown_author_types"),
            "Listing queries filtered by an unknown author type"
        );
        describe_counter!(
            phase_metric!(counter, "catalog", "store_info_failures"),
            "Compose apps whose store info could not be projected"
        );
        describe_counter!(
            phase_metric!(counter, "catalog", "category_queries"),
            "Category listing queries served"
        );
        describe_histogram!(
            phase_metric!(histogram, "catalog", "listed_entries"),
            "Entries returned per catalog listing"
        );
    }

    fn phase_name() -> &'static str {
        "catalog"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "catalog", "list_queries"),
                metric_type: MetricType::Counter,
                help: "Catalog listing queries served",
            },
            MetricDoc {
                name: phase_metric!(counter, "catalog", "unknown_author_types"),
                metric_type: MetricType::Counter,
                help: "Listing queries filtered by an unknown author type",
            },
            MetricDoc {
                name: phase_metric!(counter, "catalog", "store_info_failures"),
                metric_type: MetricType::Counter,
                help: "Compose apps whose store info could not be projected",
            },
            MetricDoc {
                name: phase_metric!(counter, "catalog", "category_queries"),
                metric_type: MetricType::Counter,
                help: "Category listing queries served",
            },
            MetricDoc {
                name: phase_metric!(histogram, "catalog", "listed_entries"),
                metric_type: MetricType::Histogram,
                help: "Entries returned per catalog listing",
            },
        ]
    }
}
