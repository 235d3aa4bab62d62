//! Metrics setup and update for query execution.

use prometheus::core::{AtomicU64, GenericCounter};

#[derive(Debug, Clone)]
pub struct Metrics {
    pub query_total: GenericCounter<AtomicU64>,
    pub introspection_total: GenericCounter<AtomicU64>,
    pub rows_flattened_total: GenericCounter<AtomicU64>,
    pub flatten_truncations_total: GenericCounter<AtomicU64>,
    pub query_errors_total: GenericCounter<AtomicU64>,
}

impl Metrics {
    /// Set up counters and register them with the provided Prometheus Registry.
    pub fn initialize(metrics_registry: &mut prometheus::Registry) -> Result<Metrics, prometheus::Error> {
        let query_total = add_int_counter_metric(
            metrics_registry,
            "graphsql_query_total",
            "Total successful SQL queries run against a GraphQL endpoint.",
        )?;

        let introspection_total = add_int_counter_metric(
            metrics_registry,
            "graphsql_introspection_total",
            "Total schema introspections performed.",
        )?;

        let rows_flattened_total = add_int_counter_metric(
            metrics_registry,
            "graphsql_rows_flattened_total",
            "Total rows produced by flattening GraphQL responses.",
        )?;

        let flatten_truncations_total = add_int_counter_metric(
            metrics_registry,
            "graphsql_flatten_truncations_total",
            "Total responses whose flattened rows were cut at the configured bound.",
        )?;

        let query_errors_total = add_int_counter_metric(
            metrics_registry,
            "graphsql_query_errors_total",
            "Total SQL queries that failed at any stage.",
        )?;

        Ok(Self {
            query_total,
            introspection_total,
            rows_flattened_total,
            flatten_truncations_total,
            query_errors_total,
        })
    }

    pub fn record_successful_query(&self, rows: usize, truncated: bool) {
        self.query_total.inc();
        self.rows_flattened_total.inc_by(rows as u64);
        if truncated {
            self.flatten_truncations_total.inc();
        }
    }

    pub fn record_failed_query(&self) {
        self.query_errors_total.inc();
    }
}

/// Create a new int counter metric and register it with the provided Prometheus Registry
fn add_int_counter_metric(
    metrics_registry: &mut prometheus::Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<GenericCounter<AtomicU64>, prometheus::Error> {
    let int_counter =
        prometheus::IntCounter::with_opts(prometheus::Opts::new(metric_name, metric_description))?;
    metrics_registry.register(Box::new(int_counter.clone()))?;
    Ok(int_counter)
}
