use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram, IntCounter,
    IntCounterVec, TextEncoder,
};

use crate::store::StoreError;

// Prometheus metrics (default registry)
pub static STORE_CALLS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "agency_store_calls_total",
        "Row store calls by operation",
        &["op"]
    )
    .expect("register store_calls_total")
});

pub static STORE_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "agency_store_errors_total",
        "Failed row store calls by operation",
        &["op"]
    )
    .expect("register store_errors_total")
});

pub static CACHE_HITS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "agency_cache_hits_total",
        "Selects answered from the query cache"
    )
    .expect("register cache_hits_total")
});

pub static CACHE_MISSES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "agency_cache_misses_total",
        "Selects forwarded to the row store"
    )
    .expect("register cache_misses_total")
});

pub static CATALOG_LOADS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "agency_catalog_loads_total",
        "Catalog assemblies started"
    )
    .expect("register catalog_loads_total")
});

pub static CATALOG_LOAD_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "agency_catalog_load_duration_seconds",
        "Catalog assembly duration in seconds",
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .expect("register catalog_load_duration")
});

pub static ADMIN_MUTATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "agency_admin_mutations_total",
        "Successful admin writes by table and action",
        &["table", "action"]
    )
    .expect("register admin_mutations_total")
});

/// Count a store call and its failure, passing the result through.
pub(crate) fn track<T>(op: &'static str, result: Result<T, StoreError>) -> Result<T, StoreError> {
    STORE_CALLS_TOTAL.with_label_values(&[op]).inc();
    if result.is_err() {
        STORE_ERRORS_TOTAL.with_label_values(&[op]).inc();
    }
    result
}

/// Text exposition of the default registry.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
