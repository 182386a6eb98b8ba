use once_cell::sync::Lazy;
use prometheus::{
    opts, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Registry,
    TextEncoder,
};

macro_rules! counter_vec {
    ($name:expr, $help:expr, $labels:expr) => {
        Lazy::new(|| IntCounterVec::new(opts!($name, $help), $labels).unwrap())
    };
}
macro_rules! histogram_vec {
    ($name:expr, $help:expr, $labels:expr) => {
        Lazy::new(|| {
            HistogramVec::new(HistogramOpts::new($name, $help).buckets(LATENCY_BUCKETS.to_vec()), $labels)
                .unwrap()
        })
    };
}
macro_rules! counter {
    ($name:expr, $help:expr) => {
        Lazy::new(|| IntCounter::new($name, $help).unwrap())
    };
}
macro_rules! gauge {
    ($name:expr, $help:expr) => {
        Lazy::new(|| IntGauge::new($name, $help).unwrap())
    };
}

const LATENCY_BUCKETS: [f64; 12] = [
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

// ── HTTP ────────────────────────────────────────────────────────────────────
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> =
    counter_vec!("http_requests_total", "Total HTTP requests", &["method", "path", "status"]);
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> =
    histogram_vec!("http_request_duration_seconds", "HTTP request latency", &["method", "path"]);
pub static HTTP_IN_FLIGHT: Lazy<IntGauge> = gauge!("http_requests_in_flight", "In-flight HTTP requests");

// ── Employees ───────────────────────────────────────────────────────────────
pub static EMPLOYEES_CREATED: Lazy<IntCounter> = counter!("created_total", "Employees added");
pub static EMPLOYEES_UPDATED: Lazy<IntCounter> = counter!("updated_total", "Employee rows updated");
pub static EMPLOYEES_DELETED: Lazy<IntCounter> = counter!("deleted_total", "Employee rows deleted");
pub static EMPLOYEE_SEARCHES: Lazy<IntCounter> = counter!("searches_total", "Substring searches");
pub static EMPLOYEE_CONFLICTS: Lazy<IntCounter> =
    counter!("id_conflicts_total", "Writes rejected for a duplicate employee ID");
pub static VALIDATION_FAILURES: Lazy<IntCounterVec> =
    counter_vec!("validation_failures_total", "Rejected fields by name", &["field"]);

// ── Database ────────────────────────────────────────────────────────────────
pub static DB_QUERY_DURATION: Lazy<HistogramVec> =
    histogram_vec!("db_query_duration_seconds", "Database statement latency", &["query"]);
pub static DB_QUERY_ERRORS: Lazy<IntCounterVec> =
    counter_vec!("db_query_errors_total", "Failed database statements", &["query"]);

pub fn register_all(r: &Registry) -> prometheus::Result<()> {
    r.register(Box::new(HTTP_REQUESTS_TOTAL.clone()))?;
    r.register(Box::new(HTTP_REQUEST_DURATION.clone()))?;
    r.register(Box::new(HTTP_IN_FLIGHT.clone()))?;
    r.register(Box::new(EMPLOYEES_CREATED.clone()))?;
    r.register(Box::new(EMPLOYEES_UPDATED.clone()))?;
    r.register(Box::new(EMPLOYEES_DELETED.clone()))?;
    r.register(Box::new(EMPLOYEE_SEARCHES.clone()))?;
    r.register(Box::new(EMPLOYEE_CONFLICTS.clone()))?;
    r.register(Box::new(VALIDATION_FAILURES.clone()))?;
    r.register(Box::new(DB_QUERY_DURATION.clone()))?;
    r.register(Box::new(DB_QUERY_ERRORS.clone()))?;
    Ok(())
}

/// Registry with every collector above, names prefixed `employees_`
pub fn new_registry() -> prometheus::Result<Registry> {
    let registry = Registry::new_custom(Some("employees".into()), None)?;
    register_all(&registry)?;
    Ok(registry)
}

pub fn gather_metrics(r: &Registry) -> String {
    let encoder = TextEncoder::new();
    let families = r.gather();
    let mut buf = Vec::new();
    encoder.encode(&families, &mut buf).unwrap_or_default();
    String::from_utf8(buf).unwrap_or_default()
}

pub fn observe_http(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

pub fn observe_db_query(query: &str, duration_secs: f64) {
    DB_QUERY_DURATION
        .with_label_values(&[query])
        .observe(duration_secs);
}

pub fn observe_db_error(query: &str) {
    DB_QUERY_ERRORS.with_label_values(&[query]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_registry() -> Registry {
        let r = Registry::new_custom(Some("t".into()), None).unwrap();
        register_all(&r).unwrap();
        r
    }

    #[test]
    fn test_http_request_counter() {
        let r = fresh_registry();
        observe_http("GET", "/employees", 200, 0.002);
        let out = gather_metrics(&r);
        assert!(out.contains("t_http_requests_total"));
        assert!(out.contains("/employees"));
    }

    #[test]
    fn test_db_query_observation() {
        let r = fresh_registry();
        observe_db_query("insert_employee", 0.012);
        observe_db_error("insert_employee");
        let out = gather_metrics(&r);
        assert!(out.contains("db_query_duration_seconds"));
        assert!(out.contains("db_query_errors_total"));
    }

    #[test]
    fn test_validation_failures_labelled_by_field() {
        let r = fresh_registry();
        VALIDATION_FAILURES.with_label_values(&["phone"]).inc();
        let out = gather_metrics(&r);
        assert!(out.contains("validation_failures_total"));
        assert!(out.contains("field=\"phone\""));
    }

    #[test]
    fn test_gather_returns_valid_prometheus_format() {
        let r = fresh_registry();
        EMPLOYEES_CREATED.inc();
        let out = gather_metrics(&r);
        assert!(out.contains("# HELP"));
        assert!(out.contains("# TYPE"));
        assert!(out.contains("t_created_total"));
    }
}
