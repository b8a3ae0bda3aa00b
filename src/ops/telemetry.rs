// * Telemetry - JSON Logging and Prometheus Metrics
// * Provides structured logging and metrics for production observability

use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_counter_vec, register_histogram, Counter, CounterVec, Encoder,
    Histogram, TextEncoder,
};
use std::fmt as std_fmt;
use std::str::FromStr;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// * Filter used when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "url_tidy=debug,info";

lazy_static! {
    // * Requests by operation and outcome (success or error kind)
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "url_tidy_requests_total",
        "Total number of transform requests by operation and outcome",
        &["operation", "outcome"]
    ).unwrap();

    // * Time spent on the single HEAD request
    pub static ref REDIRECT_DURATION_SECONDS: Histogram = register_histogram!(
        "url_tidy_redirect_duration_seconds",
        "Redirect resolution duration in seconds",
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();

    // * Failed redirect resolutions (transport errors, timeouts, bad Location headers)
    pub static ref REDIRECT_FAILURES_TOTAL: Counter = register_counter!(
        "url_tidy_redirect_failures_total",
        "Total number of failed redirect resolutions"
    ).unwrap();
}

/// Log output layout: JSON lines for production, pretty for local development
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("expected `json` or `pretty`, got `{}`", other)),
        }
    }
}

impl std_fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

/// Initializes tracing in the requested layout
pub fn init_tracing_with_format(format: LogFormat) {
    match format {
        LogFormat::Json => init_tracing(),
        LogFormat::Pretty => init_tracing_pretty(),
    }
}

/// Initializes the tracing subscriber with JSON formatting
///
/// # Example
/// ```ignore
/// use url_tidy::ops::telemetry;
///
/// telemetry::init_tracing();
/// tracing::info!(url = "https://example.com", "Cleaning link");
/// ```
pub fn init_tracing() {
    init_tracing_with_level(DEFAULT_LOG_FILTER);
}

/// Initializes tracing with custom log level
pub fn init_tracing_with_level(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_target(false))
        .init();
}

/// Initializes tracing with pretty formatting (for development)
pub fn init_tracing_pretty() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().pretty())
        .init();
}

/// Returns the current metrics in the Prometheus text format
pub fn get_metrics_string() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Records the outcome of one operation
pub fn record_operation(operation: &str, outcome: &str) {
    REQUESTS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

/// Records how long a redirect probe took
pub fn record_redirect_duration(seconds: f64) {
    REDIRECT_DURATION_SECONDS.observe(seconds);
}

/// Records a failed redirect probe
pub fn record_redirect_failure() {
    REDIRECT_FAILURES_TOTAL.inc();
}
