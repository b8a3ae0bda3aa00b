// * Operations: logging and metrics

pub mod telemetry;

// * Re-exports for convenient access
pub use telemetry::{
    get_metrics_string, init_tracing, init_tracing_pretty, init_tracing_with_format,
    init_tracing_with_level, record_operation, record_redirect_duration, record_redirect_failure,
    LogFormat,
};
