use std::process::ExitCode;
use url_tidy::config::Settings;
use url_tidy::engine::{AmazonCanonicalizer, Orchestrator};
use url_tidy::network::RedirectClient;
use url_tidy::{ops, server};

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match Settings::from_env() {
        Ok(s) => {
            ops::init_tracing_with_format(s.log_format);
            s
        }
        Err(e) => {
            ops::init_tracing();
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let resolver = match RedirectClient::with_options(settings.redirect_timeout, &settings.user_agent) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let orchestrator = Orchestrator::new(resolver, AmazonCanonicalizer::new(settings.missing_query));

    let handle = match server::start_server(orchestrator, settings.bind_addr()).await {
        Ok(h) => h,
        Err(e) => {
            tracing::error!(error = %e, addr = %settings.bind_addr(), "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        addr = %handle.local_addr(),
        redirect_timeout_secs = settings.redirect_timeout.as_secs(),
        missing_query = %settings.missing_query,
        "url-tidy initialized"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }

    tracing::info!("Shutdown requested");
    handle.shutdown().await;

    ExitCode::SUCCESS
}
