use crate::config::constants::{DEFAULT_USER_AGENT, REDIRECT_TIMEOUT_SECS};
use crate::network::errors::TransformError;
use crate::ops::telemetry;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;

// * Single-hop redirect resolver.
// * Issues one HEAD request with redirect following disabled and reports the
// * `Location` header verbatim, or the input URL when there is none.
#[derive(Clone)]
pub struct RedirectClient {
    inner: Client,
}

impl RedirectClient {
    // * Builds the client with the default timeout and User-Agent
    pub fn new() -> Result<Self, TransformError> {
        Self::with_options(Duration::from_secs(REDIRECT_TIMEOUT_SECS), DEFAULT_USER_AGENT)
    }

    pub fn with_options(timeout: Duration, user_agent: &str) -> Result<Self, TransformError> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { inner: client })
    }

    // * No retries and no caching; every call hits the network.
    pub async fn resolve_once(&self, url: &str) -> Result<String, TransformError> {
        let started = Instant::now();
        let result = self.head_location(url).await;
        telemetry::record_redirect_duration(started.elapsed().as_secs_f64());

        match &result {
            Ok(resolved) => debug!(url = %url, resolved = %resolved, "Redirect resolved"),
            Err(e) => {
                telemetry::record_redirect_failure();
                debug!(url = %url, error = %e, "Redirect resolution failed");
            }
        }

        result
    }

    async fn head_location(&self, url: &str) -> Result<String, TransformError> {
        let resp = self.inner.head(url).send().await?;

        match resp.headers().get(LOCATION) {
            Some(location) => location
                .to_str()
                .map(str::to_string)
                .map_err(|e| TransformError::InvalidLocation(e.to_string())),
            None => Ok(url.to_string()),
        }
    }
}
