// * Request orchestration
// * Composes redirect resolution, tracking-parameter filtering and Amazon
// * canonicalization per operation. The first failure stops the pipeline and
// * becomes the error payload; no partial result is ever returned.

use crate::engine::amazon::AmazonCanonicalizer;
use crate::engine::flags::{is_strictly_enabled, keep_amazon_query, Flag};
use crate::engine::query_filter;
use crate::network::client::RedirectClient;
use crate::network::errors::TransformError;
use crate::ops::telemetry;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Expand,
    ShortenAmazon,
    Clean,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Expand => "expand",
            Operation::ShortenAmazon => "shorten_amazon",
            Operation::Clean => "clean",
        }
    }

    // * JSON key carrying the transformed URL
    pub fn result_field(self) -> &'static str {
        match self {
            Operation::Expand => "expanded_url",
            Operation::ShortenAmazon => "shortened_url",
            Operation::Clean => "cleaned_url",
        }
    }
}

// * Caller intent for one request. Flags stay raw; they are classified on use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformRequest {
    pub original_url: Option<String>,
    pub clean: Option<String>,
    pub tidy_amazon: Option<String>,
}

impl TransformRequest {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: Some(original_url.into()),
            ..Self::default()
        }
    }

    pub fn with_clean(mut self, clean: impl Into<String>) -> Self {
        self.clean = Some(clean.into());
        self
    }

    pub fn with_tidy_amazon(mut self, tidy_amazon: impl Into<String>) -> Self {
        self.tidy_amazon = Some(tidy_amazon.into());
        self
    }

    fn required_url(&self) -> Result<&str, TransformError> {
        match self.original_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(url),
            _ => Err(TransformError::MissingParameter),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformResult {
    Success {
        operation: Operation,
        original_url: String,
        result_url: String,
    },
    Error {
        error: String,
    },
}

impl TransformResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TransformResult::Success { .. })
    }

    pub fn result_url(&self) -> Option<&str> {
        match self {
            TransformResult::Success { result_url, .. } => Some(result_url),
            TransformResult::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            TransformResult::Success { .. } => None,
            TransformResult::Error { error } => Some(error),
        }
    }
}

// * `{original_url, <operation>_url}` or `{error}`
impl Serialize for TransformResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TransformResult::Success {
                operation,
                original_url,
                result_url,
            } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("original_url", original_url)?;
                map.serialize_entry(operation.result_field(), result_url)?;
                map.end()
            }
            TransformResult::Error { error } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", error)?;
                map.end()
            }
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    resolver: RedirectClient,
    amazon: AmazonCanonicalizer,
}

impl Orchestrator {
    pub fn new(resolver: RedirectClient, amazon: AmazonCanonicalizer) -> Self {
        Self { resolver, amazon }
    }

    // * Resolve one redirect hop, optionally clean, optionally tidy an Amazon URL
    pub async fn expand(&self, req: &TransformRequest) -> TransformResult {
        let outcome = self.try_expand(req).await;
        Self::finish(Operation::Expand, req, outcome)
    }

    // * Canonicalize an Amazon URL as given (no redirect, no filtering)
    pub fn shorten_amazon(&self, req: &TransformRequest) -> TransformResult {
        let outcome = self.try_shorten_amazon(req);
        Self::finish(Operation::ShortenAmazon, req, outcome)
    }

    // * Strip tracking parameters from the URL as given
    pub fn clean(&self, req: &TransformRequest) -> TransformResult {
        let outcome = req.required_url().and_then(query_filter::filter);
        Self::finish(Operation::Clean, req, outcome)
    }

    pub async fn run(&self, operation: Operation, req: &TransformRequest) -> TransformResult {
        match operation {
            Operation::Expand => self.expand(req).await,
            Operation::ShortenAmazon => self.shorten_amazon(req),
            Operation::Clean => self.clean(req),
        }
    }

    async fn try_expand(&self, req: &TransformRequest) -> Result<String, TransformError> {
        let original = req.required_url()?;
        Url::parse(original)?;

        let resolved = self.resolver.resolve_once(original).await?;

        let clean = Flag::classify(req.clean.as_deref());
        let cleaned = if clean.is_truthy() {
            query_filter::filter(&resolved)?
        } else {
            resolved
        };

        if !is_strictly_enabled(req.tidy_amazon.as_deref()) {
            return Ok(cleaned);
        }

        self.amazon
            .canonicalize(&cleaned, keep_amazon_query(clean))?
            .ok_or(TransformError::NotAmazonUrl)
    }

    fn try_shorten_amazon(&self, req: &TransformRequest) -> Result<String, TransformError> {
        let original = req.required_url()?;
        let clean = Flag::classify(req.clean.as_deref());

        self.amazon
            .canonicalize(original, keep_amazon_query(clean))?
            .ok_or(TransformError::NotAmazonUrl)
    }

    fn finish(
        operation: Operation,
        req: &TransformRequest,
        outcome: Result<String, TransformError>,
    ) -> TransformResult {
        let original_url = req.original_url.clone().unwrap_or_default();

        match outcome {
            Ok(result_url) => {
                telemetry::record_operation(operation.name(), "success");
                info!(
                    operation = operation.name(),
                    original_url = %original_url,
                    result_url = %result_url,
                    "Transform complete"
                );
                TransformResult::Success {
                    operation,
                    original_url,
                    result_url,
                }
            }
            Err(e) => {
                telemetry::record_operation(operation.name(), e.kind());
                warn!(
                    operation = operation.name(),
                    original_url = %original_url,
                    error = %e,
                    "Transform failed"
                );
                TransformResult::Error {
                    error: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::amazon::MissingQueryPolicy;

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(
            RedirectClient::new().unwrap(),
            AmazonCanonicalizer::new(MissingQueryPolicy::LiteralNil),
        )
    }

    #[test]
    fn test_clean_scenario() {
        let req = TransformRequest::new("https://example.com/x?utm_source=ig&id=5");
        let result = orchestrator().clean(&req);
        assert_eq!(result.result_url(), Some("https://example.com/x?id=5"));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "original_url": "https://example.com/x?utm_source=ig&id=5",
                "cleaned_url": "https://example.com/x?id=5"
            })
        );
    }

    #[test]
    fn test_missing_url_on_sync_operations() {
        let o = orchestrator();
        for req in [
            TransformRequest::default(),
            TransformRequest::new(""),
            TransformRequest::new("   "),
        ] {
            assert_eq!(o.clean(&req).error(), Some("URL parameter is required"));
            assert_eq!(o.shorten_amazon(&req).error(), Some("URL parameter is required"));
        }
    }

    #[tokio::test]
    async fn test_missing_url_on_expand_skips_network() {
        let result = orchestrator().expand(&TransformRequest::default()).await;
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({ "error": "URL parameter is required" })
        );
    }

    #[tokio::test]
    async fn test_expand_unparseable_url_is_error() {
        let result = orchestrator().expand(&TransformRequest::new("nonsense")).await;
        assert_eq!(result.error(), Some("relative URL without a base"));
    }

    #[test]
    fn test_clean_unparseable_url_is_error() {
        let result = orchestrator().clean(&TransformRequest::new("not a url"));
        assert_eq!(result.error(), Some("relative URL without a base"));
    }

    #[test]
    fn test_shorten_amazon_clean_flag_table() {
        let o = orchestrator();
        let url = "https://www.amazon.com/dp/ABC123?psc=1";
        let cases: [(Option<&str>, &str); 4] = [
            (None, "https://www.amazon.com/dp/ABC123"),
            (Some("1"), "https://www.amazon.com/dp/ABC123"),
            (Some("false"), "https://www.amazon.com/dp/ABC123?psc=1"),
            (Some("yes"), "https://www.amazon.com/dp/ABC123"),
        ];

        for (clean, expected) in cases {
            let mut req = TransformRequest::new(url);
            req.clean = clean.map(str::to_string);
            let result = o.shorten_amazon(&req);
            assert_eq!(result.result_url(), Some(expected), "clean = {:?}", clean);
        }
    }

    #[test]
    fn test_shorten_amazon_scenario_json() {
        let req = TransformRequest::new("https://www.amazon.com/dp/ABC123?psc=1").with_clean("1");
        let json = serde_json::to_value(orchestrator().shorten_amazon(&req)).unwrap();
        assert_eq!(json["shortened_url"], "https://www.amazon.com/dp/ABC123");
        assert_eq!(json["original_url"], "https://www.amazon.com/dp/ABC123?psc=1");
    }

    #[test]
    fn test_shorten_amazon_keep_query_without_query_is_nil_quirk() {
        let req = TransformRequest::new("https://www.amazon.com/dp/ABC123").with_clean("0");
        let result = orchestrator().shorten_amazon(&req);
        assert_eq!(result.result_url(), Some("https://www.amazon.com/dp/ABC123nil"));
    }

    #[test]
    fn test_shorten_amazon_rejects_non_amazon() {
        let o = orchestrator();
        let not_amazon = o.shorten_amazon(&TransformRequest::new("https://example.com/dp/ABC123"));
        assert_eq!(not_amazon.error(), Some("Provided URL is not a valid Amazon URL"));

        let no_product = o.shorten_amazon(&TransformRequest::new("https://www.amazon.com/gp/cart"));
        assert_eq!(no_product.error(), Some("Provided URL is not a valid Amazon URL"));
    }

    #[test]
    fn test_shorten_amazon_does_not_filter_query() {
        let req = TransformRequest::new("https://www.amazon.com/dp/ABC123?tag=aff-20&th=1")
            .with_clean("f");
        let result = orchestrator().shorten_amazon(&req);
        assert_eq!(
            result.result_url(),
            Some("https://www.amazon.com/dp/ABC123?tag=aff-20&th=1")
        );
    }

    #[test]
    fn test_clean_accepts_relative_reference() {
        let result = orchestrator().clean(&TransformRequest::new("/next?utm_id=1&x=2"));
        assert_eq!(result.result_url(), Some("/next?x=2"));
    }

    #[tokio::test]
    async fn test_run_dispatches_by_operation() {
        let req = TransformRequest::new("https://example.com/?ref=x");
        let result = orchestrator().run(Operation::Clean, &req).await;
        assert_eq!(result.result_url(), Some("https://example.com/"));
    }
}
