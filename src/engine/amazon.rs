// * Amazon product URL canonicalizer
// * Reduces any Amazon product page URL to https://www.amazon.com/dp/<id>

use crate::config::constants::{AMAZON_CANONICAL_BASE, AMAZON_HOST_MARKER, MISSING_QUERY_LITERAL};
use crate::network::errors::TransformError;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use url::Url;

lazy_static! {
    // * First `/dp/<segment>` in the path; the segment stops at the next `/`
    static ref PRODUCT_ID_REGEX: Regex =
        Regex::new(r"/dp/([^/]+)").expect("! CRITICAL: Failed to compile product id regex");
}

// * What to append when the query is kept but the source URL had none.
// * `LiteralNil` preserves the historical output (`.../dp/<id>nil`) until product
// * signs off on `Omit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingQueryPolicy {
    #[default]
    LiteralNil,
    Omit,
}

impl FromStr for MissingQueryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nil" | "literal_nil" | "legacy" => Ok(MissingQueryPolicy::LiteralNil),
            "omit" | "none" => Ok(MissingQueryPolicy::Omit),
            other => Err(format!("expected `nil` or `omit`, got `{}`", other)),
        }
    }
}

impl fmt::Display for MissingQueryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingQueryPolicy::LiteralNil => write!(f, "nil"),
            MissingQueryPolicy::Omit => write!(f, "omit"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AmazonCanonicalizer {
    missing_query: MissingQueryPolicy,
}

impl AmazonCanonicalizer {
    pub fn new(missing_query: MissingQueryPolicy) -> Self {
        Self { missing_query }
    }

    pub fn missing_query_policy(&self) -> MissingQueryPolicy {
        self.missing_query
    }

    // * Returns `Ok(None)` when the host is not an Amazon host or the path carries no
    // * product id. Only a parse failure is an error.
    pub fn canonicalize(&self, raw: &str, keep_query: bool) -> Result<Option<String>, TransformError> {
        let url = Url::parse(raw)?;

        if !is_amazon_host(&url) {
            return Ok(None);
        }

        let product_id = match extract_product_id(url.path()) {
            Some(id) => id,
            None => return Ok(None),
        };

        let mut canonical = format!("{}{}", AMAZON_CANONICAL_BASE, product_id);

        if keep_query {
            match raw_query(raw) {
                Some(query) => {
                    canonical.push('?');
                    canonical.push_str(query);
                }
                None => {
                    if self.missing_query == MissingQueryPolicy::LiteralNil {
                        canonical.push_str(MISSING_QUERY_LITERAL);
                    }
                }
            }
        }

        Ok(Some(canonical))
    }
}

// * The query exactly as written in the input: after the first `?`, before any `#`.
// * `Url::query()` would hand back a percent-encoded copy instead.
pub fn raw_query(raw: &str) -> Option<&str> {
    let without_fragment = raw.trim().split('#').next().unwrap_or_default();
    without_fragment.split_once('?').map(|(_, query)| query)
}

// * Hosts are compared after `Url` lowercases them, so `WWW.AMAZON.COM` qualifies.
pub fn is_amazon_host(url: &Url) -> bool {
    url.host_str()
        .map(|host| host.contains(AMAZON_HOST_MARKER))
        .unwrap_or(false)
}

pub fn extract_product_id(path: &str) -> Option<&str> {
    PRODUCT_ID_REGEX
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
