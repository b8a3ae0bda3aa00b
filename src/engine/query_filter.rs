use crate::config::constants::UNWANTED_PARAM_PREFIXES;
use crate::network::errors::TransformError;
use url::{ParseError, Position, Url};

// * Placeholder base used only to parse relative references
const RELATIVE_BASE: &str = "http://relative.invalid/";

// * Strips tracking parameters from a URL.
// *
// * 1. Parse the URL. Relative references (a bare `Location: /next?x=1`) are
// *    accepted; anything else that fails to parse is reported to the caller.
// * 2. No query component: the input comes back untouched.
// * 3. Decode the query with form rules and drop every pair whose key starts
// *    with an unwanted prefix.
// * 4. Re-encode the survivors in original order with form rules, so the
// *    output decodes to exactly the kept pairs.
// * 5. Nothing left: the query component is removed entirely (no trailing `?`).
pub fn filter(raw: &str) -> Result<String, TransformError> {
    match Url::parse(raw) {
        Ok(mut url) => {
            if url.query().is_none() {
                return Ok(raw.to_string());
            }
            strip_tracking_pairs(&mut url);
            Ok(url.to_string())
        }
        Err(ParseError::RelativeUrlWithoutBase) => filter_relative(raw),
        Err(e) => Err(e.into()),
    }
}

// * Relative references are resolved against a placeholder base, filtered, and
// * written back without the scheme and authority the base contributed.
fn filter_relative(raw: &str) -> Result<String, TransformError> {
    if raw.chars().any(is_forbidden_in_reference) {
        return Err(ParseError::RelativeUrlWithoutBase.into());
    }

    let base = Url::parse(RELATIVE_BASE)?;
    let mut url = base.join(raw)?;

    if url.query().is_none() {
        return Ok(raw.to_string());
    }
    strip_tracking_pairs(&mut url);

    if raw.starts_with("//") {
        return Ok(format!("//{}", &url[Position::BeforeUsername..]));
    }

    let tail = &url[Position::BeforePath..];
    if raw.starts_with('/') {
        Ok(tail.to_string())
    } else {
        Ok(tail.trim_start_matches('/').to_string())
    }
}

fn strip_tracking_pairs(url: &mut Url) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_key(key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        let mut serializer = url.query_pairs_mut();
        serializer.clear();
        for (key, value) in &kept {
            serializer.append_pair(key, value);
        }
    }
}

// * Characters a URI reference may not carry unescaped
fn is_forbidden_in_reference(c: char) -> bool {
    c.is_whitespace()
        || c.is_control()
        || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`')
}

// * Prefix match against the decoded key, case-sensitive.
// * `utm_source` and `utmx` are both tracking keys.
pub fn is_tracking_key(key: &str) -> bool {
    UNWANTED_PARAM_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
}
