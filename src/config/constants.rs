// * Configuration Constants
// * Central location for defaults, timeouts and the fixed tracking-parameter list

// * Default bind address and port for the HTTP front end
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 4567;

// * Upper bound on the single HEAD request issued when expanding a link
pub const REDIRECT_TIMEOUT_SECS: u64 = 5;

// * User-Agent sent on the redirect probe
pub const DEFAULT_USER_AGENT: &str = concat!("url-tidy/", env!("CARGO_PKG_VERSION"));

// * Query keys starting with any of these prefixes are treated as tracking parameters.
// * Matching is case-sensitive and against the decoded key.
pub const UNWANTED_PARAM_PREFIXES: &[&str] = &[
    "utm", "tracking", "source", "tag", "ascsub", "sub", "linkCode", "ref", "ir", "clickid",
    "sharedid", "mpaid",
];

// * Amazon canonical form
pub const AMAZON_HOST_MARKER: &str = "amazon";
pub const AMAZON_CANONICAL_BASE: &str = "https://www.amazon.com/dp/";

// * Text appended when a query is kept but the source URL had none (legacy behaviour)
pub const MISSING_QUERY_LITERAL: &str = "nil";

// * Fixed user-facing messages
pub const MSG_URL_REQUIRED: &str = "URL parameter is required";
pub const MSG_NOT_AMAZON: &str = "Provided URL is not a valid Amazon URL";
