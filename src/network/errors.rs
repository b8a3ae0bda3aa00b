use crate::config::constants::{MSG_NOT_AMAZON, MSG_URL_REQUIRED};
use thiserror::Error;

// * Unified error type for every transformation.
// * Display output is forwarded verbatim to the caller as the `error` field.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("{}", MSG_URL_REQUIRED)]
    MissingParameter,

    #[error("{}", MSG_NOT_AMAZON)]
    NotAmazonUrl,

    #[error("{0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid Location header: {0}")]
    InvalidLocation(String),
}

impl TransformError {
    // * Short, stable label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            TransformError::MissingParameter => "missing_parameter",
            TransformError::NotAmazonUrl => "not_amazon_url",
            TransformError::InvalidUrl(_)
            | TransformError::Transport(_)
            | TransformError::InvalidLocation(_) => "transform_failure",
        }
    }
}
