pub mod client;
pub mod errors;

pub use client::RedirectClient;
pub use errors::TransformError;
