//! url-tidy: expands short links, strips tracking parameters and reduces
//! Amazon product URLs to their `/dp/<id>` form.

pub mod config;
pub mod engine;
pub mod network;
pub mod ops;
pub mod server;
