pub mod amazon;
pub mod flags;
pub mod orchestrator;
pub mod query_filter;

pub use amazon::{AmazonCanonicalizer, MissingQueryPolicy};
pub use flags::Flag;
pub use orchestrator::{Operation, Orchestrator, TransformRequest, TransformResult};
