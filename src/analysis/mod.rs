//! Aggregation core: attribute classification, seed-group resolution,
//! and the averaging engine.

pub mod aggregator;
pub mod classifier;
pub mod resolver;
pub mod stats;

pub use aggregator::aggregate;
pub use classifier::{classify_all, Policy};
pub use resolver::resolve_base_names;
