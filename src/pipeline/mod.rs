//! Pipeline module - loading, feature derivation, aggregation and filtering

pub mod categorical;
pub mod correlation;
pub mod error;
pub mod features;
pub mod filter;
pub mod loader;
pub mod stats;

pub use categorical::*;
pub use correlation::*;
pub use error::PipelineError;
pub use features::*;
pub use filter::*;
pub use loader::*;
pub use stats::{pearson, quantile_linear};
