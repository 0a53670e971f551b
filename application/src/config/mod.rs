//! Application-level configuration.
//!
//! - [`OrchestrationParams`]: tool loop control (iteration bound, source attachment)

pub mod orchestration_params;

pub use orchestration_params::OrchestrationParams;
