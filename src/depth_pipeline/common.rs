//! Common utilities module
//!
//! Error types shared by every stage of the depth pipeline.

pub mod error;

pub use error::{PipelineError, Result};
