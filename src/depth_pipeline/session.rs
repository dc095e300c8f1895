//! Consumer loop tying the pipeline stages together

pub mod config;
pub mod runner;
pub mod timing;


pub use config::{SessionConfig, SessionConfigBuilder};
pub use runner::{LiveSession, SessionReport};
pub use timing::{StageTiming, StageTimings, Timer};
