pub mod config;
pub mod engines;
pub mod error;
pub mod orchestrator;
pub mod types;

pub use error::{QwopEvolveError, Result};
pub use orchestrator::{Orchestrator, RunSummary};
