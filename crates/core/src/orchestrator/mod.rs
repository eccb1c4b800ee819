//! Conversion orchestrator.
//!
//! A run scans the source directory once per phase and executes the phases
//! strictly in sequence:
//! - **ImageConversion**: legacy image containers to JPEG
//! - **VideoConversion**: legacy video containers to MP4
//! - **ThumbnailDerivation**: one frame per video that has no still image
//!
//! Within a phase every job goes through the worker pool. A failed job never
//! stops the run; only an unreadable source directory or an unusable cache
//! directory does.

mod config;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use runner::{run_all, Orchestrator, SKIP_CACHED, SKIP_STILL_PRESENT};
pub use types::{OrchestratorError, Phase, PhaseReport, RunReport};
