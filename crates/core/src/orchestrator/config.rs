//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// How conversion runs are executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Maximum number of tools running at once within a phase.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Start a run in the background when the server starts.
    #[serde(default = "default_run_on_startup")]
    pub run_on_startup: bool,
}

fn default_workers() -> usize {
    4
}

fn default_run_on_startup() -> bool {
    true
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            run_on_startup: default_run_on_startup(),
        }
    }
}

impl OrchestratorConfig {
    /// Sets the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }
}
