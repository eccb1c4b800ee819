use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info};

use reelcache_core::{
    sibling_cache_dir, Config, MetricsReporter, Orchestrator, PoolStatus, RunReport,
    SanitizedConfig,
};

/// Outcome of the most recent conversion run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LastRun {
    Completed { report: RunReport },
    Failed { error: String },
}

/// Shared application state
pub struct AppState {
    config: Config,
    source_dir: PathBuf,
    cache_dir: PathBuf,
    orchestrator: Arc<Orchestrator>,
    metrics: MetricsReporter,
    /// Held for the whole duration of a run.
    run_lock: Arc<Mutex<()>>,
    last_run: Arc<RwLock<Option<LastRun>>>,
}

impl AppState {
    pub fn new(config: Config, orchestrator: Orchestrator, metrics: MetricsReporter) -> Self {
        let source_dir = config.media.source_dir.clone();
        let cache_dir = match &config.media.cache_dir {
            Some(dir) => dir.clone(),
            None => {
                let resolved = std::fs::canonicalize(&source_dir).unwrap_or(source_dir.clone());
                sibling_cache_dir(&resolved)
            }
        };

        Self {
            config,
            source_dir,
            cache_dir,
            orchestrator: Arc::new(orchestrator),
            metrics,
            run_lock: Arc::new(Mutex::new(())),
            last_run: Arc::new(RwLock::new(None)),
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn static_dir(&self) -> &Path {
        &self.config.server.static_dir
    }

    pub fn metrics(&self) -> &MetricsReporter {
        &self.metrics
    }

    pub fn pool_status(&self) -> PoolStatus {
        self.orchestrator.status()
    }

    /// Whether a conversion run is in progress.
    pub fn is_running(&self) -> bool {
        self.run_lock.try_lock().is_err()
    }

    pub async fn last_run(&self) -> Option<LastRun> {
        self.last_run.read().await.clone()
    }

    /// Starts a conversion run in the background.
    ///
    /// Returns `None` when a run is already in progress.
    pub fn start_run(&self) -> Option<JoinHandle<()>> {
        let guard = Arc::clone(&self.run_lock).try_lock_owned().ok()?;
        let orchestrator = Arc::clone(&self.orchestrator);
        let last_run = Arc::clone(&self.last_run);
        let source_dir = self.source_dir.clone();

        Some(tokio::spawn(async move {
            let _guard = guard;
            info!("Starting background media conversion in {:?}", source_dir);

            let outcome = match orchestrator.run_all(&source_dir).await {
                Ok(report) => {
                    info!(
                        succeeded = report.succeeded(),
                        failed = report.failed(),
                        skipped = report.skipped(),
                        "Background conversion complete"
                    );
                    LastRun::Completed { report }
                }
                Err(e) => {
                    error!("Background conversion failed: {}", e);
                    LastRun::Failed {
                        error: e.to_string(),
                    }
                }
            };
            *last_run.write().await = Some(outcome);
        }))
    }
}
