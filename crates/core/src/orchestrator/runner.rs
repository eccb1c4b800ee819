//! Phase sequencing over a source directory.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::StreamExt;
use tracing::{debug, info};

use crate::cache::{CacheStore, DirCacheStore};
use crate::converter::{
    CommandBuilder, ConversionJob, ConverterConfig, JobResult, ProcessToolRunner, ToolInvoker,
    ToolRunner,
};
use crate::pool::{PoolStatus, WorkerPool};
use crate::reporter::{Reporter, TracingReporter};
use crate::scanner::{self, AssetClass, MediaAsset};

use super::config::OrchestratorConfig;
use super::types::{OrchestratorError, Phase, PhaseReport, RunReport};

/// Skip detail for an artifact already in the cache.
pub const SKIP_CACHED: &str = "already cached";
/// Skip detail for a video that already has a still image.
pub const SKIP_STILL_PRESENT: &str = "original still image present";

/// Classes whose presence makes a thumbnail unnecessary.
const STILL_CLASSES: [AssetClass; 2] = [AssetClass::StillImage, AssetClass::LegacyImage];

/// Runs the three conversion phases over a source directory.
pub struct Orchestrator {
    config: OrchestratorConfig,
    commands: CommandBuilder,
    pool: WorkerPool,
    reporter: Arc<dyn Reporter>,
    cache_dir: Option<PathBuf>,
}

impl Orchestrator {
    /// Creates an orchestrator running tools through `runner`.
    pub fn new(
        config: OrchestratorConfig,
        commands: CommandBuilder,
        runner: Arc<dyn ToolRunner>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        let pool = WorkerPool::new(ToolInvoker::new(runner), Arc::clone(&reporter));
        Self {
            config,
            commands,
            pool,
            reporter,
            cache_dir: None,
        }
    }

    /// Creates an orchestrator spawning real processes with the configured
    /// binaries and timeout.
    pub fn with_process_runner(
        config: OrchestratorConfig,
        converter: ConverterConfig,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        let runner = ProcessToolRunner::with_timeout(converter.timeout());
        Self::new(
            config,
            CommandBuilder::new(converter),
            Arc::new(runner),
            reporter,
        )
    }

    /// Writes artifacts to `dir` instead of the sibling `cache` directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Returns the orchestrator configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Returns the worker pool counters.
    pub fn status(&self) -> PoolStatus {
        self.pool.status()
    }

    /// Converts everything under `dir` that is not yet cached.
    ///
    /// Only a missing or unreadable source directory, or a cache directory
    /// that cannot be created, is an error. Individual job failures end up
    /// in the report.
    pub async fn run_all(&self, dir: &Path) -> Result<RunReport, OrchestratorError> {
        let started_at = Utc::now();
        let source_dir = scanner::resolve_source_dir(dir).await?;
        let cache = match &self.cache_dir {
            Some(custom) => DirCacheStore::at(custom.clone()).await?,
            None => DirCacheStore::resolve(&source_dir).await?,
        };

        self.reporter.run_started(&source_dir, cache.dir());

        let mut phases = Vec::with_capacity(Phase::ALL.len());
        for phase in Phase::ALL {
            match self.run_phase(phase, &source_dir, &cache).await {
                Ok(report) => phases.push(report),
                Err(e) => {
                    self.reporter.run_failed(&e);
                    return Err(e);
                }
            }
        }

        let report = RunReport {
            source_dir,
            cache_dir: cache.dir().to_path_buf(),
            started_at,
            finished_at: Utc::now(),
            phases,
        };
        self.reporter.run_finished(&report);
        Ok(report)
    }

    async fn run_phase(
        &self,
        phase: Phase,
        source_dir: &Path,
        cache: &dyn CacheStore,
    ) -> Result<PhaseReport, OrchestratorError> {
        let start = Instant::now();
        let kind = phase.job_kind();

        let mut assets = scanner::scan(source_dir, kind.source_class()).await?;
        assets.sort_by(|a, b| a.path.cmp(&b.path));

        // Computed after the earlier phases so their output is visible.
        let stills = match phase {
            Phase::ThumbnailDerivation => scanner::base_names(source_dir, &STILL_CLASSES).await?,
            _ => HashSet::new(),
        };

        let (skipped, jobs) = self.plan(phase, assets, cache, &stills);
        self.reporter.phase_started(phase, jobs.len());

        let mut results = Vec::with_capacity(skipped.len() + jobs.len());
        for result in skipped {
            self.reporter.job_finished(phase, &result);
            results.push(result);
        }

        let mut stream = self.pool.run(jobs, self.config.workers);
        while let Some(result) = stream.next().await {
            self.reporter.job_finished(phase, &result);
            results.push(result);
        }

        let report = PhaseReport {
            phase,
            results,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        self.reporter.phase_finished(&report);
        Ok(report)
    }

    /// Splits a phase's assets into skips and jobs to run.
    fn plan(
        &self,
        phase: Phase,
        assets: Vec<MediaAsset>,
        cache: &dyn CacheStore,
        stills: &HashSet<String>,
    ) -> (Vec<JobResult>, Vec<ConversionJob>) {
        let kind = phase.job_kind();
        let ext = kind.target_extension();

        let mut skipped = Vec::new();
        let mut jobs = Vec::new();
        // Two sources with one base name would write the same artifact.
        let mut claimed: HashMap<String, String> = HashMap::new();

        for asset in assets {
            let source_name = asset.file_name();

            if cache.exists(&asset.base_name, ext) {
                skipped.push(JobResult::skipped(source_name, kind, SKIP_CACHED));
                continue;
            }
            if phase == Phase::ThumbnailDerivation && stills.contains(&asset.base_name) {
                skipped.push(JobResult::skipped(source_name, kind, SKIP_STILL_PRESENT));
                continue;
            }
            if let Some(owner) = claimed.get(&asset.base_name) {
                debug!("{} shares its artifact with {}", source_name, owner);
                skipped.push(JobResult::skipped(
                    source_name,
                    kind,
                    format!("artifact produced from {}", owner),
                ));
                continue;
            }
            claimed.insert(asset.base_name.clone(), source_name.clone());

            let target_path = cache.artifact_path(&asset.base_name, ext);
            jobs.push(ConversionJob {
                command: self.commands.build(kind, &asset.path, &target_path),
                source_path: asset.path,
                source_name,
                target_path,
                kind,
            });
        }

        (skipped, jobs)
    }
}

/// Converts `directory` with `worker_count` workers, real tools and
/// `tracing` output.
pub async fn run_all(
    directory: impl AsRef<Path>,
    worker_count: usize,
) -> Result<RunReport, OrchestratorError> {
    let directory = directory.as_ref();
    info!("Converting {:?} with {} workers", directory, worker_count);

    let orchestrator = Orchestrator::with_process_runner(
        OrchestratorConfig::default().with_workers(worker_count),
        ConverterConfig::default(),
        Arc::new(TracingReporter),
    );
    orchestrator.run_all(directory).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{JobKind, JobOutcome, ToolCommand, ToolError, ToolOutput};
    use crate::reporter::{MetricsReporter, Reporters};
    use crate::testing::{FakeToolRunner, RecordingReporter, ReportEvent};
    use tempfile::TempDir;

    struct Fixture {
        _root: TempDir,
        media: PathBuf,
        cache: PathBuf,
        runner: FakeToolRunner,
        reporter: Arc<RecordingReporter>,
        orchestrator: Orchestrator,
    }

    fn fixture(files: &[&str]) -> Fixture {
        let root = TempDir::new().unwrap();
        let media = root.path().join("media");
        std::fs::create_dir(&media).unwrap();
        for name in files {
            std::fs::write(media.join(name), b"data").unwrap();
        }

        let runner = FakeToolRunner::new();
        let reporter = Arc::new(RecordingReporter::new());
        let orchestrator = Orchestrator::new(
            OrchestratorConfig::default().with_workers(2),
            CommandBuilder::default(),
            Arc::new(runner.clone()),
            reporter.clone(),
        );

        Fixture {
            cache: root.path().join("cache"),
            _root: root,
            media,
            runner,
            reporter,
            orchestrator,
        }
    }

    #[tokio::test]
    async fn test_phases_run_in_order() {
        let f = fixture(&["a.heic", "b.MOV"]);
        let report = f.orchestrator.run_all(&f.media).await.unwrap();

        let phases: Vec<_> = report.phases.iter().map(|p| p.phase).collect();
        assert_eq!(phases, Phase::ALL.to_vec());

        let started: Vec<_> = f
            .reporter
            .events()
            .into_iter()
            .filter_map(|e| match e {
                ReportEvent::PhaseStarted { phase, .. } => Some(phase),
                _ => None,
            })
            .collect();
        assert_eq!(started, Phase::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_cache_is_sibling_of_source() {
        let f = fixture(&["a.heic"]);
        let report = f.orchestrator.run_all(&f.media).await.unwrap();

        assert_eq!(report.cache_dir, f.cache.canonicalize().unwrap());
        assert!(f.cache.join("a.jpg").is_file());
    }

    #[tokio::test]
    async fn test_custom_cache_dir() {
        let f = fixture(&["a.heic"]);
        let custom = f.media.join("derived");
        let orchestrator = Orchestrator::new(
            OrchestratorConfig::default(),
            CommandBuilder::default(),
            Arc::new(f.runner.clone()),
            Arc::new(crate::reporter::NoopReporter),
        )
        .with_cache_dir(&custom);

        orchestrator.run_all(&f.media).await.unwrap();
        assert!(custom.join("a.jpg").is_file());
        assert!(!f.cache.exists());
    }

    #[tokio::test]
    async fn test_legacy_video_extension_is_case_sensitive() {
        let f = fixture(&["upper.MOV", "lower.mov"]);
        let report = f.orchestrator.run_all(&f.media).await.unwrap();

        let video = report.phase(Phase::VideoConversion).unwrap();
        assert_eq!(video.results.len(), 1);
        assert_eq!(video.results[0].source_name, "upper.MOV");
    }

    #[tokio::test]
    async fn test_cached_thumbnail_reports_already_cached() {
        let f = fixture(&["clip.mp4"]);
        std::fs::create_dir(&f.cache).unwrap();
        std::fs::write(f.cache.join("clip.jpg"), b"jpg").unwrap();

        let report = f.orchestrator.run_all(&f.media).await.unwrap();
        let thumbs = report.phase(Phase::ThumbnailDerivation).unwrap();
        assert_eq!(thumbs.results.len(), 1);
        assert_eq!(thumbs.results[0].outcome, JobOutcome::Skipped);
        assert_eq!(thumbs.results[0].detail.as_deref(), Some(SKIP_CACHED));
        assert_eq!(f.runner.invocation_count().await, 0);
    }

    #[tokio::test]
    async fn test_heic_still_suppresses_thumbnail_even_if_conversion_fails() {
        let f = fixture(&["shot.heic", "shot.mov"]);
        f.runner.fail_on("shot.heic", "no decode delegate").await;

        let report = f.orchestrator.run_all(&f.media).await.unwrap();

        let thumbs = report.phase(Phase::ThumbnailDerivation).unwrap();
        assert_eq!(thumbs.results.len(), 1);
        assert_eq!(thumbs.results[0].detail.as_deref(), Some(SKIP_STILL_PRESENT));
        assert!(f
            .runner
            .inputs()
            .await
            .iter()
            .all(|p| !p.ends_with("shot.mov")));
    }

    #[tokio::test]
    async fn test_shared_base_name_produces_one_thumbnail_job() {
        let f = fixture(&["clip.mov", "clip.mp4"]);
        let report = f.orchestrator.run_all(&f.media).await.unwrap();

        let thumbs = report.phase(Phase::ThumbnailDerivation).unwrap();
        assert_eq!(thumbs.results.len(), 2);
        assert_eq!(thumbs.succeeded(), 1);
        assert_eq!(thumbs.skipped(), 1);
        assert_eq!(f.runner.invocation_count().await, 1);
    }

    #[tokio::test]
    async fn test_thumbnail_job_targets_jpg() {
        let f = fixture(&["walk.mp4"]);
        let report = f.orchestrator.run_all(&f.media).await.unwrap();

        let thumbs = report.phase(Phase::ThumbnailDerivation).unwrap();
        assert_eq!(thumbs.succeeded(), 1);
        assert_eq!(thumbs.results[0].kind, JobKind::ThumbnailExtract);
        assert!(f.cache.join("walk.jpg").is_file());
    }

    #[tokio::test]
    async fn test_missing_source_dir_is_fatal() {
        let f = fixture(&[]);
        let err = f
            .orchestrator
            .run_all(&f.media.join("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::Scan(_)));
        assert!(f.reporter.events().is_empty());
    }

    #[tokio::test]
    async fn test_run_finished_reported_once() {
        let f = fixture(&["a.heic"]);
        f.orchestrator.run_all(&f.media).await.unwrap();

        let finished = f
            .reporter
            .events()
            .iter()
            .filter(|e| matches!(e, ReportEvent::RunFinished { .. }))
            .count();
        assert_eq!(finished, 1);
    }

    /// Removes the source directory while running its first job.
    struct VanishingSourceRunner {
        source_dir: PathBuf,
    }

    #[async_trait::async_trait]
    impl ToolRunner for VanishingSourceRunner {
        fn name(&self) -> &str {
            "vanishing"
        }

        async fn run(&self, _command: &ToolCommand) -> Result<ToolOutput, ToolError> {
            let _ = tokio::fs::remove_dir_all(&self.source_dir).await;
            Ok(ToolOutput {
                exit_code: Some(0),
                stderr: String::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_fatal_error_mid_run_closes_the_run() {
        let f = fixture(&["a.heic"]);
        let metrics = MetricsReporter::new().unwrap();
        let reporters = Reporters::new()
            .with(f.reporter.clone())
            .with(Arc::new(metrics.clone()));
        let orchestrator = Orchestrator::new(
            OrchestratorConfig::default(),
            CommandBuilder::default(),
            Arc::new(VanishingSourceRunner {
                source_dir: f.media.clone(),
            }),
            Arc::new(reporters),
        );

        let err = orchestrator.run_all(&f.media).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Scan(_)));

        let text = metrics.encode().unwrap();
        assert!(text.contains("reelcache_run_in_progress 0"));
        assert!(text.contains("reelcache_runs_total 0"));

        let events = f.reporter.events();
        assert!(matches!(events.last(), Some(ReportEvent::RunFailed { .. })));
        assert!(!events
            .iter()
            .any(|e| matches!(e, ReportEvent::RunFinished { .. })));
    }
}
