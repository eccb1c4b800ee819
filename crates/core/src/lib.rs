pub mod cache;
pub mod config;
pub mod converter;
pub mod orchestrator;
pub mod pool;
pub mod reporter;
pub mod scanner;
pub mod testing;

pub use cache::{sibling_cache_dir, CacheDirError, CacheStore, DirCacheStore, CACHE_DIR_NAME};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, MediaConfig,
    SanitizedConfig, ServerConfig,
};
pub use converter::{
    CommandBuilder, ConversionJob, ConverterConfig, JobKind, JobOutcome, JobResult,
    ProcessToolRunner, ToolCommand, ToolError, ToolInvoker, ToolOutput, ToolRunner,
};
pub use orchestrator::{
    run_all, Orchestrator, OrchestratorConfig, OrchestratorError, Phase, PhaseReport, RunReport,
};
pub use pool::{JobResults, PoolStatus, WorkerPool};
pub use reporter::{MetricsReporter, NoopReporter, Reporter, Reporters, TracingReporter};
pub use scanner::{AssetClass, MediaAsset, ScanError};
