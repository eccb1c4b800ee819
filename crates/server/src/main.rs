use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelcache_core::{
    load_config, validate_config, Config, MetricsReporter, Orchestrator, ProcessToolRunner,
    Reporter, Reporters, ToolRunner, TracingReporter,
};
use reelcache_server::api::create_router;
use reelcache_server::cli::Cli;
use reelcache_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    validate_config(&config).context("Configuration validation failed")?;

    info!("Source directory: {:?}", config.media.source_dir);
    info!("Conversion workers: {}", config.conversion.workers);

    check_tools(&config).await;

    let metrics = MetricsReporter::new().context("Failed to create metrics registry")?;
    let reporter: Arc<dyn Reporter> = Arc::new(
        Reporters::new()
            .with(Arc::new(TracingReporter))
            .with(Arc::new(metrics.clone())),
    );

    let mut orchestrator = Orchestrator::with_process_runner(
        config.conversion.clone(),
        config.tools.clone(),
        reporter,
    );
    if let Some(cache_dir) = &config.media.cache_dir {
        orchestrator = orchestrator.with_cache_dir(cache_dir);
    }

    if cli.once {
        let report = orchestrator
            .run_all(&config.media.source_dir)
            .await
            .with_context(|| format!("Conversion of {:?} failed", config.media.source_dir))?;
        info!(
            "Done: {} converted, {} skipped, {} failed",
            report.succeeded(),
            report.skipped(),
            report.failed()
        );
        return Ok(());
    }

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let run_on_startup = config.conversion.run_on_startup;
    let state = Arc::new(AppState::new(config, orchestrator, metrics));

    if run_on_startup {
        state.start_run();
    }

    // Create router
    let app = create_router(state);

    // Start server
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    Ok(())
}

/// Loads the config file if there is one and applies command line overrides.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config_path() {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None => {
            info!("No configuration file, using defaults");
            Config::default()
        }
    };

    if let Some(directory) = &cli.directory {
        config.media.source_dir = directory.clone();
    }
    if let Some(workers) = cli.workers {
        config.conversion.workers = workers;
    }

    Ok(config)
}

/// Warns about tools that cannot be launched; their jobs will fail.
async fn check_tools(config: &Config) {
    let runner = ProcessToolRunner::new();
    for program in [&config.tools.ffmpeg_path, &config.tools.magick_path] {
        match runner.validate(program).await {
            Ok(()) => info!("Found {:?}", program),
            Err(e) => warn!("{}; conversions using it will fail", e),
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
