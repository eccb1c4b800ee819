use clap::Parser;
use std::path::PathBuf;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Parser)]
#[command(name = "reelcache")]
#[command(version, about = "Converts legacy photo and video containers and serves the results")]
pub struct Cli {
    /// Source media directory (overrides media.source_dir)
    pub directory: Option<PathBuf>,

    /// Number of conversion workers (overrides conversion.workers)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Path to config file
    #[arg(short, long, env = "REELCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run the conversion once and exit instead of serving
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    /// Config file to load, if any.
    ///
    /// An explicit path must exist; the default `config.toml` is optional.
    pub fn config_path(&self) -> Option<PathBuf> {
        match &self.config {
            Some(path) => Some(path.clone()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        }
    }
}
