use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::converter::ConverterConfig;
use crate::orchestrator::OrchestratorConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub conversion: OrchestratorConfig,
    #[serde(default)]
    pub tools: ConverterConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Default configuration converting `source_dir`.
    pub fn for_source_dir(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            media: MediaConfig {
                source_dir: source_dir.into(),
                cache_dir: None,
            },
            ..Default::default()
        }
    }
}

/// Media directories
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    /// Directory holding the originals.
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    /// Where artifacts go. Defaults to `cache` next to `source_dir`.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            cache_dir: None,
        }
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("testmedia")
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Front-end files served for unmatched routes.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("frontend")
}

/// Sanitized config for API responses (local paths reduced to names)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub media: SanitizedMediaConfig,
    pub conversion: OrchestratorConfig,
    pub tools: SanitizedToolsConfig,
    pub server: SanitizedServerConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedMediaConfig {
    pub source_dir: String,
    pub custom_cache_dir: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedToolsConfig {
    pub ffmpeg: String,
    pub magick: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedServerConfig {
    pub port: u16,
}

fn last_component(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            media: SanitizedMediaConfig {
                source_dir: last_component(&config.media.source_dir),
                custom_cache_dir: config.media.cache_dir.is_some(),
            },
            conversion: config.conversion.clone(),
            tools: SanitizedToolsConfig {
                ffmpeg: last_component(&config.tools.ffmpeg_path),
                magick: last_component(&config.tools.magick_path),
                timeout_secs: config.tools.timeout_secs,
            },
            server: SanitizedServerConfig {
                port: config.server.port,
            },
        }
    }
}
