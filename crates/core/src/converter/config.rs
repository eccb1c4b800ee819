//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// External tool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Path to ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Path to ImageMagick binary.
    #[serde(default = "default_magick_path")]
    pub magick_path: PathBuf,

    /// Kill a tool that runs longer than this. No limit when absent.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Where in the video the preview frame is taken, in seconds.
    #[serde(default = "default_thumbnail_seek")]
    pub thumbnail_seek_secs: f64,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_magick_path() -> PathBuf {
    PathBuf::from("magick")
}

fn default_thumbnail_seek() -> f64 {
    0.5
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            magick_path: default_magick_path(),
            timeout_secs: None,
            thumbnail_seek_secs: default_thumbnail_seek(),
        }
    }
}

impl ConverterConfig {
    /// Creates a config with custom tool paths.
    pub fn with_paths(ffmpeg_path: PathBuf, magick_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            magick_path,
            ..Default::default()
        }
    }

    /// Sets the per-job timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// The per-job timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
