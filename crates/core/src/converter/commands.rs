//! Command templates for each job kind.
//!
//! The flags here are the contract with downstream players: transcoded video
//! must be H.264/AAC in MP4 and every image artifact a baseline JPEG.

use std::path::Path;

use super::config::ConverterConfig;
use super::types::{JobKind, ToolCommand};

/// Builds tool invocations from the configured binaries.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    config: ConverterConfig,
}

impl CommandBuilder {
    /// Creates a builder for the given tool configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Returns the tool configuration.
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Builds the command for `kind` reading `input` and writing `output`.
    pub fn build(&self, kind: JobKind, input: &Path, output: &Path) -> ToolCommand {
        match kind {
            JobKind::VideoTranscode => self.video_transcode(input, output),
            JobKind::ImageTranscode => self.image_transcode(input, output),
            JobKind::ThumbnailExtract => self.thumbnail_extract(input, output),
        }
    }

    /// `ffmpeg -y -i <in> -vcodec libx264 -acodec aac <out>`
    pub fn video_transcode(&self, input: &Path, output: &Path) -> ToolCommand {
        ToolCommand::new(&self.config.ffmpeg_path)
            .arg("-y") // Overwrite output
            .arg("-i")
            .arg(input.to_string_lossy())
            .args(["-vcodec", "libx264", "-acodec", "aac"])
            .arg(output.to_string_lossy())
    }

    /// `magick <in> <out>`, one file per invocation.
    pub fn image_transcode(&self, input: &Path, output: &Path) -> ToolCommand {
        ToolCommand::new(&self.config.magick_path)
            .arg(input.to_string_lossy())
            .arg(output.to_string_lossy())
    }

    /// `ffmpeg -y -i <in> -ss 0.5 -frames:v 1 <out>` with the tool's own
    /// output discarded.
    pub fn thumbnail_extract(&self, input: &Path, output: &Path) -> ToolCommand {
        ToolCommand::new(&self.config.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(input.to_string_lossy())
            .arg("-ss")
            .arg(self.config.thumbnail_seek_secs.to_string())
            .args(["-frames:v", "1"])
            .arg(output.to_string_lossy())
            .quiet()
    }
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}
