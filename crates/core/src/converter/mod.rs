//! Converter module for running external media tools.
//!
//! This module describes conversion jobs and runs them through the
//! `ToolRunner` trait:
//!
//! - `VideoTranscode`: legacy `.MOV` to H.264/AAC `.mp4` with ffmpeg
//! - `ImageTranscode`: `.heic` to `.jpg` with ImageMagick
//! - `ThumbnailExtract`: one frame at 0.5s of a video to `.jpg` with ffmpeg
//!
//! # Example
//!
//! ```ignore
//! use reelcache_core::converter::{CommandBuilder, ConversionJob, JobKind, ProcessToolRunner, ToolInvoker};
//!
//! let builder = CommandBuilder::default();
//! let invoker = ToolInvoker::new(Arc::new(ProcessToolRunner::new()));
//!
//! let job = ConversionJob {
//!     source_path: PathBuf::from("/media/clip.MOV"),
//!     source_name: "clip.MOV".to_string(),
//!     target_path: PathBuf::from("/cache/clip.mp4"),
//!     kind: JobKind::VideoTranscode,
//!     command: builder.video_transcode(Path::new("/media/clip.MOV"), Path::new("/cache/clip.mp4")),
//! };
//!
//! let result = invoker.invoke(&job).await;
//! println!("{}", result);
//! ```

mod commands;
mod config;
mod error;
mod invoker;
mod process;
mod traits;
mod types;

pub use commands::CommandBuilder;
pub use config::ConverterConfig;
pub use error::ToolError;
pub use invoker::ToolInvoker;
pub use process::ProcessToolRunner;
pub use traits::ToolRunner;
pub use types::{ConversionJob, JobKind, JobOutcome, JobResult, ToolCommand, ToolOutput};
