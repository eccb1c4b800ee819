//! Testing utilities and fake implementations.
//!
//! Lets the whole pipeline run without ffmpeg or ImageMagick installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use reelcache_core::testing::{FakeToolRunner, RecordingReporter};
//!
//! let runner = FakeToolRunner::new();
//! let reporter = Arc::new(RecordingReporter::new());
//!
//! // Configure fake behavior
//! runner.fail_on("broken.MOV", "Invalid data found when processing input").await;
//! runner.set_delay("slow.MOV", Duration::from_millis(200)).await;
//!
//! // Use in an Orchestrator...
//! ```

mod fake_runner;
mod recording_reporter;

pub use fake_runner::FakeToolRunner;
pub use recording_reporter::{RecordingReporter, ReportEvent};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::io;
    use std::path::{Path, PathBuf};

    /// Create a source directory named `media` under `root` holding `files`.
    pub fn media_dir(root: &Path, files: &[&str]) -> io::Result<PathBuf> {
        let media = root.join("media");
        std::fs::create_dir_all(&media)?;
        for name in files {
            std::fs::write(media.join(name), b"source")?;
        }
        Ok(media)
    }
}
