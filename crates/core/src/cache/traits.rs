//! Trait definitions for the cache module.

use std::path::{Path, PathBuf};

/// Storage for derived artifacts, keyed by base name and target extension.
///
/// Implementations only answer presence; they never look at content or
/// modification times. A present entry stays valid for the whole run.
pub trait CacheStore: Send + Sync {
    /// Directory the artifacts live in.
    fn dir(&self) -> &Path;

    /// Where the artifact for `base_name` with `target_ext` is written.
    fn artifact_path(&self, base_name: &str, target_ext: &str) -> PathBuf {
        self.dir().join(format!("{}.{}", base_name, target_ext))
    }

    /// Whether the artifact already exists.
    fn exists(&self, base_name: &str, target_ext: &str) -> bool;
}
