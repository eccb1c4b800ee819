//! Cache store backed by a plain directory.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::CacheDirError;
use super::traits::CacheStore;

/// Name of the cache directory created next to the source directory.
pub const CACHE_DIR_NAME: &str = "cache";

/// Cache store where an artifact exists iff its file exists.
///
/// Existence checks and the tool writing the output are not atomic: two
/// runs sharing one directory can both miss and both convert, and the last
/// writer wins.
#[derive(Debug, Clone)]
pub struct DirCacheStore {
    dir: PathBuf,
}

impl DirCacheStore {
    /// Resolves the cache directory for `source_dir` (its sibling named
    /// `cache`) and creates it if absent.
    pub async fn resolve(source_dir: &Path) -> Result<Self, CacheDirError> {
        Self::at(sibling_cache_dir(source_dir)).await
    }

    /// Uses `dir` as the cache directory, creating it if absent.
    ///
    /// Creating an already existing directory is not an error, so concurrent
    /// callers can race here safely.
    pub async fn at(dir: PathBuf) -> Result<Self, CacheDirError> {
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| {
                if dir.is_file() {
                    CacheDirError::NotADirectory { path: dir.clone() }
                } else {
                    CacheDirError::CreateFailed {
                        path: dir.clone(),
                        source,
                    }
                }
            })?;

        debug!("Using cache directory {:?}", dir);
        Ok(Self { dir })
    }
}

impl CacheStore for DirCacheStore {
    fn dir(&self) -> &Path {
        &self.dir
    }

    fn exists(&self, base_name: &str, target_ext: &str) -> bool {
        self.artifact_path(base_name, target_ext).is_file()
    }
}

/// Sibling `cache` directory of `source_dir`; a root directory keeps its
/// cache inside itself.
pub fn sibling_cache_dir(source_dir: &Path) -> PathBuf {
    match source_dir.parent() {
        Some(parent) => parent.join(CACHE_DIR_NAME),
        None => source_dir.join(CACHE_DIR_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sibling_cache_dir() {
        assert_eq!(
            sibling_cache_dir(Path::new("/srv/photos/testmedia")),
            PathBuf::from("/srv/photos/cache")
        );
        assert_eq!(sibling_cache_dir(Path::new("/")), PathBuf::from("/cache"));
    }

    #[tokio::test]
    async fn test_resolve_creates_sibling() {
        let root = TempDir::new().unwrap();
        let source = root.path().join("media");
        std::fs::create_dir(&source).unwrap();

        let store = DirCacheStore::resolve(&source).await.unwrap();
        assert_eq!(store.dir(), root.path().join("cache"));
        assert!(root.path().join("cache").is_dir());
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let root = TempDir::new().unwrap();
        let source = root.path().join("media");
        std::fs::create_dir(&source).unwrap();

        DirCacheStore::resolve(&source).await.unwrap();
        let again = DirCacheStore::resolve(&source).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_exists() {
        let root = TempDir::new().unwrap();
        let store = DirCacheStore::at(root.path().join("cache")).await.unwrap();

        assert!(!store.exists("clip", "mp4"));
        std::fs::write(store.artifact_path("clip", "mp4"), b"data").unwrap();
        assert!(store.exists("clip", "mp4"));
        assert!(!store.exists("clip", "jpg"));
    }

    #[tokio::test]
    async fn test_file_in_the_way() {
        let root = TempDir::new().unwrap();
        let blocker = root.path().join("cache");
        std::fs::write(&blocker, b"not a dir").unwrap();

        let err = DirCacheStore::at(blocker).await.unwrap_err();
        assert!(matches!(err, CacheDirError::NotADirectory { .. }));
    }
}
