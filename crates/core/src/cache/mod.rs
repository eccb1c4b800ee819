//! Cache module for derived artifacts.
//!
//! Converted images, transcoded videos and thumbnails are written to a cache
//! directory and found again by name (`{base_name}.{ext}`). A present file is
//! the only record that a conversion already happened, which is what makes
//! repeated runs skip finished work.
//!
//! The [`CacheStore`] trait keeps that policy in one place so a store with a
//! manifest and atomic claims could replace [`DirCacheStore`] later.

mod dir_store;
mod error;
mod traits;

pub use dir_store::{sibling_cache_dir, DirCacheStore, CACHE_DIR_NAME};
pub use error::CacheDirError;
pub use traits::CacheStore;
