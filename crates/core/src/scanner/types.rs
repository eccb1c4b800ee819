//! Types for the scanner module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A single accepted file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionPattern {
    /// Extension without the leading dot.
    pub extension: &'static str,
    /// Whether the extension must match byte for byte.
    pub case_sensitive: bool,
}

impl ExtensionPattern {
    /// Pattern that only matches the exact spelling.
    pub const fn exact(extension: &'static str) -> Self {
        Self {
            extension,
            case_sensitive: true,
        }
    }

    /// Pattern that matches regardless of ASCII case.
    pub const fn any_case(extension: &'static str) -> Self {
        Self {
            extension,
            case_sensitive: false,
        }
    }

    /// Whether the given extension (without dot) matches this pattern.
    pub fn matches(&self, extension: &str) -> bool {
        if self.case_sensitive {
            self.extension == extension
        } else {
            self.extension.eq_ignore_ascii_case(extension)
        }
    }
}

const STILL_IMAGE: &[ExtensionPattern] = &[
    ExtensionPattern::any_case("jpg"),
    ExtensionPattern::any_case("jpeg"),
    ExtensionPattern::any_case("png"),
];

const LEGACY_IMAGE: &[ExtensionPattern] = &[ExtensionPattern::any_case("heic")];

// Capture devices write upper-case .MOV; lower-case .mov is served as-is.
const LEGACY_VIDEO: &[ExtensionPattern] = &[ExtensionPattern::exact("MOV")];

const THUMBNAIL_SOURCE: &[ExtensionPattern] = &[
    ExtensionPattern::any_case("mov"),
    ExtensionPattern::any_case("mp4"),
];

/// Extension class a source file can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// Directly servable still images (jpg, jpeg, png).
    StillImage,
    /// Image containers that need conversion to JPEG (heic).
    LegacyImage,
    /// Video containers that need transcoding to MP4 (MOV).
    LegacyVideo,
    /// Videos a preview frame can be extracted from (mov, mp4).
    ThumbnailSource,
}

impl AssetClass {
    /// Returns the extension patterns accepted for this class.
    pub fn patterns(&self) -> &'static [ExtensionPattern] {
        match self {
            Self::StillImage => STILL_IMAGE,
            Self::LegacyImage => LEGACY_IMAGE,
            Self::LegacyVideo => LEGACY_VIDEO,
            Self::ThumbnailSource => THUMBNAIL_SOURCE,
        }
    }

    /// Whether a file extension (without dot) belongs to this class.
    pub fn matches(&self, extension: &str) -> bool {
        self.patterns().iter().any(|p| p.matches(extension))
    }
}

/// A source file found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Full path of the source file.
    pub path: PathBuf,
    /// File name without its final extension.
    pub base_name: String,
    /// Final extension as it appears on disk, without the dot.
    pub source_extension: String,
}

impl MediaAsset {
    /// Builds an asset from a path, or `None` when the file has no
    /// extension or a non UTF-8 name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let base_name = path.file_stem()?.to_str()?;
        let source_extension = path.extension()?.to_str()?;
        if base_name.is_empty() {
            return None;
        }

        Some(Self {
            path: path.to_path_buf(),
            base_name: base_name.to_string(),
            source_extension: source_extension.to_string(),
        })
    }

    /// Returns the file name (`base_name.source_extension`).
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.base_name, self.source_extension)
    }
}
