// SPDX-License-Identifier: MIT OR Apache-2.0
//! Up-front checks on candidate video files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{MediaError, MediaResult};

/// Largest accepted upload (500 MB)
pub const MAX_VIDEO_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// MIME types accepted for import
pub const ACCEPTED_VIDEO_TYPES: &[&str] = &["video/mp4", "video/webm", "video/quicktime", "video/x-matroska"];

/// Default limit on a metadata probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Limits applied when importing media
#[derive(Debug, Clone, PartialEq)]
pub struct ImportLimits {
    /// Maximum file size in bytes
    pub max_file_size: u64,
    /// Accepted MIME types
    pub accepted_types: Vec<String>,
    /// Metadata probe timeout
    pub probe_timeout: Duration,
}

impl Default for ImportLimits {
    fn default() -> Self {
        Self {
            max_file_size: MAX_VIDEO_FILE_SIZE,
            accepted_types: ACCEPTED_VIDEO_TYPES.iter().map(ToString::to_string).collect(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// A candidate file for import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    /// Location on disk
    pub path: PathBuf,
    /// File name shown to the user
    pub name: String,
    /// MIME type
    pub mime_type: String,
    /// Size in bytes
    pub size: u64,
}

impl VideoFile {
    /// Describe a file on disk, inferring its MIME type from the extension
    pub fn from_path(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            mime_type: mime_type_for_path(path).to_string(),
            size: metadata.len(),
        })
    }
}

/// MIME type for a path, by extension
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" | "qt" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "pdf" => "application/pdf",
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        _ => "application/octet-stream",
    }
}

/// Outcome of [`validate_video_file`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoValidation {
    /// Whether the file may be imported
    pub valid: bool,
    /// Reason for rejection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VideoValidation {
    fn ok() -> Self {
        Self { valid: true, error: None }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(reason.into()),
        }
    }
}

/// Check type and size against the default limits
pub fn validate_video_file(file: &VideoFile) -> VideoValidation {
    validate_video_file_with(file, &ImportLimits::default())
}

/// Check type and size against the given limits
pub fn validate_video_file_with(file: &VideoFile, limits: &ImportLimits) -> VideoValidation {
    if !limits.accepted_types.iter().any(|t| t == &file.mime_type) {
        return VideoValidation::rejected(format!(
            "Unsupported file type \"{}\". Supported types: {}",
            file.mime_type,
            limits.accepted_types.join(", ")
        ));
    }

    if file.size > limits.max_file_size {
        return VideoValidation::rejected(format!(
            "File is too large ({:.1} MB). Maximum size is {:.0} MB",
            file.size as f64 / (1024.0 * 1024.0),
            limits.max_file_size as f64 / (1024.0 * 1024.0)
        ));
    }

    VideoValidation::ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(mime_type: &str, size: u64) -> VideoFile {
        VideoFile {
            path: PathBuf::from("clip"),
            name: "clip".to_string(),
            mime_type: mime_type.to_string(),
            size,
        }
    }

    #[test]
    fn test_rejects_pdf() {
        let result = validate_video_file(&file("application/pdf", 1024));
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("application/pdf"));
    }

    #[test]
    fn test_accepts_mp4_under_cap() {
        let result = validate_video_file(&file("video/mp4", 10 * 1024 * 1024));
        assert_eq!(result, VideoValidation { valid: true, error: None });
        assert!(validate_video_file(&file("video/mp4", MAX_VIDEO_FILE_SIZE)).valid);
    }

    #[test]
    fn test_rejects_mp4_over_cap() {
        let result = validate_video_file(&file("video/mp4", MAX_VIDEO_FILE_SIZE + 1));
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("too large"));
    }

    #[test]
    fn test_custom_limits() {
        let limits = ImportLimits {
            max_file_size: 10,
            accepted_types: vec!["video/webm".to_string()],
            ..ImportLimits::default()
        };
        assert!(!validate_video_file_with(&file("video/mp4", 5), &limits).valid);
        assert!(validate_video_file_with(&file("video/webm", 5), &limits).valid);
        assert!(!validate_video_file_with(&file("video/webm", 11), &limits).valid);
    }

    #[test]
    fn test_mime_by_extension() {
        assert_eq!(mime_type_for_path(Path::new("a/b/Clip.MP4")), "video/mp4");
        assert_eq!(mime_type_for_path(Path::new("talk.mov")), "video/quicktime");
        assert_eq!(mime_type_for_path(Path::new("notes.pdf")), "application/pdf");
        assert_eq!(mime_type_for_path(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_from_path_reads_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.webm");
        std::fs::write(&path, [0u8; 64]).unwrap();
        let video = VideoFile::from_path(&path).unwrap();
        assert_eq!(video.size, 64);
        assert_eq!(video.mime_type, "video/webm");
        assert_eq!(video.name, "demo.webm");

        assert!(matches!(
            VideoFile::from_path(dir.path().join("missing.mp4")),
            Err(MediaError::FileNotFound(_))
        ));
    }
}
