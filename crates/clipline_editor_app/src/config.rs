// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor configuration, stored as RON.
//!
//! Every section has defaults, so a config file only needs the values it
//! changes. A missing file means all defaults.

use clipline_editor_media::{
    AudioExtractOptions, FfprobeProbe, ImportLimits, MediaResult, SilenceParams, ACCEPTED_VIDEO_TYPES,
    ANALYSIS_SAMPLE_RATE, MAX_VIDEO_FILE_SIZE,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::export::DEFAULT_EXPORT_FPS;
use crate::history::DEFAULT_MAX_HISTORY;

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "clipline.ron";

/// Current config format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed RON
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// File written by a newer version
    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version understood
        supported: u32,
    },

    /// A value is out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Media import settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Largest accepted file in bytes
    pub max_file_size: u64,
    /// Accepted MIME types
    pub accepted_types: Vec<String>,
    /// Metadata probe limit in seconds
    pub probe_timeout_secs: u64,
    /// Audio decode limit in seconds
    pub decode_timeout_secs: u64,
    /// `ffprobe` binary, looked up on PATH when unset
    pub ffprobe: Option<PathBuf>,
    /// `ffmpeg` binary, looked up on PATH when unset
    pub ffmpeg: Option<PathBuf>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_size: MAX_VIDEO_FILE_SIZE,
            accepted_types: ACCEPTED_VIDEO_TYPES.iter().map(ToString::to_string).collect(),
            probe_timeout_secs: 30,
            decode_timeout_secs: 120,
            ffprobe: None,
            ffmpeg: None,
        }
    }
}

/// Silence detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SilenceConfig {
    /// Level below which audio counts as silent
    pub threshold_db: f64,
    /// Shortest silence reported, in milliseconds
    pub min_duration_ms: f64,
    /// Analysis sample rate
    pub sample_rate: u32,
}

impl Default for SilenceConfig {
    fn default() -> Self {
        let params = SilenceParams::default();
        Self {
            threshold_db: params.threshold_db,
            min_duration_ms: params.min_duration_ms,
            sample_rate: ANALYSIS_SAMPLE_RATE,
        }
    }
}

/// Undo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Undo steps kept
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_HISTORY,
        }
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output frame rate
    pub fps: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { fps: DEFAULT_EXPORT_FPS }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Config format version
    pub version: u32,
    /// Media import
    pub import: ImportConfig,
    /// Silence detection
    pub silence: SilenceConfig,
    /// Undo history
    pub history: HistoryConfig,
    /// Export
    pub export: ExportConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            import: ImportConfig::default(),
            silence: SilenceConfig::default(),
            history: HistoryConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: EditorConfig = ron::from_str(&content)?;

        if config.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }

        config.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load a config file, or the defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save the config file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: &str| Err(ConfigError::Invalid(message.to_string()));

        if self.import.max_file_size == 0 {
            return invalid("import.max_file_size must be positive");
        }
        if self.import.accepted_types.is_empty() {
            return invalid("import.accepted_types cannot be empty");
        }
        if self.import.probe_timeout_secs == 0 || self.import.decode_timeout_secs == 0 {
            return invalid("import timeouts must be at least one second");
        }
        if !self.silence.threshold_db.is_finite() || self.silence.threshold_db > 0.0 {
            return invalid("silence.threshold_db must be a finite value at or below 0");
        }
        if !self.silence.min_duration_ms.is_finite() || self.silence.min_duration_ms < 0.0 {
            return invalid("silence.min_duration_ms must be a non-negative number");
        }
        if self.silence.sample_rate == 0 {
            return invalid("silence.sample_rate must be positive");
        }
        if self.history.max_depth == 0 {
            return invalid("history.max_depth must be at least 1");
        }
        if !self.export.fps.is_finite() || self.export.fps <= 0.0 {
            return invalid("export.fps must be a positive number");
        }
        Ok(())
    }

    /// Import limits for the media crate
    pub fn import_limits(&self) -> ImportLimits {
        ImportLimits {
            max_file_size: self.import.max_file_size,
            accepted_types: self.import.accepted_types.clone(),
            probe_timeout: Duration::from_secs(self.import.probe_timeout_secs),
        }
    }

    /// Silence detection thresholds
    pub fn silence_params(&self) -> SilenceParams {
        SilenceParams {
            threshold_db: self.silence.threshold_db,
            min_duration_ms: self.silence.min_duration_ms,
        }
    }

    /// Metadata probe using the configured or PATH `ffprobe`
    pub fn probe(&self) -> MediaResult<FfprobeProbe> {
        match &self.import.ffprobe {
            Some(binary) => Ok(FfprobeProbe::with_binary(binary)),
            None => FfprobeProbe::from_path_env(),
        }
    }

    /// Audio extraction options using the configured or PATH `ffmpeg`
    pub fn audio_options(&self) -> MediaResult<AudioExtractOptions> {
        let mut options = match &self.import.ffmpeg {
            Some(binary) => AudioExtractOptions {
                ffmpeg: binary.clone(),
                ..AudioExtractOptions::default()
            },
            None => AudioExtractOptions::from_path_env()?,
        };
        options.sample_rate = self.silence.sample_rate;
        options.timeout = Duration::from_secs(self.import.decode_timeout_secs);
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EditorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.history.max_depth, 100);
        assert_eq!(config.export.fps, 30.0);
        assert_eq!(config.import_limits(), ImportLimits::default());
        assert_eq!(config.silence_params(), SilenceParams::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let mut config = EditorConfig::default();
        config.export.fps = 24.0;
        config.import.ffprobe = Some(PathBuf::from("/opt/ffmpeg/bin/ffprobe"));
        config.save(&path).unwrap();

        assert_eq!(EditorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "(history: (max_depth: 10))").unwrap();

        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.history.max_depth, 10);
        assert_eq!(config.export, ExportConfig::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load_or_default(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        std::fs::write(&path, "(export: (fps: 0.0))").unwrap();
        assert!(matches!(EditorConfig::load(&path), Err(ConfigError::Invalid(_))));

        std::fs::write(&path, "(version: 99)").unwrap();
        assert!(matches!(
            EditorConfig::load(&path),
            Err(ConfigError::UnsupportedVersion { found: 99, .. })
        ));

        std::fs::write(&path, "(history: oops").unwrap();
        assert!(matches!(EditorConfig::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_configured_binaries() {
        let mut config = EditorConfig::default();
        config.import.ffmpeg = Some(PathBuf::from("/usr/local/bin/ffmpeg"));
        config.silence.sample_rate = 8_000;

        let options = config.audio_options().unwrap();
        assert_eq!(options.ffmpeg, PathBuf::from("/usr/local/bin/ffmpeg"));
        assert_eq!(options.sample_rate, 8_000);
        assert_eq!(options.timeout, Duration::from_secs(120));
    }
}
