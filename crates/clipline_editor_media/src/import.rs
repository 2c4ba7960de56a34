// SPDX-License-Identifier: MIT OR Apache-2.0
//! Video import: validation, metadata probe, and initial clips.

use clipline_editor_timeline::{clip_color, scene_name, TimelineClip};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::error::{MediaError, MediaResult};
use crate::probe::MediaProbe;
use crate::validate::{validate_video_file_with, ImportLimits, VideoFile};

/// Where a media source came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaSourceKind {
    /// Imported from a local file
    #[default]
    Import,
}

/// An imported video ready for the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSource {
    /// Unique source ID
    pub id: String,
    /// Origin of the media
    #[serde(rename = "type")]
    pub kind: MediaSourceKind,
    /// File on disk
    pub path: PathBuf,
    /// `file://` URL handed to players and renderers
    pub url: String,
    /// Duration in seconds
    pub duration: f64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Original file name
    pub filename: String,
    /// Frame rate reported by the container
    #[serde(default)]
    pub fps: Option<f64>,
    /// Whether the file carries audio
    #[serde(default)]
    pub has_audio: bool,
}

/// Import a video file.
///
/// Fails if validation rejects the file, the probe errors or times out,
/// or the reported duration is not a positive finite number. Nothing is
/// returned for a partially understood file.
pub async fn import_video_file<P: MediaProbe>(
    file: &VideoFile,
    probe: &P,
    limits: &ImportLimits,
) -> MediaResult<MediaSource> {
    let validation = validate_video_file_with(file, limits);
    if !validation.valid {
        let reason = validation.error.unwrap_or_else(|| "Invalid video file".to_string());
        warn!("Rejected {}: {}", file.name, reason);
        return Err(MediaError::Rejected(reason));
    }

    let probed = tokio::time::timeout(limits.probe_timeout, probe.probe(&file.path))
        .await
        .map_err(|_| MediaError::Timeout {
            operation: "Metadata probe",
            seconds: limits.probe_timeout.as_secs(),
        })??;

    if !probed.duration.is_finite() || probed.duration <= 0.0 {
        return Err(MediaError::InvalidMedia(format!(
            "Could not determine video duration for {}",
            file.name
        )));
    }

    let absolute = std::path::absolute(&file.path)?;
    let url = Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|()| MediaError::InvalidMedia(format!("Cannot build a URL for {}", absolute.display())))?;

    info!(
        "Imported {} ({:.2}s, {}x{})",
        file.name, probed.duration, probed.width, probed.height
    );

    Ok(MediaSource {
        id: Uuid::new_v4().to_string(),
        kind: MediaSourceKind::Import,
        path: absolute,
        url,
        duration: probed.duration,
        width: probed.width,
        height: probed.height,
        filename: file.name.clone(),
        fps: Some(probed.fps),
        has_audio: probed.has_audio,
    })
}

/// Initial clips for a freshly imported source: one clip over the whole file
pub fn generate_clips_from_import(
    duration: f64,
    existing_clip_count: usize,
    preset_id: Option<&str>,
) -> Vec<TimelineClip> {
    let clip = TimelineClip::new(scene_name(existing_clip_count), 0.0, duration)
        .with_color(clip_color(existing_clip_count))
        .with_preset(preset_id.map(ToString::to_string));
    vec![clip]
}
