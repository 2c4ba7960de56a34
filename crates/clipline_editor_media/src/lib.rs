// SPDX-License-Identifier: MIT OR Apache-2.0
//! Media handling for Clipline Editor.
//!
//! This crate provides:
//! - Up-front validation of candidate video files (type and size)
//! - Metadata probing through `ffprobe`, behind the [`MediaProbe`] trait
//! - Video import producing a [`MediaSource`] and its first clip
//! - Audio extraction through `ffmpeg` and silence detection
//!
//! ## Architecture
//!
//! External tools run as child processes that are killed when their future
//! is dropped, so a caller-side timeout never leaves a decoder behind.

pub mod audio;
pub mod error;
pub mod import;
pub mod probe;
pub mod silence;
pub mod validate;

pub use audio::{extract_audio, AudioBuffer, AudioExtractOptions, ANALYSIS_SAMPLE_RATE};
pub use error::{MediaError, MediaResult};
pub use import::{generate_clips_from_import, import_video_file, MediaSource, MediaSourceKind};
pub use probe::{parse_ffprobe_json, FfprobeProbe, MediaProbe, ProbedMedia};
pub use silence::{detect_silent_regions, detect_with_params, speech_segments, SilenceParams, SilentRegion};
pub use validate::{
    mime_type_for_path, validate_video_file, validate_video_file_with, ImportLimits, VideoFile, VideoValidation,
    ACCEPTED_VIDEO_TYPES, DEFAULT_PROBE_TIMEOUT, MAX_VIDEO_FILE_SIZE,
};
