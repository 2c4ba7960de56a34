// SPDX-License-Identifier: MIT OR Apache-2.0
//! Decoded audio and extraction through `ffmpeg`.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// Sample rate used for analysis
pub const ANALYSIS_SAMPLE_RATE: u32 = 16_000;

/// Decoded PCM audio, one sample vector per channel
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioBuffer {
    /// Samples per second
    pub sample_rate: u32,
    /// Per-channel samples in [-1, 1]
    pub channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Mono buffer
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            sample_rate,
            channels: vec![samples],
        }
    }

    /// Samples of the first channel, empty if there is none
    pub fn first_channel(&self) -> &[f32] {
        self.channels.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Length in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.first_channel().len() as f64 / f64::from(self.sample_rate)
    }

    /// Build a mono buffer from raw little-endian `f32` bytes.
    ///
    /// A trailing partial sample is ignored.
    pub fn from_f32le(sample_rate: u32, bytes: &[u8]) -> Self {
        let samples = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Self::mono(sample_rate, samples)
    }
}

/// Options for [`extract_audio`]
#[derive(Debug, Clone)]
pub struct AudioExtractOptions {
    /// `ffmpeg` binary
    pub ffmpeg: PathBuf,
    /// Output sample rate
    pub sample_rate: u32,
    /// Decode time limit
    pub timeout: Duration,
}

impl Default for AudioExtractOptions {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            sample_rate: ANALYSIS_SAMPLE_RATE,
            timeout: Duration::from_secs(120),
        }
    }
}

impl AudioExtractOptions {
    /// Resolve `ffmpeg` from PATH
    pub fn from_path_env() -> MediaResult<Self> {
        let ffmpeg = which::which("ffmpeg").map_err(|_| MediaError::ToolNotFound("ffmpeg"))?;
        Ok(Self {
            ffmpeg,
            ..Self::default()
        })
    }
}

/// Decode the first audio stream of `path` to a mono analysis buffer.
///
/// Only the first channel of the source is kept.
pub async fn extract_audio(path: &Path, options: &AudioExtractOptions) -> MediaResult<AudioBuffer> {
    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    debug!("Decoding audio from {}", path.display());

    let rate = options.sample_rate.to_string();
    let child = Command::new(&options.ffmpeg)
        .args(["-v", "error", "-i"])
        .arg(path)
        .args(["-vn", "-map", "0:a:0", "-af", "pan=mono|c0=c0", "-ar", &rate, "-f", "f32le", "-"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(options.timeout, child)
        .await
        .map_err(|_| MediaError::Timeout {
            operation: "Audio decode",
            seconds: options.timeout.as_secs(),
        })??;

    if !output.status.success() {
        return Err(MediaError::DecodeFailed {
            message: format!("ffmpeg exited with {}", output.status),
            stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
        });
    }

    let buffer = AudioBuffer::from_f32le(options.sample_rate, &output.stdout);
    info!("Decoded {:.2}s of audio", buffer.duration());
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f32le() {
        let mut bytes = Vec::new();
        for s in [0.0f32, 0.5, -1.0] {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        bytes.push(0xff);

        let buffer = AudioBuffer::from_f32le(4, &bytes);
        assert_eq!(buffer.first_channel(), &[0.0, 0.5, -1.0]);
        assert_eq!(buffer.duration(), 0.75);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = AudioBuffer::default();
        assert!(buffer.first_channel().is_empty());
        assert_eq!(buffer.duration(), 0.0);
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let result = extract_audio(Path::new("/no/such/file.mp4"), &AudioExtractOptions::default()).await;
        assert!(matches!(result, Err(MediaError::FileNotFound(_))));
    }
}
