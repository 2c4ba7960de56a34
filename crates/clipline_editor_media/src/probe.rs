// SPDX-License-Identifier: MIT OR Apache-2.0
//! Container metadata probing.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Metadata read from a media file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbedMedia {
    /// Duration in seconds
    pub duration: f64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Frame rate
    pub fps: f64,
    /// Whether an audio stream is present
    pub has_audio: bool,
}

/// Reads duration and dimensions from a media file.
///
/// Implementations must release any decoder resources whether the probe
/// succeeds, fails, or is dropped mid-flight.
pub trait MediaProbe: Send + Sync {
    /// Probe the file at `path`
    fn probe(&self, path: &Path) -> impl Future<Output = MediaResult<ProbedMedia>> + Send;
}

/// Probe backed by the `ffprobe` CLI
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    binary: PathBuf,
}

impl FfprobeProbe {
    /// Use `ffprobe` from PATH
    pub fn from_path_env() -> MediaResult<Self> {
        let binary = which::which("ffprobe").map_err(|_| MediaError::ToolNotFound("ffprobe"))?;
        Ok(Self { binary })
    }

    /// Use a specific binary
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into() }
    }
}

impl MediaProbe for FfprobeProbe {
    async fn probe(&self, path: &Path) -> MediaResult<ProbedMedia> {
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }

        debug!("Probing {}", path.display());

        // kill_on_drop reaps the child if the caller's timeout drops us
        let output = Command::new(&self.binary)
            .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(MediaError::ProbeFailed {
                message: format!("ffprobe exited with {}", output.status),
                stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
            });
        }

        parse_ffprobe_json(&output.stdout)
    }
}

/// FFprobe JSON output format
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
}

/// Parse `ffprobe -print_format json -show_format -show_streams` output
pub fn parse_ffprobe_json(bytes: &[u8]) -> MediaResult<ProbedMedia> {
    let probe: FfprobeOutput = serde_json::from_slice(bytes)?;

    let video = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| MediaError::InvalidMedia("No video stream found".to_string()))?;

    // Some containers only report duration on the stream
    let parse = |d: &Option<String>| d.as_deref().and_then(|d| d.parse::<f64>().ok());
    let duration = parse(&probe.format.duration)
        .or_else(|| parse(&video.duration))
        .unwrap_or(f64::NAN);

    let fps = video
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| video.r_frame_rate.as_deref().and_then(parse_frame_rate))
        .unwrap_or(30.0);

    Ok(ProbedMedia {
        duration,
        width: video.width.unwrap_or(0),
        height: video.height.unwrap_or(0),
        fps,
        has_audio: probe.streams.iter().any(|s| s.codec_type == "audio"),
    })
}

/// Parse frame rate string (e.g. "30/1" or "29.97")
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        return (den > 0.0 && num > 0.0).then(|| num / den);
    }
    s.parse::<f64>().ok().filter(|v| *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            {"codec_type": "video", "width": 1920, "height": 1080, "avg_frame_rate": "30000/1001"},
            {"codec_type": "audio"}
        ],
        "format": {"duration": "12.480000"}
    }"#;

    #[test]
    fn test_parse_frame_rate() {
        assert!((parse_frame_rate("30/1").unwrap() - 30.0).abs() < 0.01);
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("29.97").unwrap() - 29.97).abs() < 0.01);
        assert!(parse_frame_rate("0/0").is_none());
    }

    #[test]
    fn test_parse_ffprobe_json() {
        let probed = parse_ffprobe_json(SAMPLE.as_bytes()).unwrap();
        assert_eq!(probed.width, 1920);
        assert_eq!(probed.height, 1080);
        assert!((probed.duration - 12.48).abs() < 1e-9);
        assert!((probed.fps - 29.97).abs() < 0.01);
        assert!(probed.has_audio);
    }

    #[test]
    fn test_stream_duration_fallback() {
        let json = r#"{"streams":[{"codec_type":"video","width":640,"height":360,"duration":"4.0"}],"format":{}}"#;
        let probed = parse_ffprobe_json(json.as_bytes()).unwrap();
        assert_eq!(probed.duration, 4.0);
        assert!(!probed.has_audio);
        assert_eq!(probed.fps, 30.0);
    }

    #[test]
    fn test_unparsable_format_duration_falls_back_to_stream() {
        let json = r#"{"streams":[{"codec_type":"video","duration":"7.5"}],"format":{"duration":"N/A"}}"#;
        let probed = parse_ffprobe_json(json.as_bytes()).unwrap();
        assert_eq!(probed.duration, 7.5);
    }

    #[test]
    fn test_missing_duration_is_nan() {
        let json = r#"{"streams":[{"codec_type":"video"}],"format":{}}"#;
        assert!(parse_ffprobe_json(json.as_bytes()).unwrap().duration.is_nan());
    }

    #[test]
    fn test_audio_only_rejected() {
        let json = r#"{"streams":[{"codec_type":"audio"}],"format":{"duration":"3.0"}}"#;
        assert!(matches!(
            parse_ffprobe_json(json.as_bytes()),
            Err(MediaError::InvalidMedia(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let probe = FfprobeProbe::with_binary("ffprobe");
        let result = probe.probe(Path::new("/definitely/not/here.mp4")).await;
        assert!(matches!(result, Err(MediaError::FileNotFound(_))));
    }
}
