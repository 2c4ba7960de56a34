// SPDX-License-Identifier: MIT OR Apache-2.0
//! Silence detection over decoded audio.
//!
//! Only the first channel is analysed. Multi-channel sources are neither
//! mixed down nor checked per channel.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audio::AudioBuffer;

/// RMS analysis window in seconds
pub const WINDOW_SECONDS: f64 = 0.01;

/// A stretch of audio below the silence threshold, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SilentRegion {
    /// Start time
    pub start: f64,
    /// End time
    pub end: f64,
}

impl SilentRegion {
    /// Region length in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Detection thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SilenceParams {
    /// Level below which a window counts as silent
    pub threshold_db: f64,
    /// Shortest region reported
    pub min_duration_ms: f64,
}

impl Default for SilenceParams {
    fn default() -> Self {
        Self {
            threshold_db: -40.0,
            min_duration_ms: 500.0,
        }
    }
}

/// Find silent regions in the first channel of `buffer`.
///
/// The signal is scanned in consecutive 10 ms windows. A run of windows
/// whose RMS is below `10^(threshold_db / 20)` becomes a region once it
/// reaches `min_duration_ms`. A run still open at the end of the buffer is
/// flushed.
pub fn detect_silent_regions(buffer: &AudioBuffer, threshold_db: f64, min_duration_ms: f64) -> Vec<SilentRegion> {
    let samples = buffer.first_channel();
    if samples.is_empty() || buffer.sample_rate == 0 {
        return Vec::new();
    }

    let rate = f64::from(buffer.sample_rate);
    let threshold = 10f64.powf(threshold_db / 20.0);
    let window = ((rate * WINDOW_SECONDS) as usize).max(1);
    let min_samples = (min_duration_ms.max(0.0) / 1000.0 * rate) as usize;

    let mut regions = Vec::new();
    let mut silence_start: Option<usize> = None;

    let emit = |start: usize, end: usize, regions: &mut Vec<SilentRegion>| {
        if end - start >= min_samples {
            regions.push(SilentRegion {
                start: start as f64 / rate,
                end: end as f64 / rate,
            });
        }
    };

    for (index, chunk) in samples.chunks(window).enumerate() {
        let offset = index * window;
        if rms(chunk) < threshold {
            silence_start.get_or_insert(offset);
        } else if let Some(start) = silence_start.take() {
            emit(start, offset, &mut regions);
        }
    }

    if let Some(start) = silence_start {
        emit(start, samples.len(), &mut regions);
    }

    debug!(
        "Found {} silent regions in {:.2}s of audio",
        regions.len(),
        buffer.duration()
    );
    regions
}

/// Detect with [`SilenceParams`]
pub fn detect_with_params(buffer: &AudioBuffer, params: &SilenceParams) -> Vec<SilentRegion> {
    detect_silent_regions(buffer, params.threshold_db, params.min_duration_ms)
}

/// The spans between silent regions, clamped to `[0, total_duration]`.
///
/// Spans shorter than `min_length` seconds are dropped.
pub fn speech_segments(regions: &[SilentRegion], total_duration: f64, min_length: f64) -> Vec<SilentRegion> {
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return Vec::new();
    }

    let mut sorted: Vec<SilentRegion> = regions.to_vec();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut segments = Vec::new();
    let mut cursor = 0.0f64;
    for region in &sorted {
        let start = region.start.clamp(0.0, total_duration);
        if start - cursor >= min_length && start > cursor {
            segments.push(SilentRegion { start: cursor, end: start });
        }
        cursor = cursor.max(region.end.clamp(0.0, total_duration));
    }
    if total_duration - cursor >= min_length && total_duration > cursor {
        segments.push(SilentRegion {
            start: cursor,
            end: total_duration,
        });
    }
    segments
}

fn rms(chunk: &[f32]) -> f64 {
    if chunk.is_empty() {
        return 0.0;
    }
    let sum: f64 = chunk.iter().map(|s| f64::from(*s) * f64::from(*s)).sum();
    (sum / chunk.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 16_000;

    fn tone(seconds: f64) -> Vec<f32> {
        let n = (seconds * f64::from(RATE)) as usize;
        (0..n).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect()
    }

    fn silence(seconds: f64) -> Vec<f32> {
        vec![0.0; (seconds * f64::from(RATE)) as usize]
    }

    fn detect(samples: Vec<f32>) -> Vec<SilentRegion> {
        let params = SilenceParams::default();
        detect_with_params(&AudioBuffer::mono(RATE, samples), &params)
    }

    #[test]
    fn test_all_zero_buffer_is_one_region() {
        let regions = detect(silence(2.0));
        assert_eq!(regions.len(), 1);
        assert!(regions[0].start.abs() <= WINDOW_SECONDS);
        assert!((regions[0].end - 2.0).abs() <= WINDOW_SECONDS);
    }

    #[test]
    fn test_short_gap_rejected() {
        let mut samples = tone(1.0);
        samples.extend(silence(0.1));
        samples.extend(tone(1.0));
        assert!(detect(samples).is_empty());
    }

    #[test]
    fn test_gap_between_speech() {
        let mut samples = tone(1.0);
        samples.extend(silence(1.0));
        samples.extend(tone(0.5));
        let regions = detect(samples);
        assert_eq!(regions.len(), 1);
        assert!((regions[0].start - 1.0).abs() <= WINDOW_SECONDS);
        assert!((regions[0].end - 2.0).abs() <= WINDOW_SECONDS);
    }

    #[test]
    fn test_trailing_silence_flushed() {
        let mut samples = tone(0.5);
        samples.extend(silence(0.75));
        let regions = detect(samples);
        assert_eq!(regions.len(), 1);
        assert!((regions[0].end - 1.25).abs() <= WINDOW_SECONDS);
    }

    #[test]
    fn test_only_first_channel_is_read() {
        let buffer = AudioBuffer {
            sample_rate: RATE,
            channels: vec![silence(1.0), tone(1.0)],
        };
        assert_eq!(detect_silent_regions(&buffer, -40.0, 500.0).len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(detect(Vec::new()).is_empty());
        let zero_rate = AudioBuffer::mono(0, vec![0.0; 100]);
        assert!(detect_silent_regions(&zero_rate, -40.0, 500.0).is_empty());
    }

    #[test]
    fn test_speech_segments_complement() {
        let regions = [
            SilentRegion { start: 2.0, end: 3.0 },
            SilentRegion { start: 0.0, end: 0.5 },
        ];
        let segments = speech_segments(&regions, 5.0, 0.1);
        assert_eq!(
            segments,
            vec![
                SilentRegion { start: 0.5, end: 2.0 },
                SilentRegion { start: 3.0, end: 5.0 },
            ]
        );
    }

    #[test]
    fn test_speech_segments_drops_short_spans() {
        let regions = [SilentRegion { start: 0.05, end: 4.95 }];
        assert!(speech_segments(&regions, 5.0, 0.1).is_empty());
        assert_eq!(speech_segments(&[], 5.0, 0.1), vec![SilentRegion { start: 0.0, end: 5.0 }]);
    }
}
