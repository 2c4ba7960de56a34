// SPDX-License-Identifier: MIT OR Apache-2.0
//! Automatic clip placement for `auto_cut`.

use clipline_editor_media::{speech_segments, SilentRegion};
use clipline_editor_timeline::MIN_CLIP_DURATION;
use tracing::debug;

use crate::actions::AutoCutStrategy;

/// Clip count used when neither a count nor a target length is given
pub const DEFAULT_CLIP_COUNT: usize = 3;

/// A planned clip span in source seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutSpan {
    /// In-point
    pub start: f64,
    /// Out-point
    pub end: f64,
}

impl CutSpan {
    fn len(&self) -> f64 {
        self.end - self.start
    }
}

/// Number of clips to cut `duration` seconds into.
///
/// An explicit count wins, then `ceil(duration / target)`, then
/// [`DEFAULT_CLIP_COUNT`]. The result never makes a clip shorter than the
/// minimum clip length.
pub fn clip_count_for(duration: f64, target_duration: Option<f64>, clip_count: Option<u32>) -> usize {
    let requested = match (clip_count, target_duration) {
        (Some(count), _) => count as usize,
        (None, Some(target)) if target > 0.0 => (duration / target).ceil() as usize,
        _ => DEFAULT_CLIP_COUNT,
    };
    let fit = (duration / MIN_CLIP_DURATION).floor() as usize;
    requested.clamp(1, fit.max(1))
}

/// Plan the clip spans for an `auto_cut` over `[0, duration]`.
///
/// `Proportional` follows the speech between `silent_regions`, falling back
/// to `Even` when there is no usable speech.
pub fn plan_cuts(
    duration: f64,
    strategy: AutoCutStrategy,
    count: usize,
    silent_regions: &[SilentRegion],
) -> Vec<CutSpan> {
    if !duration.is_finite() || duration <= 0.0 || count == 0 {
        return Vec::new();
    }

    if strategy == AutoCutStrategy::Proportional {
        let speech: Vec<CutSpan> = speech_segments(silent_regions, duration, MIN_CLIP_DURATION)
            .into_iter()
            .map(|s| CutSpan {
                start: s.start,
                end: s.end,
            })
            .collect();
        if !speech.is_empty() {
            debug!("Cutting {} clips across {} speech segments", count, speech.len());
            return if count >= speech.len() {
                split_segments(&speech, count)
            } else {
                group_segments(&speech, count)
            };
        }
        debug!("No speech segments, falling back to even cuts");
    }

    even_cuts(CutSpan { start: 0.0, end: duration }, count)
}

fn even_cuts(span: CutSpan, count: usize) -> Vec<CutSpan> {
    let step = span.len() / count as f64;
    (0..count)
        .map(|i| CutSpan {
            start: span.start + step * i as f64,
            end: if i + 1 == count {
                span.end
            } else {
                span.start + step * (i + 1) as f64
            },
        })
        .collect()
}

/// At least one clip per segment, the rest shared by segment length
fn split_segments(segments: &[CutSpan], count: usize) -> Vec<CutSpan> {
    let total: f64 = segments.iter().map(CutSpan::len).sum();
    let extra = (count - segments.len()) as f64;

    let shares: Vec<f64> = segments.iter().map(|s| extra * s.len() / total).collect();
    let mut counts: Vec<usize> = shares.iter().map(|s| 1 + s.floor() as usize).collect();

    // Largest remainder for whatever the floors left over
    let leftover = count.saturating_sub(counts.iter().sum());
    let mut order: Vec<usize> = (0..segments.len()).collect();
    order.sort_by(|&a, &b| (shares[b] - shares[b].floor()).total_cmp(&(shares[a] - shares[a].floor())));
    for &i in order.iter().cycle().take(leftover) {
        counts[i] += 1;
    }

    segments
        .iter()
        .zip(counts)
        .flat_map(|(segment, n)| {
            let fit = ((segment.len() / MIN_CLIP_DURATION).floor() as usize).max(1);
            even_cuts(*segment, n.min(fit))
        })
        .collect()
}

/// Merge neighbouring segments into `count` groups of similar speech time
fn group_segments(segments: &[CutSpan], count: usize) -> Vec<CutSpan> {
    let total: f64 = segments.iter().map(CutSpan::len).sum();
    let target = total / count as f64;

    let mut groups = Vec::with_capacity(count);
    let mut group_start = segments[0].start;
    let mut spoken = 0.0;

    for (i, segment) in segments.iter().enumerate() {
        spoken += segment.len();
        let last = i + 1 == segments.len();
        let groups_left = count - groups.len() - 1;
        let segments_left = segments.len() - i - 1;
        let reached = spoken >= target * (groups.len() + 1) as f64;

        if last || (groups_left > 0 && (reached || segments_left == groups_left)) {
            groups.push(CutSpan {
                start: group_start,
                end: segment.end,
            });
            if let Some(next) = segments.get(i + 1) {
                group_start = next.start;
            }
        }
    }
    groups
}
