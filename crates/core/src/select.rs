//! Per-video segment selection: validate, clean, order.

use tracing::debug;

use crate::{
    interval::dedupe_by_overlap,
    types::{RawSegment, Segment},
};

/// Minimum useful segment length in seconds.
pub const MIN_SEGMENT_LENGTH: f64 = 30.0;

/// Relevance cutoff applied when a threshold policy is requested.
pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 0.7;

/// At most this many segments survive per video.
pub const MAX_SEGMENTS_PER_VIDEO: usize = 3;

/// Deterministic stand-in for a missing or malformed analyzer score.
const DEFAULT_SCORE: f64 = 0.5;

fn sanitize_score(score: Option<f64>) -> f64 {
    match score {
        Some(s) if s.is_finite() => s.clamp(0.0, 1.0),
        _ => DEFAULT_SCORE,
    }
}

/// Turn raw analyzer candidates into a validated, non-overlapping,
/// best-first list of at most [`MAX_SEGMENTS_PER_VIDEO`] segments.
///
/// Malformed bounds are clamped into the video rather than rejected
/// wholesale; segments that cannot be clamped to a valid range are dropped.
/// A video with unknown or too-short duration contributes nothing.
pub fn select_segments(
    raw: Vec<RawSegment>,
    duration: f64,
    relevance_threshold: Option<f64>,
) -> Vec<Segment> {
    if !duration.is_finite() || duration < MIN_SEGMENT_LENGTH {
        debug!(duration, "video too short or duration unknown, skipping");
        return Vec::new();
    }

    let mut segments: Vec<Segment> = raw
        .into_iter()
        .filter_map(|candidate| {
            if !candidate.start_time.is_finite() || !candidate.end_time.is_finite() {
                return None;
            }
            let start_time = candidate.start_time.clamp(0.0, duration - MIN_SEGMENT_LENGTH);
            let end_time = candidate.end_time.clamp(start_time + MIN_SEGMENT_LENGTH, duration);
            if end_time <= start_time {
                return None;
            }
            Some(Segment {
                start_time,
                end_time,
                relevance: sanitize_score(candidate.relevance),
                level_fit: sanitize_score(candidate.level_fit),
                summary: candidate.summary.unwrap_or_default(),
            })
        })
        .collect();

    if let Some(threshold) = relevance_threshold {
        segments.retain(|s| s.relevance >= threshold);
    }

    // Best-first; ties broken by earlier start. Stable.
    segments.sort_by(|a, b| {
        b.score()
            .total_cmp(&a.score())
            .then(a.start_time.total_cmp(&b.start_time))
    });

    let mut kept = dedupe_by_overlap(segments);
    kept.truncate(MAX_SEGMENTS_PER_VIDEO);
    kept
}
