//! Duration-bounded greedy playlist packing across videos.

use std::collections::HashSet;

use tracing::debug;

use crate::types::{Playlist, PlaylistEntry, Segment, Video};

/// Cap on how many videos are analyzed per assembly.
pub const DEFAULT_MAX_VIDEOS: usize = 5;

/// A video carrying its overall score and its ordered, selected segments.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredVideo {
    pub video: Video,
    pub relevance: f64,
    pub level_fit: f64,
    pub segments: Vec<Segment>,
}

impl ScoredVideo {
    pub fn score(&self) -> f64 {
        self.relevance * self.level_fit
    }
}

/// Incremental packer.
///
/// Consumes one video's selected segments at a time so the assembly loop can
/// stop issuing analysis calls as soon as the playlist is full. The greedy
/// policy follows the segment order the selector produced (best-first): a
/// segment that would overshoot the target is skipped, not a loop break, so
/// a later shorter segment from the same video may still fit.
#[derive(Debug)]
pub struct PlaylistPacker {
    target_duration: f64,
    max_videos: usize,
    total_duration: f64,
    analyzed_count: usize,
    seen_video_ids: HashSet<String>,
    entries: Vec<PlaylistEntry>,
}

impl PlaylistPacker {
    pub fn new(target_duration: f64, max_videos: usize) -> Self {
        Self {
            target_duration,
            max_videos,
            total_duration: 0.0,
            analyzed_count: 0,
            seen_video_ids: HashSet::new(),
            entries: Vec::new(),
        }
    }

    /// True once the target duration or the analyzed-videos cap is reached.
    pub fn is_full(&self) -> bool {
        self.total_duration >= self.target_duration || self.analyzed_count >= self.max_videos
    }

    /// True if this video was already consumed (no duplicate video entries).
    pub fn has_seen(&self, video_id: &str) -> bool {
        self.seen_video_ids.contains(video_id)
    }

    /// Consume one video's ordered segments. The video counts against the
    /// analyzed cap even when it contributes no entries (a failed or empty
    /// analysis still spent the analysis budget).
    pub fn push_video(&mut self, video: &Video, segments: Vec<Segment>) {
        if self.is_full() || self.has_seen(&video.id) {
            return;
        }

        for segment in segments {
            let segment_duration = segment.duration();
            if self.total_duration + segment_duration > self.target_duration {
                continue;
            }
            self.entries.push(PlaylistEntry {
                video: video.clone(),
                segment,
            });
            self.total_duration += segment_duration;
            if self.total_duration >= self.target_duration {
                break;
            }
        }

        self.seen_video_ids.insert(video.id.clone());
        self.analyzed_count += 1;
        debug!(
            video_id = %video.id,
            total = self.total_duration,
            entries = self.entries.len(),
            "packed video"
        );
    }

    pub fn finish(self) -> Playlist {
        Playlist {
            entries: self.entries,
            total_duration: self.total_duration,
            target_duration: self.target_duration,
        }
    }
}

/// Pack a playlist from fully-scored videos: stable-sort by overall score
/// descending, then feed the packer in order. Deterministic for identical
/// inputs; an empty result is a valid outcome, not an error.
pub fn pack_playlist(
    mut videos: Vec<ScoredVideo>,
    target_duration: f64,
    max_videos: usize,
) -> Playlist {
    // Stable: ties keep input order.
    videos.sort_by(|a, b| b.score().total_cmp(&a.score()));

    let mut packer = PlaylistPacker::new(target_duration, max_videos);
    for scored in videos {
        if packer.is_full() {
            break;
        }
        packer.push_video(&scored.video, scored.segments);
    }
    packer.finish()
}
