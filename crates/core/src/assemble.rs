//! Playlist assembly: score videos, analyze them in score order, pack.

use tracing::{debug, warn};

use crate::{
    analyze::ContentAnalyzer,
    error::{ManabiError, Result},
    pack::{DEFAULT_MAX_VIDEOS, PlaylistPacker, ScoredVideo},
    score::score_text,
    search::SearchProvider,
    select::select_segments,
    types::{Level, Playlist, Segment, Video},
};

#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Target total playlist duration in seconds.
    pub target_duration: f64,
    /// Cap on videos analyzed (and counted even when they fail).
    pub max_videos: usize,
    /// Optional relevance cutoff applied by the selector.
    pub relevance_threshold: Option<f64>,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            target_duration: 600.0,
            max_videos: DEFAULT_MAX_VIDEOS,
            relevance_threshold: None,
        }
    }
}

/// Order candidate videos by metadata score against the theme and level.
/// Stable: equally-scored videos keep the search ranking.
pub fn rank_videos(videos: Vec<Video>, theme: &str, level: Level) -> Vec<ScoredVideo> {
    let mut ranked: Vec<ScoredVideo> = videos
        .into_iter()
        .map(|video| {
            let content = format!("{} {}", video.title, video.description);
            let score = score_text(&content, theme, level);
            ScoredVideo {
                video,
                relevance: score.relevance,
                level_fit: score.level_fit,
                segments: Vec::new(),
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));
    ranked
}

/// Assemble a bounded-duration playlist from candidate videos.
///
/// Videos are analyzed sequentially in score order; analysis stops as soon
/// as the packer reports full, so the cap bounds collaborator fan-out. A
/// failing duration lookup or analysis excludes only that video (it still
/// counts against the cap). An empty playlist is `Ok` — "no relevant
/// content" is an outcome for the caller to report, not an error.
pub async fn assemble_playlist<S, A>(
    search: &S,
    analyzer: &A,
    videos: Vec<Video>,
    theme: &str,
    level: Level,
    options: &AssembleOptions,
) -> Result<Playlist>
where
    S: SearchProvider + ?Sized,
    A: ContentAnalyzer + ?Sized,
{
    if theme.trim().is_empty() {
        return Err(ManabiError::EmptyTheme);
    }

    let ranked = rank_videos(videos, theme, level);
    let mut packer = PlaylistPacker::new(options.target_duration, options.max_videos);

    for scored in ranked {
        if packer.is_full() {
            break;
        }
        let video = &scored.video;
        if packer.has_seen(&video.id) {
            continue;
        }

        let segments = match analyze_one(search, analyzer, video, theme, level, options).await {
            Ok(segments) => segments,
            Err(e) => {
                warn!(video_id = %video.id, "excluding video from playlist: {e}");
                Vec::new()
            }
        };

        packer.push_video(video, segments);
    }

    let playlist = packer.finish();
    debug!(
        entries = playlist.len(),
        total = playlist.total_duration,
        target = playlist.target_duration,
        "assembly complete"
    );
    Ok(playlist)
}

async fn analyze_one<S, A>(
    search: &S,
    analyzer: &A,
    video: &Video,
    theme: &str,
    level: Level,
    options: &AssembleOptions,
) -> Result<Vec<Segment>>
where
    S: SearchProvider + ?Sized,
    A: ContentAnalyzer + ?Sized,
{
    let duration = search.video_duration(&video.id).await?;
    let raw = analyzer.analyze(video, theme, level, duration).await?;
    Ok(select_segments(raw, duration, options.relevance_threshold))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::types::RawSegment;

    struct StubSearch {
        durations: HashMap<String, f64>,
    }

    #[async_trait]
    impl SearchProvider for StubSearch {
        async fn search(&self, _query: &str, _max_results: u32) -> Result<Vec<Video>> {
            unreachable!("assembly never searches on its own")
        }

        async fn video_duration(&self, video_id: &str) -> Result<f64> {
            match self.durations.get(video_id) {
                Some(duration) => Ok(*duration),
                None => panic!("unexpected duration lookup for {video_id}"),
            }
        }
    }

    struct StubAnalyzer {
        segments: HashMap<String, Vec<RawSegment>>,
        failing: Vec<String>,
    }

    #[async_trait]
    impl ContentAnalyzer for StubAnalyzer {
        async fn analyze(
            &self,
            video: &Video,
            _theme: &str,
            _level: Level,
            _duration: f64,
        ) -> Result<Vec<RawSegment>> {
            if self.failing.contains(&video.id) {
                return Err(ManabiError::AnalysisFailed {
                    video_id: video.id.clone(),
                    reason: "boom".to_string(),
                });
            }
            Ok(self.segments.get(&video.id).cloned().unwrap_or_default())
        }
    }

    fn video(id: &str, title: &str) -> Video {
        Video {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
        }
    }

    fn raw(start: f64, end: f64, relevance: f64) -> RawSegment {
        RawSegment {
            start_time: start,
            end_time: end,
            relevance: Some(relevance),
            level_fit: Some(1.0),
            summary: None,
        }
    }

    #[tokio::test]
    async fn assembles_across_videos_up_to_the_target() {
        let search = StubSearch {
            durations: HashMap::from([("a".to_string(), 600.0), ("b".to_string(), 600.0)]),
        };
        let analyzer = StubAnalyzer {
            segments: HashMap::from([
                ("a".to_string(), vec![raw(0.0, 60.0, 0.9)]),
                ("b".to_string(), vec![raw(0.0, 60.0, 0.9)]),
            ]),
            failing: Vec::new(),
        };
        let playlist = assemble_playlist(
            &search,
            &analyzer,
            vec![video("a", "rust basics"), video("b", "rust basics too")],
            "rust",
            Level::Beginner,
            &AssembleOptions {
                target_duration: 120.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.total_duration, 120.0);
    }

    #[tokio::test]
    async fn failing_analysis_excludes_only_that_video_but_spends_the_cap() {
        let search = StubSearch {
            durations: HashMap::from([("bad".to_string(), 600.0), ("good".to_string(), 600.0)]),
        };
        let analyzer = StubAnalyzer {
            segments: HashMap::from([("good".to_string(), vec![raw(0.0, 60.0, 0.9)])]),
            failing: vec!["bad".to_string()],
        };

        // Cap of 2 leaves room for the good video after the failure.
        let playlist = assemble_playlist(
            &search,
            &analyzer,
            vec![video("bad", "rust rust"), video("good", "rust")],
            "rust",
            Level::Beginner,
            &AssembleOptions {
                target_duration: 600.0,
                max_videos: 2,
                relevance_threshold: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.entries[0].video.id, "good");

        // Cap of 1 is spent entirely on the failing video.
        let playlist = assemble_playlist(
            &search,
            &analyzer,
            vec![video("bad", "rust rust"), video("good", "rust")],
            "rust",
            Level::Beginner,
            &AssembleOptions {
                target_duration: 600.0,
                max_videos: 1,
                relevance_threshold: None,
            },
        )
        .await
        .unwrap();
        assert!(playlist.is_empty());
    }

    #[tokio::test]
    async fn empty_theme_is_rejected() {
        let search = StubSearch {
            durations: HashMap::new(),
        };
        let analyzer = StubAnalyzer {
            segments: HashMap::new(),
            failing: Vec::new(),
        };
        let result = assemble_playlist(
            &search,
            &analyzer,
            Vec::new(),
            "  ",
            Level::Beginner,
            &AssembleOptions::default(),
        )
        .await;
        assert!(matches!(result, Err(ManabiError::EmptyTheme)));
    }

    #[tokio::test]
    async fn no_candidates_is_an_empty_playlist_not_an_error() {
        let search = StubSearch {
            durations: HashMap::new(),
        };
        let analyzer = StubAnalyzer {
            segments: HashMap::new(),
            failing: Vec::new(),
        };
        let playlist = assemble_playlist(
            &search,
            &analyzer,
            Vec::new(),
            "rust",
            Level::Beginner,
            &AssembleOptions::default(),
        )
        .await
        .unwrap();
        assert!(playlist.is_empty());
        assert_eq!(playlist.target_duration, 600.0);
    }

    #[tokio::test]
    async fn stops_issuing_analysis_once_full() {
        // The first (best) video alone hits the target; the stub has no
        // duration for the second, so the loop must not reach it.
        let search = StubSearch {
            durations: HashMap::from([("a".to_string(), 600.0)]),
        };
        let analyzer = StubAnalyzer {
            segments: HashMap::from([("a".to_string(), vec![raw(0.0, 60.0, 0.9)])]),
            failing: Vec::new(),
        };
        let playlist = assemble_playlist(
            &search,
            &analyzer,
            vec![video("a", "rust rust rust"), video("b", "unrelated")],
            "rust",
            Level::Beginner,
            &AssembleOptions {
                target_duration: 60.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.total_duration, 60.0);
    }

    #[test]
    fn ranking_is_stable_for_equal_scores() {
        let ranked = rank_videos(
            vec![
                video("first", "rust intro"),
                video("second", "rust intro"),
                video("third", "unrelated"),
            ],
            "rust",
            Level::Beginner,
        );
        let ids: Vec<&str> = ranked.iter().map(|s| s.video.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }
}
