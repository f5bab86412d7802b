//! Manabi Core Library
//!
//! Core functionality for assembling bounded-duration, theme-relevant
//! YouTube playlists and sequencing playback over them.

pub mod analyze;
pub mod assemble;
pub mod cache;
pub mod error;
pub mod format;
pub mod interval;
pub mod pack;
pub mod provider;
pub mod score;
pub mod search;
pub mod select;
pub mod sequencer;
pub mod summary;
pub mod types;

// Re-export commonly used items at crate root
pub use analyze::{ChatAnalyzer, ContentAnalyzer, KeywordAnalyzer};
pub use assemble::{AssembleOptions, assemble_playlist, rank_videos};
pub use cache::{CachedAnalyzer, get_analysis_path, get_root_cache_dir};
pub use error::{ManabiError, Result};
pub use format::{format_guide_readable, format_playlist_readable, format_timestamp};
pub use interval::{dedupe_by_overlap, overlaps};
pub use pack::{DEFAULT_MAX_VIDEOS, PlaylistPacker, ScoredVideo, pack_playlist};
pub use provider::{Provider, ProviderConfig};
pub use score::{TextScore, difficulty_score, level_fit, relevance_score, score_text};
pub use search::{SearchProvider, YoutubeSearch, parse_iso8601_duration};
pub use select::{
    DEFAULT_RELEVANCE_THRESHOLD, MAX_SEGMENTS_PER_VIDEO, MIN_SEGMENT_LENGTH, select_segments,
};
pub use sequencer::{Advance, Player, PlayerEvent, Sequencer};
pub use summary::{
    ChatGuideGenerator, GuideGenerator, Keyword, LearningGuide, OfflineGuideGenerator,
    fallback_guide, related_themes,
};
pub use types::{Level, Playlist, PlaylistEntry, RawSegment, Segment, Video};
