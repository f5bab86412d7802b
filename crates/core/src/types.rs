use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A video as returned by the search provider. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// A validated, scored slice of one video.
///
/// After selection the invariants hold: `0 <= start_time < end_time <= duration`
/// and `end_time - start_time >= MIN_SEGMENT_LENGTH`, scores in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start_time: f64,
    pub end_time: f64,
    pub relevance: f64,
    pub level_fit: f64,
    pub summary: String,
}

impl Segment {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Combined ranking key.
    pub fn score(&self) -> f64 {
        self.relevance * self.level_fit
    }
}

/// Analyzer wire shape. Scores and summary may be missing; the selector
/// defaults them deterministically rather than discarding the segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    #[serde(rename = "startTime")]
    pub start_time: f64,
    #[serde(rename = "endTime")]
    pub end_time: f64,
    #[serde(default)]
    pub relevance: Option<f64>,
    #[serde(rename = "levelFit", default)]
    pub level_fit: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// One playable unit: a video paired with the chosen segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub video: Video,
    pub segment: Segment,
}

/// Ordered playback sequence produced by the packer.
///
/// An empty playlist is a first-class outcome ("no relevant content found"),
/// distinct from a provider failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub entries: Vec<PlaylistEntry>,
    pub total_duration: f64,
    pub target_duration: f64,
}

impl Playlist {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Requested experience level. Drives level-fit weighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Level {
    pub fn name(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Expert => "expert",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "expert" => Ok(Level::Expert),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_duration_and_score() {
        let seg = Segment {
            start_time: 30.0,
            end_time: 90.0,
            relevance: 0.8,
            level_fit: 0.5,
            summary: String::new(),
        };
        assert_eq!(seg.duration(), 60.0);
        assert_eq!(seg.score(), 0.4);
    }

    #[test]
    fn raw_segment_tolerates_missing_scores() {
        let raw: RawSegment =
            serde_json::from_str(r#"{"startTime": 10, "endTime": 70}"#).unwrap();
        assert_eq!(raw.start_time, 10.0);
        assert!(raw.relevance.is_none());
        assert!(raw.level_fit.is_none());
        assert!(raw.summary.is_none());
    }

    #[test]
    fn level_round_trips_through_str() {
        for level in [Level::Beginner, Level::Intermediate, Level::Expert] {
            assert_eq!(level.name().parse::<Level>().unwrap(), level);
        }
        assert!("guru".parse::<Level>().is_err());
    }
}
