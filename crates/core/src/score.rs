//! Relevance and level-fit scoring.
//!
//! Used as the offline strategy when no external analyzer score is available,
//! and for ordering videos before analysis. External scores pass through the
//! selector verbatim (clamped); everything here is deterministic.

use crate::types::Level;

/// Never exclude a candidate on level grounds alone.
pub const LEVEL_FIT_FLOOR: f64 = 0.3;

/// Cue words suggesting introductory content (English/Japanese).
const BEGINNER_CUES: &[&str] = &[
    "beginner",
    "basics",
    "basic",
    "introduction",
    "intro",
    "tutorial",
    "getting started",
    "入門",
    "初心者",
    "基礎",
    "はじめて",
    "やさしい",
];

/// Cue words suggesting applied/intermediate content.
const INTERMEDIATE_CUES: &[&str] = &[
    "intermediate",
    "practical",
    "applied",
    "in practice",
    "hands-on",
    "中級",
    "応用",
    "実践",
    "実用",
];

/// Cue words suggesting advanced content.
const EXPERT_CUES: &[&str] = &[
    "advanced",
    "expert",
    "deep dive",
    "internals",
    "in depth",
    "専門",
    "上級",
    "高度",
    "徹底",
];

/// Relevance and level-fit for one piece of text, both in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextScore {
    pub relevance: f64,
    pub level_fit: f64,
}

/// Score text content against a theme and level.
pub fn score_text(content: &str, theme: &str, level: Level) -> TextScore {
    TextScore {
        relevance: relevance_score(content, theme),
        level_fit: level_fit(difficulty_score(content), level),
    }
}

/// Token-level keyword relevance: split the theme on whitespace into
/// lowercase words; each token matches binarily against the lowercased
/// content; relevance is the matched fraction.
pub fn relevance_score(content: &str, theme: &str) -> f64 {
    let content = content.to_lowercase();
    let tokens: Vec<String> = theme
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect();
    if tokens.is_empty() {
        return 0.0;
    }
    let matched = tokens.iter().filter(|t| content.contains(t.as_str())).count();
    matched as f64 / tokens.len() as f64
}

fn cue_count(content: &str, cues: &[&str]) -> usize {
    cues.iter()
        .map(|cue| content.matches(cue).count())
        .sum()
}

/// Continuous difficulty estimate in `[0, 1]` from cue-word counts.
///
/// The tier with the strictly highest count wins (0.3 beginner-leaning,
/// 0.6 intermediate-leaning, 0.8 expert-leaning); ties or zero signal
/// default to 0.5.
pub fn difficulty_score(content: &str) -> f64 {
    let content = content.to_lowercase();
    let beginner = cue_count(&content, BEGINNER_CUES);
    let intermediate = cue_count(&content, INTERMEDIATE_CUES);
    let expert = cue_count(&content, EXPERT_CUES);

    if beginner > intermediate && beginner > expert {
        0.3
    } else if intermediate > beginner && intermediate > expert {
        0.6
    } else if expert > beginner && expert > intermediate {
        0.8
    } else {
        0.5
    }
}

/// Map a difficulty estimate to a level-fit for the requested level,
/// floored at [`LEVEL_FIT_FLOOR`].
pub fn level_fit(difficulty: f64, level: Level) -> f64 {
    let fit = match level {
        Level::Beginner => 1.0 - difficulty * 0.8,
        Level::Intermediate => 1.0 - (difficulty - 0.5).abs() * 2.0,
        Level::Expert => difficulty,
    };
    fit.max(LEVEL_FIT_FLOOR)
}
