//! Content-analysis collaborators.
//!
//! Two interchangeable strategies behind [`ContentAnalyzer`]: a
//! chat-completions backed analyzer that asks a model for theme-relevant
//! segments, and an offline keyword analyzer that scores the video's own
//! metadata. Both return raw candidates; validation and ordering belong to
//! the selector.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{ManabiError, Result},
    provider::Provider,
    score::score_text,
    types::{Level, RawSegment, Video},
};

/// Abstract analysis collaborator. A failure is recovered by the caller as
/// "zero segments"; it never aborts the overall assembly.
#[async_trait]
pub trait ContentAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        video: &Video,
        theme: &str,
        level: Level,
        duration: f64,
    ) -> Result<Vec<RawSegment>>;
}

static SEGMENT_ANALYSIS_PROMPT: &str = r#"
  You are a YouTube video content analyzer. From the video metadata below,
  identify the parts most relevant to the given theme at the given level.

  OUTPUT: Return ONLY valid JSON (no markdown, no explanation):
  {
    "segments": [
      {
        "startTime": <seconds>,
        "endTime": <seconds>,
        "relevance": <0-1>,
        "levelFit": <0-1>,
        "summary": "Short description of the inferred content"
      }
    ]
  }

  RULES:
  - Identify up to 3 segments in distinct, non-overlapping time ranges
  - Every segment must be at least 30 seconds long
  - Start and end times must stay within the video duration
  - relevance scores the match against the theme at the requested level
  - levelFit scores how well the segment suits the requested level
  - Do not include segments with relevance below 0.7
"#;

/// LLM-backed strategy: one chat-completions call per video.
pub struct ChatAnalyzer {
    provider: Provider,
    client: reqwest::Client,
}

impl ChatAnalyzer {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            client: reqwest::Client::new(),
        }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }
}

#[derive(Deserialize)]
struct SegmentsEnvelope {
    #[serde(default)]
    segments: Vec<RawSegment>,
}

/// Extract the segments JSON object from model output. Models occasionally
/// wrap the JSON in code fences or prose, so take the outermost braces.
fn parse_segments_response(content: &str) -> Result<Vec<RawSegment>> {
    let start = content.find('{');
    let end = content.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &content[start..=end],
        _ => r#"{"segments":[]}"#,
    };
    let envelope: SegmentsEnvelope = serde_json::from_str(json)?;
    Ok(envelope.segments)
}

#[async_trait]
impl ContentAnalyzer for ChatAnalyzer {
    async fn analyze(
        &self,
        video: &Video,
        theme: &str,
        level: Level,
        duration: f64,
    ) -> Result<Vec<RawSegment>> {
        let config = self.provider.config();
        let api_key = self.provider.validate_api_key()?;

        let user_prompt = format!(
            "Theme: {theme}\nLevel: {level}\nVideo duration: {duration:.0} seconds\n\nTitle: {title}\nDescription: {description}",
            title = video.title,
            description = video.description,
        );

        let response = self
            .client
            .post(config.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&serde_json::json!({
                "model": config.model,
                "messages": [
                    {
                        "role": "system",
                        "content": SEGMENT_ANALYSIS_PROMPT,
                    },
                    {
                        "role": "user",
                        "content": user_prompt,
                    },
                ],
                "temperature": 0.3,
            }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ManabiError::AnalysisFailed {
                video_id: video.id.clone(),
                reason: format!("invalid API response: {response:?}"),
            })?;

        let segments = parse_segments_response(content)?;
        debug!(video_id = %video.id, count = segments.len(), "analysis complete");
        Ok(segments)
    }
}

/// Offline strategy: keyword-score the video's own metadata and, when it
/// matches the theme at all, propose the opening of the video (the
/// first-generation behavior, kept as the zero-network fallback).
pub struct KeywordAnalyzer;

/// Proposed length of the opening segment in seconds.
const OPENING_SEGMENT_LENGTH: f64 = 120.0;

#[async_trait]
impl ContentAnalyzer for KeywordAnalyzer {
    async fn analyze(
        &self,
        video: &Video,
        theme: &str,
        level: Level,
        duration: f64,
    ) -> Result<Vec<RawSegment>> {
        let content = format!("{} {}", video.title, video.description);
        let score = score_text(&content, theme, level);
        if score.relevance <= 0.0 {
            return Ok(Vec::new());
        }
        Ok(vec![RawSegment {
            start_time: 0.0,
            end_time: OPENING_SEGMENT_LENGTH.min(duration),
            relevance: Some(score.relevance),
            level_fit: Some(score.level_fit),
            summary: Some(format!("Opening of \"{}\"", video.title)),
        }])
    }
}
