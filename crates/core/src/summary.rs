//! Learning-guide generation for an assembled playlist.
//!
//! Two strategies behind [`GuideGenerator`]: a chat-completions call that
//! writes a guide from the playlist's video metadata, and an offline
//! template used both as the zero-network strategy and as the fallback when
//! model output cannot be parsed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::{ManabiError, Result},
    provider::Provider,
    types::{Level, Video},
};

/// A term worth knowing, with a one-line explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    pub explanation: String,
}

/// Study companion for a playlist: what the theme is, what to focus on,
/// which terms to know, and in what order to learn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningGuide {
    #[serde(rename = "themeExplanation")]
    pub theme_explanation: String,
    #[serde(rename = "learningPoints")]
    pub learning_points: Vec<String>,
    pub keywords: Vec<Keyword>,
    pub roadmap: Vec<String>,
}

#[async_trait]
pub trait GuideGenerator: Send + Sync {
    async fn generate(
        &self,
        theme: &str,
        level: Level,
        videos: &[Video],
    ) -> Result<LearningGuide>;
}

static GUIDE_PROMPT: &str = r#"
  You are an educational content expert. From the theme, level and related
  video metadata below, write a learning guide with four sections:

  1. themeExplanation: what the theme is and why it matters, at a depth
     suited to the given level (2-4 sentences)
  2. learningPoints: 3-5 key points to focus on while studying this theme
  3. keywords: 3-5 important terms, each with a one-line explanation
  4. roadmap: 3-5 ordered steps for learning this theme at the given level

  OUTPUT: Return ONLY valid JSON (no markdown, no explanation):
  {
    "themeExplanation": "...",
    "learningPoints": ["...", "..."],
    "keywords": [{"term": "...", "explanation": "..."}],
    "roadmap": ["...", "..."]
  }
"#;

/// Deterministic template guide. Used as the offline strategy and as the
/// fallback when a model response yields no usable JSON.
pub fn fallback_guide(theme: &str, level: Level) -> LearningGuide {
    LearningGuide {
        theme_explanation: format!(
            "\"{theme}\" is an important topic. Studying it builds the knowledge a {level} needs.",
        ),
        learning_points: vec![
            format!("Understand the core concepts of {theme}"),
            format!("Learn how {theme} is applied in practice"),
            format!("Follow the current developments around {theme}"),
        ],
        keywords: vec![
            Keyword {
                term: format!("{theme} fundamentals"),
                explanation: format!("The basic concepts needed to understand {theme}"),
            },
            Keyword {
                term: format!("{theme} in practice"),
                explanation: format!("Ways to put {theme} to use on real problems"),
            },
        ],
        roadmap: vec![
            format!("Learn the basics of {theme}"),
            "Deepen your understanding through worked examples".to_string(),
            "Build applied skills".to_string(),
        ],
    }
}

/// Template variations on the theme, offered as follow-up searches.
pub fn related_themes(theme: &str) -> Vec<String> {
    vec![
        format!("{theme} basics"),
        format!("{theme} in practice"),
        format!("history of {theme}"),
        format!("latest developments in {theme}"),
        format!("{theme} and related technology"),
    ]
}

/// Extract the guide JSON object from model output, falling back to the
/// template guide when none can be parsed. Models occasionally wrap the
/// JSON in code fences or prose, so take the outermost braces.
fn parse_guide_response(content: &str, theme: &str, level: Level) -> LearningGuide {
    let start = content.find('{');
    let end = content.rfind('}');
    if let (Some(start), Some(end)) = (start, end)
        && start < end
    {
        match serde_json::from_str::<LearningGuide>(&content[start..=end]) {
            Ok(guide) => return guide,
            Err(e) => warn!("discarding unparsable guide response: {e}"),
        }
    }
    fallback_guide(theme, level)
}

/// LLM-backed strategy: one chat-completions call per playlist.
pub struct ChatGuideGenerator {
    provider: Provider,
    client: reqwest::Client,
}

impl ChatGuideGenerator {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl GuideGenerator for ChatGuideGenerator {
    async fn generate(
        &self,
        theme: &str,
        level: Level,
        videos: &[Video],
    ) -> Result<LearningGuide> {
        let config = self.provider.config();
        let api_key = self.provider.validate_api_key()?;

        let video_info = videos
            .iter()
            .map(|video| format!("Title: {}\nDescription: {}", video.title, video.description))
            .collect::<Vec<_>>()
            .join("\n\n");
        let user_prompt =
            format!("Theme: {theme}\nLevel: {level}\n\nRelated videos:\n{video_info}");

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
                        "content": GUIDE_PROMPT,
                    },
                    {
                        "role": "user",
                        "content": user_prompt,
                    },
                ],
                "temperature": 0.7,
            }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ManabiError::GuideFailed {
                reason: format!("invalid API response: {response:?}"),
            })?;

        Ok(parse_guide_response(content, theme, level))
    }
}

/// Offline strategy: the deterministic template guide.
pub struct OfflineGuideGenerator;

#[async_trait]
impl GuideGenerator for OfflineGuideGenerator {
    async fn generate(
        &self,
        theme: &str,
        level: Level,
        _videos: &[Video],
    ) -> Result<LearningGuide> {
        Ok(fallback_guide(theme, level))
    }
}
