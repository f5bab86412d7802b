//! Video search collaborator: YouTube Data API v3.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{ManabiError, Result},
    types::Video,
};

pub const YOUTUBE_API_KEY_VAR: &str = "YOUTUBE_API_KEY";

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

/// Abstract search collaborator consumed by the assembly pipeline.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Video>>;

    /// Total duration of a video in seconds.
    async fn video_duration(&self, video_id: &str) -> Result<f64>;
}

pub struct YoutubeSearch {
    api_key: String,
    client: reqwest::Client,
}

impl YoutubeSearch {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Build from the `YOUTUBE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(YOUTUBE_API_KEY_VAR).map_err(|_| {
            ManabiError::MissingApiKey {
                env_var: YOUTUBE_API_KEY_VAR.to_string(),
            }
        })?;
        Ok(Self::new(api_key))
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    items: Option<Vec<SearchItem>>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct VideosResponse {
    items: Option<Vec<VideoItem>>,
}

#[derive(Deserialize)]
struct VideoItem {
    #[serde(rename = "contentDetails")]
    content_details: ContentDetails,
}

#[derive(Deserialize)]
struct ContentDetails {
    duration: String,
}

#[async_trait]
impl SearchProvider for YoutubeSearch {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Video>> {
        let max_results = max_results.to_string();
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("maxResults", max_results.as_str()),
                ("type", "video"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .json::<SearchResponse>()
            .await?;

        // No `items` at all usually means an invalid or restricted API key.
        let items = response.items.ok_or_else(|| ManabiError::SearchFailed {
            query: query.to_string(),
            reason: "invalid search response (API key invalid or restricted?)".to_string(),
        })?;

        let videos: Vec<Video> = items
            .into_iter()
            .filter_map(|item| {
                item.id.video_id.map(|id| Video {
                    id,
                    title: item.snippet.title,
                    description: item.snippet.description,
                })
            })
            .collect();
        debug!(query, count = videos.len(), "search complete");
        Ok(videos)
    }

    async fn video_duration(&self, video_id: &str) -> Result<f64> {
        let response = self
            .client
            .get(VIDEOS_URL)
            .query(&[
                ("part", "snippet,contentDetails"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .json::<VideosResponse>()
            .await?;

        let item = response
            .items
            .and_then(|items| items.into_iter().next())
            .ok_or_else(|| ManabiError::AnalysisFailed {
                video_id: video_id.to_string(),
                reason: "video not found".to_string(),
            })?;

        Ok(parse_iso8601_duration(&item.content_details.duration) as f64)
    }
}

/// Parse an ISO-8601 duration of the shape YouTube returns (`PT1H2M30S`)
/// into seconds. Unparseable input yields 0, which downstream treats as
/// "duration unknown" (the video contributes nothing).
pub fn parse_iso8601_duration(value: &str) -> u64 {
    let Some(rest) = value.strip_prefix("PT").or_else(|| value.strip_prefix("P")) else {
        return 0;
    };

    let mut total = 0u64;
    let mut digits = String::new();
    for c in rest.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let Ok(n) = digits.parse::<u64>() else {
            return 0;
        };
        digits.clear();
        match c {
            'H' => total += n * 3600,
            'M' => total += n * 60,
            'S' => total += n,
            _ => return 0,
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_durations() {
        assert_eq!(parse_iso8601_duration("PT1H2M30S"), 3750);
        assert_eq!(parse_iso8601_duration("PT15M"), 900);
        assert_eq!(parse_iso8601_duration("PT45S"), 45);
        assert_eq!(parse_iso8601_duration("PT2H"), 7200);
    }

    #[test]
    fn garbage_durations_parse_to_zero() {
        assert_eq!(parse_iso8601_duration(""), 0);
        assert_eq!(parse_iso8601_duration("12:30"), 0);
        assert_eq!(parse_iso8601_duration("PTXS"), 0);
    }

    #[test]
    fn search_response_shape_matches_api() {
        let json = r#"{
            "items": [
                {
                    "id": {"videoId": "abc123"},
                    "snippet": {"title": "Rust 入門", "description": "基礎から"}
                },
                {
                    "id": {},
                    "snippet": {"title": "channel result", "description": ""}
                }
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        let items = parsed.items.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id.video_id.as_deref(), Some("abc123"));
        assert!(items[1].id.video_id.is_none());
    }

    #[test]
    fn videos_response_shape_matches_api() {
        let json = r#"{"items": [{"contentDetails": {"duration": "PT4M13S"}}]}"#;
        let parsed: VideosResponse = serde_json::from_str(json).unwrap();
        let duration = &parsed.items.unwrap()[0].content_details.duration;
        assert_eq!(parse_iso8601_duration(duration), 253);
    }
}
