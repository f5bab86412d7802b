//! Disk cache for analyzer output, keyed by (video, theme, level).

use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use crate::{
    analyze::ContentAnalyzer,
    error::Result,
    types::{Level, RawSegment, Video},
};

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("manabi")
}

fn analysis_file_name(video_id: &str, theme: &str, level: Level) -> String {
    let mut hasher = DefaultHasher::new();
    video_id.hash(&mut hasher);
    theme.hash(&mut hasher);
    level.name().hash(&mut hasher);
    format!("analysis_{}.json", hasher.finish())
}

/// Cache file for one (video, theme, level) analysis.
pub fn get_analysis_path(video_id: &str, theme: &str, level: Level) -> PathBuf {
    get_root_cache_dir().join(analysis_file_name(video_id, theme, level))
}

/// Decorates any analyzer with a read-through disk cache. `force` bypasses
/// reads but still refreshes the cache on success.
///
/// The cache is strictly best-effort: an unreadable file is re-analyzed,
/// and a failed write is logged rather than surfaced, so a broken cache
/// directory cannot turn a successful analysis into an excluded video.
pub struct CachedAnalyzer<A: ContentAnalyzer> {
    inner: A,
    force: bool,
    root: PathBuf,
}

impl<A: ContentAnalyzer> CachedAnalyzer<A> {
    pub fn new(inner: A, force: bool) -> Self {
        Self::with_root(inner, force, get_root_cache_dir())
    }

    pub fn with_root(inner: A, force: bool, root: PathBuf) -> Self {
        Self { inner, force, root }
    }
}

async fn store(path: &Path, segments: &[RawSegment]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, serde_json::to_string_pretty(segments)?).await?;
    Ok(())
}

#[async_trait]
impl<A: ContentAnalyzer> ContentAnalyzer for CachedAnalyzer<A> {
    async fn analyze(
        &self,
        video: &Video,
        theme: &str,
        level: Level,
        duration: f64,
    ) -> Result<Vec<RawSegment>> {
        let path = self.root.join(analysis_file_name(&video.id, theme, level));

        if !self.force
            && let Ok(json) = fs::read_to_string(&path).await
        {
            match serde_json::from_str::<Vec<RawSegment>>(&json) {
                Ok(segments) => {
                    debug!(video_id = %video.id, path = %path.display(), "analysis cache hit");
                    return Ok(segments);
                }
                Err(e) => warn!(path = %path.display(), "discarding unreadable cache file: {e}"),
            }
        }

        let segments = self.inner.analyze(video, theme, level, duration).await?;

        if let Err(e) = store(&path, &segments).await {
            warn!(path = %path.display(), "failed to write analysis cache: {e}");
        }
        Ok(segments)
    }
}
