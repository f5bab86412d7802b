use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManabiError {
    #[error("Search failed for \"{query}\": {reason}")]
    SearchFailed { query: String, reason: String },

    #[error("Analysis failed for video {video_id}: {reason}")]
    AnalysisFailed { video_id: String, reason: String },

    #[error("Guide generation failed: {reason}")]
    GuideFailed { reason: String },

    #[error("Theme must not be empty")]
    EmptyTheme,

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ManabiError>;
