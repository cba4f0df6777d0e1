/// Errors raised while fetching, parsing or caching schedule data
#[derive(Debug, thiserror::Error)]
pub enum SignageError {
    #[error("download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    #[error("feed parse error: {0}")]
    Parse(String),

    #[error("unrecognized day name: {0}")]
    UnknownDay(String),

    #[error("invalid time of day: {0}")]
    InvalidTime(String),

    #[error("no presentations found for room {0}")]
    EmptySchedule(String),

    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("speaker id {0:?} cannot be used as a cache file name")]
    InvalidSpeakerId(String),

    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SignageError>;

impl From<serde_json::Error> for SignageError {
    fn from(error: serde_json::Error) -> Self {
        SignageError::Parse(error.to_string())
    }
}

impl From<toml::de::Error> for SignageError {
    fn from(error: toml::de::Error) -> Self {
        SignageError::InvalidConfiguration(error.to_string())
    }
}
