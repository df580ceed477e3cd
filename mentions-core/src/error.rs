use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Reddit request failed: {0}")]
    RedditApi(#[from] RedditApiError),

    #[error("Invalid setup: {0}")]
    Config(#[from] ConfigError),

    #[error("Result store error: {0}")]
    Store(#[from] StoreError),

    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP transport failed: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Error, Debug, Clone)]
pub enum RedditApiError {
    #[error("Application login rejected: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Rate limited by Reddit, retry in {retry_after}s")]
    RateLimitExceeded { retry_after: u64 },

    #[error("Access to {resource} is forbidden")]
    Forbidden { resource: String },

    #[error("No such subreddit: r/{subreddit}")]
    SubredditNotFound { subreddit: String },

    #[error("Submission {post_id} does not exist")]
    PostNotFound { post_id: String },

    #[error("Access token rejected")]
    InvalidToken,

    #[error("Reddit did not answer in time")]
    RequestTimeout,

    #[error("Unexpected listing payload: {details}")]
    InvalidResponse { details: String },

    #[error("Reddit returned HTTP {status_code}")]
    ServerError { status_code: u16 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Search config {path} does not exist")]
    FileNotFound { path: String },

    #[error("Search config lacks {field}")]
    MissingField { field: String },

    #[error("Bad value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("{var_name} is not set")]
    MissingEnvironmentVariable { var_name: String },

    #[error("Search config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to write results to {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode results for {path}: {source}")]
    EncodeFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Invalid email address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {reason}")]
    MessageBuild { reason: String },

    #[error("SMTP transport error: {reason}")]
    Transport { reason: String },

    #[error("SMTP server rejected the message: {reason}")]
    Rejected { reason: String },
}
