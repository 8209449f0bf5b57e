use thiserror::Error;

/// Failures of the classifier round trip. All of them surface to the user
/// as the same banner; the variant only matters for the log.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

/// Local problems loading a document before it is staged.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Could not read file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("A submission is already in flight")]
    Busy,
    #[error("Message body is required")]
    EmptyPrompt,
    #[error("No file staged for upload")]
    NoFileStaged,
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set (neither runtime nor embedded)")]
    Missing(&'static str),
    #[error("{var} is not a valid http(s) URL: {value}")]
    InvalidUrl { var: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, SubmissionError>;
