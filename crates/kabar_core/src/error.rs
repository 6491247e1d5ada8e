use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to fetch {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Invalid article content: {0}")]
    InvalidContent(String),

    #[error("Unsupported news source: {0}")]
    UnsupportedSource(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// How an error should be surfaced by whatever transport sits in front of the
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller asked for something that cannot exist (unknown source).
    Client,
    /// The article is missing or could not be extracted.
    NotFound,
    /// The upstream site failed or refused the request.
    Upstream,
    Internal,
}

impl Error {
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::UnsupportedSource(_) => ErrorClass::Client,
            Error::NotFound(_) | Error::InvalidContent(_) => ErrorClass::NotFound,
            Error::FetchFailed { .. } | Error::Forbidden(_) => ErrorClass::Upstream,
            Error::Http(_) | Error::Serialization(_) => ErrorClass::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
