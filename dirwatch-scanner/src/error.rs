use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("HTTP request for {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Malformed Last-Modified header on {url}: {value:?}")]
    MalformedTimestamp { url: String, value: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl CrawlError {
    /// True for transport failures and non-success statuses, the errors that abort a crawl.
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, CrawlError::Fetch { .. } | CrawlError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;
