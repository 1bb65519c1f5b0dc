use crate::error::{CrawlError, Result};
use reqwest::header::LAST_MODIFIED;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// The parts of a HEAD response the crawler looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadResponse {
    pub last_modified: Option<String>,
}

impl HeadResponse {
    pub fn file(last_modified: impl Into<String>) -> Self {
        Self {
            last_modified: Some(last_modified.into()),
        }
    }

    pub fn directory() -> Self {
        Self::default()
    }
}

/// Network access used by the crawler. [`HttpFetcher`] talks HTTP; tests
/// plug in an in-memory site.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    /// Metadata-only request used to classify a URL.
    async fn head(&self, url: &Url) -> Result<HeadResponse>;

    /// Full body of a directory listing page.
    async fn get(&self, url: &Url) -> Result<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("dirwatch/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(CrawlError::Client)?;

        Ok(Self { client })
    }

    fn check_status(url: &Url, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }

    fn transport_error(url: &Url) -> impl FnOnce(reqwest::Error) -> CrawlError + '_ {
        move |source| CrawlError::Fetch {
            url: url.to_string(),
            source,
        }
    }
}

impl Fetch for HttpFetcher {
    async fn head(&self, url: &Url) -> Result<HeadResponse> {
        debug!("HEAD {}", url);
        let response = self
            .client
            .head(url.clone())
            .send()
            .await
            .map_err(Self::transport_error(url))?;
        let response = Self::check_status(url, response)?;

        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

        Ok(HeadResponse { last_modified })
    }

    async fn get(&self, url: &Url) -> Result<String> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(Self::transport_error(url))?;
        let response = Self::check_status(url, response)?;

        response.text().await.map_err(Self::transport_error(url))
    }
}
