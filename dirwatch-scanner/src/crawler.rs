use crate::error::{CrawlError, Result};
use crate::fetch::{Fetch, HeadResponse, HttpFetcher};
use crate::listing::{directory_base, extract_links};
use crate::node::ResourceNode;
use crate::timestamp::parse_last_modified;
use futures::future::{LocalBoxFuture, try_join_all};
use futures::{FutureExt, StreamExt, TryStreamExt, stream};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_MAX_DEPTH: usize = 16;
pub const DEFAULT_WORKERS: usize = 4;

/// A request the crawler is about to issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    Head(Url),
    Listing(Url),
}

pub type ProgressCallback = Arc<dyn Fn(CrawlEvent) + Send + Sync>;

pub struct Crawler<F = HttpFetcher> {
    fetcher: F,
    max_depth: usize,
    workers: usize,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler<HttpFetcher> {
    pub fn new() -> Result<Self> {
        Ok(Self::with_fetcher(HttpFetcher::new()?))
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        Ok(Self::with_fetcher(HttpFetcher::with_timeout(timeout_secs)?))
    }
}

impl<F: Fetch> Crawler<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher,
            max_depth: DEFAULT_MAX_DEPTH,
            workers: DEFAULT_WORKERS,
            progress_callback: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Upper bound on requests in flight at once.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Crawl every root and return one fully classified tree per root, in
    /// the order given. The first fetch failure aborts the whole crawl.
    pub async fn crawl<S: AsRef<str>>(&self, root_urls: &[S]) -> Result<Vec<ResourceNode>> {
        info!(
            "Starting crawl of {} root(s) with {} workers",
            root_urls.len(),
            self.workers
        );

        let urls = root_urls
            .iter()
            .map(|s| parse_root(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let session = CrawlSession::new(self);
        let mut roots = try_join_all(urls.into_iter().map(|url| session.construct(url))).await?;
        try_join_all(roots.iter_mut().map(|root| session.expand(root, 0))).await?;

        let files: usize = roots.iter().map(ResourceNode::file_count).sum();
        let directories: usize = roots.iter().map(ResourceNode::directory_count).sum();
        info!(
            "Crawl complete. {} files, {} directories",
            files, directories
        );
        Ok(roots)
    }

    /// Classify a single URL with one HEAD request.
    pub async fn construct(&self, url: &str) -> Result<ResourceNode> {
        CrawlSession::new(self).construct(parse_root(url)?).await
    }

    /// Fetch a directory's listing and recursively build its subtree.
    /// Files and already expanded directories are left untouched.
    pub async fn expand(&self, node: &mut ResourceNode) -> Result<()> {
        CrawlSession::new(self).expand(node, 0).await
    }
}

/// Turn a HEAD response into a node. A `Last-Modified` header makes a file;
/// an unparsable one still makes a file, just without a timestamp.
pub fn classify(url: Url, head: &HeadResponse) -> ResourceNode {
    match head.last_modified.as_deref() {
        None => ResourceNode::directory(url),
        Some(value) => match parse_last_modified(url.as_str(), value) {
            Ok(modified) => ResourceNode::file(url, Some(modified)),
            Err(e) => {
                warn!("{}; keeping it as a file without a timestamp", e);
                ResourceNode::file(url, None)
            }
        },
    }
}

fn parse_root(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| CrawlError::InvalidUrl(format!("{}: {}", url, e)))
}

/// State shared by everything one crawl call does: the fetch pool and the
/// set of directory URLs already expanded. Dropped when the call returns.
struct CrawlSession<'c, F> {
    crawler: &'c Crawler<F>,
    permits: Semaphore,
    expanded: Mutex<HashSet<String>>,
}

impl<'c, F: Fetch> CrawlSession<'c, F> {
    fn new(crawler: &'c Crawler<F>) -> Self {
        Self {
            crawler,
            permits: Semaphore::new(crawler.workers),
            expanded: Mutex::new(HashSet::new()),
        }
    }

    fn report(&self, event: CrawlEvent) {
        if let Some(ref callback) = self.crawler.progress_callback {
            callback(event);
        }
    }

    async fn construct(&self, url: Url) -> Result<ResourceNode> {
        let head = {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|e| CrawlError::Other(format!("fetch pool closed: {}", e)))?;
            self.report(CrawlEvent::Head(url.clone()));
            self.crawler.fetcher.head(&url).await?
        };
        Ok(classify(url, &head))
    }

    async fn fetch_listing(&self, url: &Url) -> Result<String> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| CrawlError::Other(format!("fetch pool closed: {}", e)))?;
        self.report(CrawlEvent::Listing(url.clone()));
        self.crawler.fetcher.get(url).await
    }

    /// Returns false when this directory URL was already expanded in this crawl.
    async fn claim(&self, url: &Url) -> bool {
        let key = directory_base(url).to_string();
        self.expanded.lock().await.insert(key)
    }

    fn expand<'a>(
        &'a self,
        node: &'a mut ResourceNode,
        depth: usize,
    ) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            if !node.is_directory() || node.is_expanded() {
                return Ok(());
            }
            if depth >= self.crawler.max_depth {
                warn!(
                    "Not expanding {}: depth limit {} reached",
                    node.url, self.crawler.max_depth
                );
                return Ok(());
            }
            if !self.claim(&node.url).await {
                debug!("{} already expanded in this crawl, skipping", node.url);
                node.begin_expansion();
                return Ok(());
            }
            node.begin_expansion();

            let body = self.fetch_listing(&node.url).await?;
            let links = extract_links(&node.url, &body)?;
            debug!("{}: {} entries", node.url, links.len());

            // `buffered` keeps anchor order while the pool bounds concurrency
            let children: Vec<ResourceNode> = stream::iter(links)
                .map(|url| self.construct(url))
                .buffered(self.crawler.workers)
                .try_collect()
                .await?;
            node.attach_children(children);

            try_join_all(
                node.children_mut()
                    .iter_mut()
                    .filter(|child| child.is_directory())
                    .map(|child| self.expand(child, depth + 1)),
            )
            .await?;

            Ok(())
        }
        .boxed_local()
    }
}
