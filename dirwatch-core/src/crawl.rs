use crate::aggregate::{CrawlRow, aggregate};
use dirwatch_scanner::crawler::{DEFAULT_MAX_DEPTH, DEFAULT_WORKERS};
use dirwatch_scanner::error::Result;
use dirwatch_scanner::fetch::DEFAULT_TIMEOUT_SECS;
use dirwatch_scanner::{CrawlEvent, Crawler, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;
use url::Url;

/// Listing pages crawled when no roots are configured.
pub const DEFAULT_ROOTS: &[&str] = &[
    "http://xanadu.cs.sjsu.edu/~drtylin/classes/cs157A/notes/",
    "http://xanadu.cs.sjsu.edu/~drtylin/classes/cs157A/Project/",
    "http://xanadu.cs.sjsu.edu/~drtylin/classes/cs157A/Project/temp_data/",
    "http://xanadu.cs.sjsu.edu/~drtylin/classes/cs157A/Project/Homework/",
    "http://xanadu.cs.sjsu.edu/~drtylin/classes/cs157A/Project/DB1/",
    "http://xanadu.cs.sjsu.edu/~drtylin/classes/cs157A/Project/DB2/",
    "http://xanadu.cs.sjsu.edu/~drtylin/classes/cs157A/Project/DB3/",
];

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub urls: Vec<String>,
    pub workers: usize,
    pub max_depth: usize,
    pub timeout_secs: u64,
    pub show_progress: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            urls: DEFAULT_ROOTS.iter().map(|s| s.to_string()).collect(),
            workers: DEFAULT_WORKERS,
            max_depth: DEFAULT_MAX_DEPTH,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            show_progress: false,
        }
    }
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Crawl the configured roots over HTTP and return the sorted result rows.
pub async fn execute_crawl(options: CrawlOptions) -> Result<Vec<CrawlRow>> {
    let CrawlOptions {
        urls,
        workers,
        max_depth,
        timeout_secs,
        show_progress,
    } = options;

    let progress_bar = if show_progress {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let request_count = Arc::new(AtomicUsize::new(0));
    let pb_clone = progress_bar.clone();
    let count_clone = request_count.clone();
    let callback: ProgressCallback = Arc::new(move |event: CrawlEvent| {
        let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref pb) = pb_clone {
            let path = match &event {
                CrawlEvent::Head(url) | CrawlEvent::Listing(url) => extract_url_path(url.as_str()),
            };
            pb.set_message(format!("Crawling... {} requests, at {}", count, path));
        }
    });

    let crawler = Crawler::with_timeout(timeout_secs)?
        .with_max_depth(max_depth)
        .with_workers(workers)
        .with_progress_callback(callback);

    let outcome = crawler.crawl(urls.as_slice()).await;

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }

    let roots = outcome?;
    let rows = aggregate(&roots);
    info!(
        "{} requests, {} rows",
        request_count.load(Ordering::Relaxed),
        rows.len()
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_use_default_roots() {
        let options = CrawlOptions::default();
        assert_eq!(options.urls.len(), DEFAULT_ROOTS.len());
        assert_eq!(options.workers, DEFAULT_WORKERS);
        assert!(!options.show_progress);
    }

    #[test]
    fn test_default_roots_are_valid_directory_urls() {
        for root in DEFAULT_ROOTS {
            let url = Url::parse(root).unwrap();
            assert!(url.path().ends_with('/'), "{root} should end with /");
        }
    }
}
