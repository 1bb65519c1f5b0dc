pub mod aggregate;
pub mod crawl;
pub mod report;

pub use aggregate::{CrawlRow, CrawlSummary, aggregate, summarize};
pub use crawl::{CrawlOptions, DEFAULT_ROOTS, execute_crawl, extract_url_path};
pub use report::ReportFormat;
