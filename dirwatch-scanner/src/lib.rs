pub mod crawler;
pub mod error;
pub mod fetch;
pub mod listing;
pub mod node;
pub mod timestamp;

pub use crawler::{CrawlEvent, Crawler, ProgressCallback};
pub use error::CrawlError;
pub use fetch::{Fetch, HeadResponse, HttpFetcher};
pub use node::{NodeKind, ResourceNode};
