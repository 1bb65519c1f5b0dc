// Flattening crawled trees into the sorted result table

use chrono::{NaiveDateTime, TimeDelta};
use dirwatch_scanner::ResourceNode;
use dirwatch_scanner::timestamp::format_timestamp;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort stand-in for a missing modification time: older than any real one.
pub const MISSING_TIMESTAMP: NaiveDateTime = NaiveDateTime::MIN;

/// Text shown in place of a missing modification time.
pub const MISSING_TIMESTAMP_TEXT: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRow {
    pub is_file: bool,
    pub url: String,
    pub name: String,
    pub modified: Option<NaiveDateTime>,
}

impl CrawlRow {
    pub fn from_node(node: &ResourceNode) -> Self {
        Self {
            is_file: node.is_file(),
            url: node.url.to_string(),
            name: node.name(),
            modified: node.modified(),
        }
    }

    pub fn modified_display(&self) -> String {
        self.modified
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_else(|| MISSING_TIMESTAMP_TEXT.to_string())
    }

    /// Time since the last modification, relative to `now`.
    pub fn age(&self, now: NaiveDateTime) -> Option<TimeDelta> {
        self.modified.map(|modified| now - modified)
    }

    fn sort_key(&self) -> (bool, NaiveDateTime, &str) {
        (
            self.is_file,
            self.modified.unwrap_or(MISSING_TIMESTAMP),
            self.url.as_str(),
        )
    }
}

impl Ord for CrawlRow {
    /// Rows compare by `(is_file, modified, url)`; the table is this order reversed.
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for CrawlRow {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Flatten every node under every root into rows, sorted descending:
/// directories first, then files newest first (untimed files last), ties
/// by descending URL. A URL reached from more than one root appears once.
pub fn aggregate(roots: &[ResourceNode]) -> Vec<CrawlRow> {
    let mut rows: Vec<CrawlRow> = roots
        .iter()
        .flat_map(ResourceNode::walk)
        .map(CrawlRow::from_node)
        .collect();

    rows.sort_by(|a, b| b.cmp(a));
    rows.dedup_by(|a, b| a.url == b.url);
    rows
}

/// Counts for the summary line printed after a crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub files: usize,
    pub directories: usize,
    pub untimed_files: usize,
    pub newest: Option<CrawlRow>,
}

pub fn summarize(rows: &[CrawlRow]) -> CrawlSummary {
    let files = rows.iter().filter(|r| r.is_file).count();
    let untimed_files = rows
        .iter()
        .filter(|r| r.is_file && r.modified.is_none())
        .count();
    let newest = rows
        .iter()
        .filter(|r| r.is_file && r.modified.is_some())
        .max_by_key(|r| r.modified)
        .cloned();

    CrawlSummary {
        files,
        directories: rows.len() - files,
        untimed_files,
        newest,
    }
}
