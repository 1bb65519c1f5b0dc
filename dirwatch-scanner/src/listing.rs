use crate::error::{CrawlError, Result};
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// The URL relative links of a listing must be resolved against: the
/// directory URL with a trailing `/`, so `a.txt` lands inside it rather
/// than next to it.
pub fn directory_base(url: &Url) -> Url {
    let mut base = url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_query(None);
    base.set_fragment(None);
    base
}

/// Extract the child entries of an Apache autoindex page, in anchor order.
///
/// Only links that stay strictly below `dir_url` are kept. The "Parent
/// Directory" link, the column-sort links (`?C=N;O=D`), self links and
/// off-site links are dropped, as are repeats of an entry already seen on
/// the page. A page with no usable anchors yields an empty list.
pub fn extract_links(dir_url: &Url, html: &str) -> Result<Vec<Url>> {
    let base = directory_base(dir_url);
    let document = Html::parse_document(html);
    let link_selector =
        Selector::parse("a[href]").map_err(|e| CrawlError::Parse(format!("{:?}", e)))?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(absolute_url) = resolve_href(&base, href) else {
            debug!("Skipping non-entry link {:?} on {}", href, base);
            continue;
        };
        if !is_child_of(&base, &absolute_url) {
            debug!("Skipping {} (outside {})", absolute_url, base);
            continue;
        }
        if seen.insert(absolute_url.as_str().to_string()) {
            links.push(absolute_url);
        }
    }

    debug!("Found {} entries on {}", links.len(), base);
    Ok(links)
}

fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    // Skip empty, javascript:, mailto:, tel:, fragments and sort-order queries
    if href.is_empty()
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with('#')
        || href.starts_with('?')
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    url.set_fragment(None);
    Some(url)
}

fn is_child_of(dir: &Url, candidate: &Url) -> bool {
    candidate.scheme() == dir.scheme()
        && candidate.host_str() == dir.host_str()
        && candidate.port_or_known_default() == dir.port_or_known_default()
        && candidate.path().starts_with(dir.path())
        && candidate.path() != dir.path()
}
