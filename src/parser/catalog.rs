//! Catalog list page parsing.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::html::compile_static_selector;

/// Path prefix of item detail pages.
pub const ITEM_PATH_PREFIX: &str = "/ebooks/";

/// Link suffixes that point at archives rather than detail pages.
pub const EXCLUDED_SUFFIXES: &[&str] = &[".zip"];

static ORDERED_LIST: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("ol"));
static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("li"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("a"));

/// Extracts item detail-page URLs from the first ordered list on a catalog page.
///
/// Each list item contributes its first link when that link's `href` starts
/// with [`ITEM_PATH_PREFIX`] and does not end with one of
/// [`EXCLUDED_SUFFIXES`]. Links are resolved against `base_url`. Document
/// order is preserved and duplicates are kept.
///
/// A page without an ordered list (or an unparseable `base_url`) yields an
/// empty list.
///
/// ```
/// use harvester_core::parser::extract_list_links;
///
/// let html = r#"<ol><li><a href="/ebooks/84">Frankenstein</a></li></ol>"#;
/// let links = extract_list_links(html, "https://www.gutenberg.org/browse/scores/top");
/// assert_eq!(links, vec!["https://www.gutenberg.org/ebooks/84"]);
/// ```
#[must_use]
pub fn extract_list_links(page_html: &str, base_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else {
        warn!(base_url, "catalog base URL is not absolute; no links resolved");
        return Vec::new();
    };

    let document = Html::parse_document(page_html);
    let Some(list) = document.select(&ORDERED_LIST).next() else {
        debug!("catalog page has no ordered list");
        return Vec::new();
    };

    let links: Vec<String> = list
        .select(&LIST_ITEM)
        .filter_map(|item| item.select(&ANCHOR).next())
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter(|href| href.starts_with(ITEM_PATH_PREFIX) && !is_archive_link(href))
        .filter_map(|href| base.join(href).ok())
        .map(String::from)
        .collect();

    debug!(count = links.len(), "extracted catalog links");
    links
}

fn is_archive_link(href: &str) -> bool {
    EXCLUDED_SUFFIXES.iter().any(|suffix| href.ends_with(suffix))
}
