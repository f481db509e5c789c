//! Named metadata extraction strategies for detail pages.
//!
//! Each strategy looks at one markup shape and reports whatever fields it can
//! find. [`extract_fields`] runs them in priority order. Later strategies
//! only fill gaps, except a [`replaces_found`](ExtractionStrategy::replaces_found)
//! strategy, whose findings win over earlier ones.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use super::html::{collapse_whitespace, compile_static_regex, compile_static_selector, element_text};

static BIBREC_ROWS: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("table.bibrec tr"));
static ANY_TABLE_ROWS: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("table tr"));
static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("th"));
static DATA_CELL: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("td"));
static PAGE_HEADER: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("h1.header"));
static ANY_H1: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("h1"));

static LIFESPAN_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"\d+[-–]\d+"));
static PARENTHETICAL_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"\([^)]*\)"));
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"\d{4}"));

/// Separator between title and author in a detail page header.
const HEADER_BY_SEPARATOR: &str = " by ";

/// Fields found so far; `None` means unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialFields {
    /// Book title.
    pub title: Option<String>,
    /// Cleaned author name.
    pub author: Option<String>,
    /// Four-digit year.
    pub year: Option<String>,
}

impl PartialFields {
    /// Fills every unresolved field from `other`; resolved fields are kept.
    pub fn fill_missing(&mut self, other: PartialFields) {
        if self.title.is_none() {
            self.title = other.title;
        }
        if self.author.is_none() {
            self.author = other.author;
        }
        if self.year.is_none() {
            self.year = other.year;
        }
    }

    /// Replaces fields with every field `other` resolved.
    pub fn overwrite_with(&mut self, other: PartialFields) {
        if other.title.is_some() {
            self.title = other.title;
        }
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.year.is_some() {
            self.year = other.year;
        }
    }

    /// True when title or author is still unresolved.
    #[must_use]
    pub fn missing_title_or_author(&self) -> bool {
        self.title.is_none() || self.author.is_none()
    }
}

/// One way of reading bibliographic fields from a detail page.
pub trait ExtractionStrategy {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Whether this strategy should run, given what earlier ones found.
    fn applies(&self, _found: &PartialFields) -> bool {
        true
    }

    /// Whether this strategy's findings replace fields already found.
    fn replaces_found(&self) -> bool {
        false
    }

    /// Reads whatever fields this strategy understands.
    fn extract(&self, document: &Html) -> PartialFields;
}

/// Reads the `Title`, `Author` and release/publication date rows of the
/// bibliographic record table.
#[derive(Debug, Default, Clone, Copy)]
pub struct BibrecTableStrategy;

impl ExtractionStrategy for BibrecTableStrategy {
    fn name(&self) -> &'static str {
        "bibrec_table"
    }

    fn extract(&self, document: &Html) -> PartialFields {
        let mut rows: Vec<ElementRef<'_>> = document.select(&BIBREC_ROWS).collect();
        if rows.is_empty() {
            rows = document.select(&ANY_TABLE_ROWS).collect();
        }

        let mut fields = PartialFields::default();
        let mut date_seen = false;
        for row in rows {
            let (Some(header), Some(data)) =
                (row.select(&HEADER_CELL).next(), row.select(&DATA_CELL).next())
            else {
                continue;
            };
            let label = element_text(header);
            let value = element_text(data);
            if is_date_label(&label) {
                // Only the first date row counts, with or without a year.
                if !date_seen {
                    date_seen = true;
                    fields.year = first_year(&value);
                }
                continue;
            }
            if value.is_empty() {
                continue;
            }

            if label.eq_ignore_ascii_case("title") {
                if fields.title.is_none() {
                    fields.title = Some(value);
                }
            } else if label.eq_ignore_ascii_case("author") {
                if fields.author.is_none() {
                    fields.author = Some(clean_author(&value)).filter(|a| !a.is_empty());
                }
            }
        }
        fields
    }
}

/// Splits the page header (`Title by Author`) into title and author.
///
/// Only consulted while title or author is unresolved. A successful split
/// sets both fields, replacing whatever the table gave.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderTitleStrategy;

impl ExtractionStrategy for HeaderTitleStrategy {
    fn name(&self) -> &'static str {
        "page_header"
    }

    fn applies(&self, found: &PartialFields) -> bool {
        found.missing_title_or_author()
    }

    fn replaces_found(&self) -> bool {
        true
    }

    fn extract(&self, document: &Html) -> PartialFields {
        let header = document
            .select(&PAGE_HEADER)
            .next()
            .or_else(|| document.select(&ANY_H1).next());
        let Some(header) = header else {
            return PartialFields::default();
        };

        let text = element_text(header);
        let Some((title, author)) = text.split_once(HEADER_BY_SEPARATOR) else {
            return PartialFields::default();
        };

        let title = title.trim();
        let author = author.trim();
        PartialFields {
            title: (!title.is_empty()).then(|| title.to_string()),
            author: (!author.is_empty()).then(|| author.to_string()),
            year: None,
        }
    }
}

/// Strategies in priority order.
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![Box::new(BibrecTableStrategy), Box::new(HeaderTitleStrategy)]
}

/// Runs `strategies` in order, merging each result into what was found so far.
#[must_use]
pub fn extract_fields(document: &Html, strategies: &[Box<dyn ExtractionStrategy>]) -> PartialFields {
    let mut found = PartialFields::default();
    for strategy in strategies {
        if !strategy.applies(&found) {
            continue;
        }
        let fields = strategy.extract(document);
        trace!(strategy = strategy.name(), ?fields, "strategy result");
        if strategy.replaces_found() {
            found.overwrite_with(fields);
        } else {
            found.fill_missing(fields);
        }
    }
    found
}

/// Removes life-span ranges and parenthetical notes from an author cell.
///
/// ```
/// use harvester_core::parser::clean_author;
///
/// assert_eq!(clean_author("Herman Melville (1819-1891)"), "Herman Melville");
/// assert_eq!(clean_author("Austen, Jane, 1775-1817"), "Austen, Jane");
/// ```
#[must_use]
pub fn clean_author(raw: &str) -> String {
    let without_dates = LIFESPAN_RE.replace_all(raw, "");
    let without_notes = PARENTHETICAL_RE.replace_all(&without_dates, "");
    collapse_whitespace(&without_notes)
        .trim_matches(|c: char| c.is_whitespace() || c == '.' || c == ',')
        .to_string()
}

fn is_date_label(label: &str) -> bool {
    let label = label.to_lowercase();
    label.contains("release date") || label.contains("publication date")
}

fn first_year(text: &str) -> Option<String> {
    YEAR_RE.find(text).map(|m| m.as_str().to_string())
}
