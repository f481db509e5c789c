//! Error types for harvest runs and single items.

use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

/// Errors that end a harvest run.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The catalog list page could not be retrieved.
    #[error("failed to fetch the book list from {url}")]
    CatalogUnavailable {
        /// The catalog URL.
        url: String,
    },

    /// The catalog page was retrieved but listed no items.
    #[error("the book list at {url} contained no book links")]
    EmptyCatalog {
        /// The catalog URL.
        url: String,
    },

    /// The download directory could not be created.
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        /// The directory.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Loading or saving the metadata table failed.
    #[error("metadata store error: {0}")]
    Store(#[from] StoreError),
}

impl HarvestError {
    /// True for the conditions where no catalog items were available.
    #[must_use]
    pub fn is_catalog_failure(&self) -> bool {
        matches!(
            self,
            Self::CatalogUnavailable { .. } | Self::EmptyCatalog { .. }
        )
    }
}

/// Why one catalog item produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    /// The detail page could not be retrieved.
    #[error("detail page unavailable: {url}")]
    DetailUnavailable {
        /// The detail page URL.
        url: String,
    },

    /// The detail URL has no `/ebooks/<digits>` identifier.
    #[error("no ebook id in {url}")]
    MissingEbookId {
        /// The detail page URL.
        url: String,
    },

    /// No candidate text URL responded.
    #[error("no text download found for ebook {ebook_id}")]
    Unresolved {
        /// The item identifier.
        ebook_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_failures_classified() {
        assert!(HarvestError::CatalogUnavailable { url: "u".into() }.is_catalog_failure());
        assert!(HarvestError::EmptyCatalog { url: "u".into() }.is_catalog_failure());

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let store = HarvestError::from(StoreError::io("/x.csv", io));
        assert!(!store.is_catalog_failure());
    }

    #[test]
    fn test_item_error_display() {
        let error = ItemError::Unresolved {
            ebook_id: "84".into(),
        };
        assert_eq!(error.to_string(), "no text download found for ebook 84");
    }
}
