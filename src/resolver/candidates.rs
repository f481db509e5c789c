//! Candidate text-file locations on a Gutenberg mirror.

/// One guessed location of an item's plain-text file.
///
/// Variants are listed in probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateTemplate {
    /// `{base}/files/{id}/{id}-0.txt` (UTF-8 full text).
    FilesUtf8,
    /// `{base}/files/{id}/{id}.txt` (legacy full text).
    FilesPlain,
    /// `{base}/cache/epub/{id}/pg{id}.txt` (generated cache).
    CacheEpub,
}

/// The default probe order.
pub const DEFAULT_CANDIDATES: [CandidateTemplate; 3] = [
    CandidateTemplate::FilesUtf8,
    CandidateTemplate::FilesPlain,
    CandidateTemplate::CacheEpub,
];

impl CandidateTemplate {
    /// Builds the candidate URL for `ebook_id` under `base_url`.
    ///
    /// A trailing `/` on `base_url` is ignored.
    #[must_use]
    pub fn url(self, base_url: &str, ebook_id: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match self {
            Self::FilesUtf8 => format!("{base}/files/{ebook_id}/{ebook_id}-0.txt"),
            Self::FilesPlain => format!("{base}/files/{ebook_id}/{ebook_id}.txt"),
            Self::CacheEpub => format!("{base}/cache/epub/{ebook_id}/pg{ebook_id}.txt"),
        }
    }
}
