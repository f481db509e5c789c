//! Filename cleaning for downloaded book texts.

/// Creates a filesystem-safe name from free text.
///
/// Drops every character that is not a word character, whitespace or `-`,
/// turns whitespace into `_`, collapses runs of `_`, and trims `_` from both
/// ends.
///
/// ```
/// use harvester_core::download::clean_filename;
///
/// assert_eq!(clean_filename("War & Peace: Book One!"), "War_Peace_Book_One");
/// ```
#[must_use]
pub fn clean_filename(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_underscore = false;
    for ch in text.chars() {
        let mapped = match ch {
            c if c.is_whitespace() => '_',
            c if c.is_alphanumeric() || matches!(c, '_' | '-') => c,
            _ => continue,
        };
        if mapped == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(mapped);
            prev_underscore = false;
        }
    }
    out.trim_matches('_').to_string()
}

/// Builds the text filename for a book: `{clean_title}_{ebook_id}.txt`.
///
/// Falls back to `pg{ebook_id}.txt` when nothing of the title survives
/// cleaning.
#[must_use]
pub fn book_filename(title: &str, ebook_id: &str) -> String {
    let stem = clean_filename(title);
    if stem.is_empty() {
        format!("pg{ebook_id}.txt")
    } else {
        format!("{stem}_{ebook_id}.txt")
    }
}
