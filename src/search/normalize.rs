//! Text normalization shared by queries and indexed records.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lowercases `text` and strips diacritical marks.
///
/// Lowercasing runs first because some uppercase letters lowercase to a base
/// letter plus a combining mark (`İ` → `i̇`); stripping afterwards keeps the
/// function idempotent.
///
/// ```
/// use bilingual_site::search::normalize;
///
/// assert_eq!(normalize("Música"), "musica");
/// assert_eq!(normalize("musica"), "musica");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    text.to_lowercase().nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Splits an already normalized query into terms on runs of whitespace.
#[must_use]
pub fn tokenize(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

/// A query after trimming and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    /// Trimmed, normalized text.
    text: String,
}

impl NormalizedQuery {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self { text: normalize(raw.trim()) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters, which is what the minimum query length counts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[must_use]
    pub fn is_searchable(&self, min_length: usize) -> bool {
        self.len() >= min_length
    }

    #[must_use]
    pub fn terms(&self) -> Vec<&str> {
        tokenize(&self.text)
    }
}
