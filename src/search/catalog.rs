//! Per-language search records.

use std::collections::BTreeMap;
use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::LanguageCode;

/// Search records shipped with the site, one file per language.
const BUILTIN_INDEXES: &[(&str, &str)] = &[
    ("es", include_str!("../../assets/search/es.json")),
    ("en", include_str!("../../assets/search/en.json")),
];

/// One searchable site section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SearchRecord {
    pub title: String,
    pub description: String,
    /// Page path, optionally with a fragment (`aficiones.html#music`).
    pub url: String,
    /// Space separated extra words that do not appear in the visible text.
    #[serde(default)]
    pub keywords: String,
}

/// Records and the "no results" placeholder of one language.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageIndex {
    pub no_results: String,
    pub records: Vec<SearchRecord>,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read search records {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse search records {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No search records for the fallback language '{0}'")]
    MissingFallback(LanguageCode),
}

/// Record lists for every language, with a fallback for the rest.
#[derive(Debug, Clone)]
pub struct SearchCatalog {
    /// Records per language.
    indexes: BTreeMap<LanguageCode, LanguageIndex>,
    /// Language whose records stand in for missing ones; always in `indexes`.
    fallback: LanguageCode,
}

impl SearchCatalog {
    /// Builds a catalog from already parsed indexes.
    pub fn new(
        indexes: BTreeMap<LanguageCode, LanguageIndex>,
        fallback: LanguageCode,
    ) -> Result<Self, CatalogError> {
        if !indexes.contains_key(&fallback) {
            return Err(CatalogError::MissingFallback(fallback));
        }
        Ok(Self { indexes, fallback })
    }

    /// The records shipped with the site.
    pub fn builtin(fallback: LanguageCode) -> Result<Self, CatalogError> {
        let mut indexes = BTreeMap::new();
        for (code, content) in BUILTIN_INDEXES {
            let index: LanguageIndex =
                serde_json::from_str(content).map_err(|source| CatalogError::Parse {
                    path: format!("<builtin {code}>"),
                    source,
                })?;
            if let Some(language) = LanguageCode::new(code) {
                indexes.insert(language, index);
            }
        }
        Self::new(indexes, fallback)
    }

    /// Loads `<lang>.json` files from `dir`; the file stem is the language code.
    pub fn load_dir(dir: &Path, fallback: LanguageCode) -> Result<Self, CatalogError> {
        let entries = std::fs::read_dir(dir)
            .map_err(|source| CatalogError::Io { path: dir.to_path_buf(), source })?;

        let mut indexes = BTreeMap::new();
        for path in entries.filter_map(|entry| entry.ok().map(|e| e.path())) {
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            let Some(language) =
                path.file_stem().and_then(|stem| LanguageCode::new(&stem.to_string_lossy()))
            else {
                continue;
            };

            let content = std::fs::read_to_string(&path)
                .map_err(|source| CatalogError::Io { path: path.clone(), source })?;
            let index: LanguageIndex = serde_json::from_str(&content).map_err(|source| {
                CatalogError::Parse { path: path.to_string_lossy().to_string(), source }
            })?;

            tracing::debug!(
                language = %language,
                records = index.records.len(),
                "Loaded search records"
            );
            indexes.insert(language, index);
        }

        Self::new(indexes, fallback)
    }

    /// Index for `language`, or the fallback language's when it has none.
    #[must_use]
    pub fn index_for(&self, language: &LanguageCode) -> &LanguageIndex {
        self.indexes.get(language).unwrap_or_else(|| {
            tracing::debug!(
                language = %language,
                fallback = %self.fallback,
                "No search records, using fallback"
            );
            self.fallback_index()
        })
    }

    #[must_use]
    pub const fn fallback(&self) -> &LanguageCode {
        &self.fallback
    }

    /// Index of the fallback language.
    #[allow(clippy::indexing_slicing)]
    fn fallback_index(&self) -> &LanguageIndex {
        // `new` refuses catalogs without the fallback language.
        &self.indexes[&self.fallback]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    fn code(s: &str) -> LanguageCode {
        LanguageCode::new(s).unwrap()
    }

    #[googletest::test]
    fn builtin_catalog_has_parallel_indexes() {
        let catalog = SearchCatalog::builtin(code("es")).unwrap();

        let es = catalog.index_for(&code("es"));
        let en = catalog.index_for(&code("en"));

        expect_that!(es.records.len(), eq(en.records.len()));
        expect_that!(es.records.len(), lt(30));
        expect_that!(es.no_results, eq("Sin resultados"));
        expect_that!(en.no_results, eq("No results"));
        for (es_record, en_record) in es.records.iter().zip(&en.records) {
            expect_that!(es_record.url, eq(en_record.url.as_str()));
        }
    }

    #[googletest::test]
    fn unknown_language_uses_fallback() {
        let catalog = SearchCatalog::builtin(code("es")).unwrap();

        let index = catalog.index_for(&code("fr"));

        expect_that!(index.no_results, eq("Sin resultados"));
    }

    #[rstest]
    fn missing_fallback_is_rejected() {
        let result = SearchCatalog::builtin(code("fr"));

        assert!(matches!(result, Err(CatalogError::MissingFallback(_))));
    }

    #[googletest::test]
    fn load_dir_reads_language_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("en.json"),
            r#"{"noResults": "Nothing", "records": [
                {"title": "Home", "description": "Main page.", "url": "index.html"}
            ]}"#,
        )
        .unwrap();

        let catalog = SearchCatalog::load_dir(temp_dir.path(), code("en")).unwrap();
        let index = catalog.index_for(&code("en"));

        expect_that!(index.no_results, eq("Nothing"));
        expect_that!(index.records, len(eq(1)));
        expect_that!(index.records[0].keywords, eq(""));
    }
}
