//! Translation table input definitions

use std::collections::{
    BTreeMap,
    BTreeSet,
    HashMap,
    HashSet,
};
use std::path::{
    Path,
    PathBuf,
};
use std::sync::LazyLock;

use serde_json::Value;
use thiserror::Error;

use crate::types::LanguageCode;

/// Site strings shipped with the crate, one file per language.
const BUILTIN_LOCALES: &[(&str, &str)] = &[
    ("es", include_str!("../../assets/locales/es.json")),
    ("en", include_str!("../../assets/locales/en.json")),
];

/// Language codes recognised in translation file paths.
/// Based on <http://tools.ietf.org/html/rfc5646>
static LANGUAGE_CODES: LazyLock<HashSet<String>> = LazyLock::new(|| {
    [
        "ca", "ca-ES", "de", "de-DE", "en", "en-GB", "en-US", "es", "es-ES", "es-MX", "eu",
        "eu-ES", "fr", "fr-FR", "gl", "gl-ES", "it", "it-IT", "ja", "ja-JP", "nl", "nl-NL", "pt",
        "pt-BR", "pt-PT", "zh", "zh-CN", "zh-TW",
    ]
    .iter()
    .flat_map(|code| {
        let code = (*code).to_string();
        let normalized = normalize_language_code(&code);
        vec![code, normalized]
    })
    .collect()
});

/// Normalize language code (lowercase and replace - with _)
fn normalize_language_code(code: &str) -> String {
    code.to_lowercase().replace('-', "_")
}

/// Detect language from file path heuristically
///
/// Splits the path by '/' and '.', then searches backwards for a part
/// that matches a known language code.
///
/// # Examples
/// - `locales/en.json` → `en`
/// - `locales/es-ES.json` → `es-ES`
/// - `translations/en/site.json` → `en`
fn detect_language_from_path(file_path: &Path) -> Option<LanguageCode> {
    let path_str = file_path.to_string_lossy();

    path_str.split(['/', '.']).rev().find_map(|part| {
        let normalized = normalize_language_code(part);
        if LANGUAGE_CODES.contains(&normalized) || LANGUAGE_CODES.contains(part) {
            LanguageCode::new(part)
        } else {
            None
        }
    })
}

/// Errors raised while loading translation files.
#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("Failed to read translation file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse translation file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Translation file {0} must contain a JSON object")]
    NotAnObject(String),
}

/// Flatten nested JSON object into separator-joined key map.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use bilingual_site::i18n::flatten_json;
///
/// let json = json!({
///     "nav": {
///         "home": "Inicio",
///         "contact": "Contacto"
///     }
/// });
///
/// let flattened = flatten_json(&json, ".", None);
/// assert_eq!(flattened.get("nav.home"), Some(&"Inicio".to_string()));
/// assert_eq!(flattened.get("nav.contact"), Some(&"Contacto".to_string()));
/// ```
#[must_use]
pub fn flatten_json(
    json: &Value,
    separator: &str,
    prefix: Option<&str>,
) -> HashMap<String, String> {
    let mut result = HashMap::new();
    flatten_json_value(json, separator, prefix, &mut result);
    result
}

/// Recursive step of [`flatten_json`], accumulating into `result`.
fn flatten_json_value(
    json: &Value,
    separator: &str,
    prefix: Option<&str>,
    result: &mut HashMap<String, String>,
) {
    match json {
        Value::Object(map) => {
            for (key, value) in map {
                let full_key =
                    prefix.map_or_else(|| key.clone(), |p| format!("{p}{separator}{key}"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::Array(arr) => {
            for (index, value) in arr.iter().enumerate() {
                let full_key =
                    prefix.map_or_else(|| format!("[{index}]"), |p| format!("{p}[{index}]"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::String(s) => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), s.clone());
            }
        }
        _ => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), json.to_string());
            }
        }
    }
}

/// A key that exists for some languages but not for `language`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CoverageGap {
    pub language: LanguageCode,
    pub key: String,
}

/// Language code → flattened key map.
///
/// Immutable once the site has started; the switcher only reads it.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    /// Flattened keys per language.
    languages: BTreeMap<LanguageCode, HashMap<String, String>>,
}

impl TranslationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds keys for `language`, overriding keys it already has.
    pub fn insert(&mut self, language: LanguageCode, keys: HashMap<String, String>) {
        self.languages.entry(language).or_default().extend(keys);
    }

    /// Parses one translation document for `language`.
    ///
    /// `origin` only appears in error messages.
    pub fn insert_json(
        &mut self,
        language: LanguageCode,
        origin: &str,
        content: &str,
        separator: &str,
    ) -> Result<(), TranslationError> {
        let json: Value = serde_json::from_str(content)
            .map_err(|source| TranslationError::Parse { path: origin.to_string(), source })?;

        if !json.is_object() {
            return Err(TranslationError::NotAnObject(origin.to_string()));
        }

        let keys = flatten_json(&json, separator, None);
        tracing::debug!(
            language = %language,
            keys = keys.len(),
            "Loaded translations from {origin}"
        );
        self.insert(language, keys);

        Ok(())
    }

    /// The strings shipped with the site.
    pub fn builtin(separator: &str) -> Result<Self, TranslationError> {
        let mut table = Self::new();
        for (code, content) in BUILTIN_LOCALES {
            if let Some(language) = LanguageCode::new(code) {
                table.insert_json(language, &format!("<builtin {code}>"), content, separator)?;
            }
        }
        Ok(table)
    }

    /// Loads every `*.json` file under `dir`.
    ///
    /// Files whose name does not reveal a language are skipped with a warning.
    pub fn load_dir(dir: &Path, separator: &str) -> Result<Self, TranslationError> {
        let io_error = |source| TranslationError::Io { path: dir.to_path_buf(), source };

        let mut files = std::fs::read_dir(dir)
            .map_err(io_error)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect::<Vec<_>>();
        files.sort();

        let mut table = Self::new();
        for file_path in files {
            let Some(language) = detect_language_from_path(&file_path) else {
                tracing::warn!("Skipping translation file without a language: {:?}", file_path);
                continue;
            };

            let content = std::fs::read_to_string(&file_path)
                .map_err(|source| TranslationError::Io { path: file_path.clone(), source })?;
            table.insert_json(language, &file_path.to_string_lossy(), &content, separator)?;
        }

        Ok(table)
    }

    #[must_use]
    pub fn supports(&self, language: &LanguageCode) -> bool {
        self.languages.contains_key(language)
    }

    pub fn languages(&self) -> impl Iterator<Item = &LanguageCode> {
        self.languages.keys()
    }

    /// Keys defined for `language`, in no particular order.
    pub fn keys(&self, language: &LanguageCode) -> impl Iterator<Item = &str> {
        self.languages.get(language).into_iter().flat_map(|keys| keys.keys().map(String::as_str))
    }

    #[must_use]
    pub fn get(&self, language: &LanguageCode, key: &str) -> Option<&str> {
        self.languages.get(language)?.get(key).map(String::as_str)
    }

    /// Keys missing from some language while present in another.
    ///
    /// Elements bound to such keys keep their original content in the
    /// languages listed here.
    #[must_use]
    pub fn coverage_gaps(&self) -> Vec<CoverageGap> {
        let all_keys: BTreeSet<&String> =
            self.languages.values().flat_map(HashMap::keys).collect();

        let mut gaps = Vec::new();
        for (language, keys) in &self.languages {
            for key in &all_keys {
                if !keys.contains_key(*key) {
                    gaps.push(CoverageGap { language: language.clone(), key: (*key).clone() });
                }
            }
        }
        gaps
    }
}
