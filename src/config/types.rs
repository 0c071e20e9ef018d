use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::LanguageCode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "supportedLanguages[1]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// バリデーションエラーを番号付きの一覧に整形する
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    /// Languages the switcher accepts. The first entry is not special; see
    /// `fallback_language`.
    pub supported_languages: Vec<String>,

    /// Used when no preference is stored, or the stored one is unsupported.
    pub fallback_language: String,

    /// Storage key holding the chosen language.
    pub preference_key: String,

    pub key_separator: String,

    /// Directory of `<lang>.json` translation files.
    /// If unset, the embedded site strings are used.
    pub translations_dir: Option<String>,

    /// Directory of `<lang>.json` search record files.
    /// If unset, the embedded search records are used.
    pub search_dir: Option<String>,

    /// Page fixture rendered by the headless driver.
    pub page_file: Option<String>,

    /// JSON file used as durable preference storage.
    /// If unset, the preference only lives as long as the process.
    pub preferences_file: Option<String>,

    pub search: SearchSettings,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchSettings {
    /// Normalized characters required before a query is run.
    pub min_query_length: usize,

    pub weights: SearchWeights,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { min_query_length: 2, weights: SearchWeights::default() }
    }
}

/// Score awarded to a term by the first field it is found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchWeights {
    pub title: u32,
    pub description: u32,
    pub keywords: u32,
}

impl Default for SearchWeights {
    fn default() -> Self {
        Self { title: 10, description: 5, keywords: 2 }
    }
}

impl SiteSettings {
    /// Parsed supported languages; blank entries are dropped (they fail validation).
    #[must_use]
    pub fn supported_codes(&self) -> Vec<LanguageCode> {
        self.supported_languages.iter().filter_map(|code| LanguageCode::new(code)).collect()
    }

    /// Parsed fallback language.
    ///
    /// Only `None` for settings that did not pass [`SiteSettings::validate`].
    #[must_use]
    pub fn fallback_code(&self) -> Option<LanguageCode> {
        LanguageCode::new(&self.fallback_language)
    }

    /// # Errors
    /// - Required field is empty
    /// - Fallback language is not supported
    /// - Search weights are not strictly ordered
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.supported_languages.is_empty() {
            errors.push(ValidationError::new(
                "supportedLanguages",
                "At least one language is required. Example: [\"es\", \"en\"]",
            ));
        }

        for (index, code) in self.supported_languages.iter().enumerate() {
            if LanguageCode::new(code).is_none() {
                errors.push(ValidationError::new(
                    format!("supportedLanguages[{index}]"),
                    "The language code cannot be empty",
                ));
            }
        }

        match self.fallback_code() {
            None => errors.push(ValidationError::new(
                "fallbackLanguage",
                "The fallback language cannot be empty. Example: \"es\"",
            )),
            Some(fallback) if !self.supported_codes().contains(&fallback) => {
                errors.push(ValidationError::new(
                    "fallbackLanguage",
                    format!("'{fallback}' is not one of the supported languages"),
                ));
            }
            Some(_) => {}
        }

        if self.preference_key.trim().is_empty() {
            errors.push(ValidationError::new(
                "preferenceKey",
                "The preference key cannot be empty. Example: \"preferredLang\"",
            ));
        }

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Example: \".\"",
            ));
        }

        if self.search.min_query_length == 0 {
            errors.push(ValidationError::new(
                "search.minQueryLength",
                "The minimum query length must be at least 1",
            ));
        }

        let weights = self.search.weights;
        if !(weights.title > weights.description
            && weights.description > weights.keywords
            && weights.keywords > 0)
        {
            errors.push(ValidationError::new(
                "search.weights",
                format!(
                    "Weights must satisfy title > description > keywords > 0 (got {}/{}/{})",
                    weights.title, weights.description, weights.keywords
                ),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            supported_languages: vec!["es".to_string(), "en".to_string()],
            fallback_language: "es".to_string(),
            preference_key: "preferredLang".to_string(),
            key_separator: ".".to_string(),
            translations_dir: None,
            search_dir: None,
            page_file: None,
            preferences_file: None,
            search: SearchSettings::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = SiteSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"fallbackLanguage": "en", "search": {"weights": {"title": 20}}}"#;

        let settings: SiteSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.fallback_language, eq("en"));
        assert_that!(settings.supported_languages, elements_are![eq("es"), eq("en")]);
        assert_that!(settings.search.weights.title, eq(20));
        assert_that!(settings.search.weights.description, eq(5));
        assert_that!(settings.search.min_query_length, eq(2));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let settings: SiteSettings = serde_json::from_str("{}").unwrap();

        assert_that!(settings.preference_key, eq("preferredLang"));
        assert_that!(settings.key_separator, eq("."));
        assert_that!(settings.translations_dir, none());
        assert_that!(settings.search.weights, eq(SearchWeights::default()));
    }

    #[rstest]
    fn validate_fallback_not_supported() {
        let settings =
            SiteSettings { fallback_language: "fr".to_string(), ..SiteSettings::default() };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("fallbackLanguage")),
                field!(ValidationError.message, contains_substring("'fr'"))
            ]])
        );
    }

    #[rstest]
    fn validate_blank_language_code() {
        let settings = SiteSettings {
            supported_languages: vec!["es".to_string(), " ".to_string()],
            ..SiteSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![field!(ValidationError.field_path, eq("supportedLanguages[1]"))])
        );
    }

    #[rstest]
    #[case::equal_title_description(SearchWeights { title: 5, description: 5, keywords: 2 })]
    #[case::keywords_above_description(SearchWeights { title: 10, description: 1, keywords: 2 })]
    #[case::zero_keywords(SearchWeights { title: 10, description: 5, keywords: 0 })]
    fn validate_unordered_weights(#[case] weights: SearchWeights) {
        let settings = SiteSettings {
            search: SearchSettings { weights, ..SearchSettings::default() },
            ..SiteSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("search.weights")),
                field!(ValidationError.message, contains_substring("title > description"))
            ]])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = SiteSettings {
            preference_key: String::new(),
            search: SearchSettings { min_query_length: 0, ..SearchSettings::default() },
            ..SiteSettings::default()
        };

        let errors = settings.validate().unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. preferenceKey"));
        assert_that!(error_message, contains_substring("2. search.minQueryLength"));
    }
}
