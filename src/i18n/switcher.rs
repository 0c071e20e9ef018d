//! Language switcher: applies the active language to the page and remembers it.

use std::sync::Arc;

use tokio::sync::watch;

use crate::config::{
    ConfigError,
    SiteSettings,
    ValidationError,
};
use crate::i18n::storage::PreferenceStore;
use crate::i18n::table::TranslationTable;
use crate::page::Page;
use crate::types::LanguageCode;

/// Owner of the active language.
///
/// The switcher is the only writer of the document language. Other
/// components learn about changes through [`LanguageSwitcher::subscribe`].
#[derive(Debug)]
pub struct LanguageSwitcher {
    /// Translations for every language.
    table: Arc<TranslationTable>,
    /// Languages accepted by [`LanguageSwitcher::set_language`].
    supported: Vec<LanguageCode>,
    /// Active language.
    current: LanguageCode,
    /// Storage key of the preference.
    preference_key: String,
    /// Durable storage of the preference.
    store: Box<dyn PreferenceStore>,
    /// Publishes the active language after each change.
    notifier: watch::Sender<LanguageCode>,
}

impl LanguageSwitcher {
    /// Picks the initial language and applies it to `page`.
    ///
    /// The stored preference wins when it names a supported language,
    /// otherwise the fallback language is used. Nothing is persisted here.
    ///
    /// Configured languages without translations are not supported, except
    /// the fallback language, which is always accepted.
    pub fn initialize(
        table: Arc<TranslationTable>,
        settings: &SiteSettings,
        store: Box<dyn PreferenceStore>,
        page: &mut Page,
    ) -> Result<Self, ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        let fallback = settings.fallback_code().ok_or_else(|| {
            ConfigError::ValidationErrors(vec![ValidationError::new(
                "fallbackLanguage",
                "The fallback language cannot be empty",
            )])
        })?;

        let mut supported = Vec::new();
        for code in settings.supported_codes() {
            if table.supports(&code) || code == fallback {
                supported.push(code);
            } else {
                tracing::warn!("No translations for configured language '{code}'; ignoring it");
            }
        }
        if !table.supports(&fallback) {
            tracing::warn!("No translations for fallback language '{fallback}'");
        }

        let stored = store.get(&settings.preference_key);
        let current = match stored.as_deref().and_then(LanguageCode::new) {
            Some(code) if supported.contains(&code) => code,
            Some(code) => {
                tracing::warn!("Ignoring unsupported stored language '{code}'");
                fallback
            }
            None => fallback,
        };

        let (notifier, _) = watch::channel(current.clone());
        let switcher = Self {
            table,
            supported,
            current,
            preference_key: settings.preference_key.clone(),
            store,
            notifier,
        };

        tracing::debug!(language = %switcher.current, "Initial language");
        switcher.apply(page);
        Ok(switcher)
    }

    /// Makes `code` the active language.
    ///
    /// `code` must equal a supported code exactly; anything else, including
    /// padded or differently cased codes, is ignored and leaves the page
    /// untouched. Returns whether the language was applied.
    pub fn set_language(&mut self, code: &str, page: &mut Page) -> bool {
        let Some(language) = self.supported.iter().find(|c| c.as_str() == code).cloned() else {
            tracing::debug!("Ignoring unsupported language '{code}'");
            return false;
        };

        self.current = language;
        self.apply(page);
        self.persist();
        self.notifier.send_replace(self.current.clone());

        tracing::info!(language = %self.current, "Language changed");
        true
    }

    #[must_use]
    pub const fn current(&self) -> &LanguageCode {
        &self.current
    }

    #[must_use]
    pub fn supports(&self, language: &LanguageCode) -> bool {
        self.supported.contains(language)
    }

    #[must_use]
    pub fn supported(&self) -> &[LanguageCode] {
        &self.supported
    }

    /// Stored preference, as the next page load would read it.
    #[must_use]
    pub fn stored_preference(&self) -> Option<String> {
        self.store.get(&self.preference_key)
    }

    /// Receiver of the active language; the current value counts as seen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LanguageCode> {
        self.notifier.subscribe()
    }

    /// Applies the active language. Text is rewritten before any selection
    /// indicator changes.
    fn apply(&self, page: &mut Page) {
        let language = &self.current;

        page.set_document_language(language.as_str());
        let rewritten = page.localize(|key| self.table.get(language, key));
        page.set_language_select(language.as_str());
        page.mark_current_language(language.as_str());

        tracing::debug!(language = %language, rewritten, "Language applied to page");
    }

    /// Writes the active language to the store; failures are only logged.
    fn persist(&mut self) {
        if let Err(e) = self.store.set(&self.preference_key, self.current.as_str()) {
            tracing::warn!("Language preference not saved: {e}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::i18n::storage::MemoryStore;
    use crate::page::{
        Element,
        Mutation,
    };
    use crate::test_utils::{
        UnavailableStore,
        code,
    };

    fn builtin_table() -> Arc<TranslationTable> {
        Arc::new(TranslationTable::builtin(".").unwrap())
    }

    fn sample_page() -> Page {
        Page::new()
            .with_element(Element::text("h1", "site.title", "Página web personal"))
            .with_element(Element::text("a", "nav.home", "Inicio"))
            .with_element(Element::text("p", "not.translated", "Original"))
            .with_element(Element::image("hobbies.photography", "Fotografía"))
            .with_language_select("es")
            .with_language_button("es")
            .with_language_button("en")
    }

    fn switcher_with(store: Box<dyn PreferenceStore>, page: &mut Page) -> LanguageSwitcher {
        LanguageSwitcher::initialize(builtin_table(), &SiteSettings::default(), store, page)
            .unwrap()
    }

    #[googletest::test]
    fn initialize_without_preference_uses_fallback() {
        let mut page = sample_page();

        let switcher = switcher_with(Box::new(MemoryStore::new()), &mut page);

        expect_that!(switcher.current(), eq(&code("es")));
        expect_that!(page.document_language(), some(eq("es")));
        expect_that!(switcher.stored_preference(), none());
    }

    #[googletest::test]
    fn initialize_reads_preference() {
        let mut page = sample_page();

        let switcher =
            switcher_with(Box::new(MemoryStore::with_entry("preferredLang", "en")), &mut page);

        expect_that!(switcher.current(), eq(&code("en")));
        expect_that!(page.element("site.title").unwrap().content, eq("Personal website"));
        expect_that!(page.language_select(), some(eq("en")));
    }

    #[googletest::test]
    fn initialize_ignores_unsupported_preference() {
        let mut page = sample_page();

        let switcher =
            switcher_with(Box::new(MemoryStore::with_entry("preferredLang", "fr")), &mut page);

        expect_that!(switcher.current(), eq(&code("es")));
    }

    #[rstest]
    fn initialize_rejects_invalid_settings() {
        let mut page = sample_page();
        let settings = SiteSettings { supported_languages: vec![], ..SiteSettings::default() };

        let result = LanguageSwitcher::initialize(
            builtin_table(),
            &settings,
            Box::new(MemoryStore::new()),
            &mut page,
        );

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
    }

    #[googletest::test]
    fn every_key_in_every_language() {
        let table = builtin_table();
        let mut keys: Vec<&str> = Vec::new();
        for language in table.languages() {
            keys.extend(table.keys(language));
        }
        keys.sort_unstable();
        keys.dedup();
        let mut page = Page::new();
        for key in &keys {
            page = page.with_element(Element::text("p", key, "?"));
        }
        let mut switcher = LanguageSwitcher::initialize(
            Arc::clone(&table),
            &SiteSettings::default(),
            Box::new(MemoryStore::new()),
            &mut page,
        )
        .unwrap();

        for language in ["en", "es"] {
            expect_that!(switcher.set_language(language, &mut page), eq(true));
            let language = code(language);
            for key in table.keys(&language) {
                expect_that!(
                    page.element(key).map(|e| e.content.as_str()),
                    eq(table.get(&language, key))
                );
            }
        }
        expect_that!(page.elements().len(), eq(keys.len()));
    }

    #[googletest::test]
    fn set_language_updates_page_and_storage() {
        let mut page = sample_page();
        let mut switcher = switcher_with(Box::new(MemoryStore::new()), &mut page);

        let applied = switcher.set_language("en", &mut page);

        expect_that!(applied, eq(true));
        expect_that!(switcher.current(), eq(&code("en")));
        expect_that!(page.document_language(), some(eq("en")));
        expect_that!(page.element("nav.home").unwrap().content, eq("Home"));
        expect_that!(page.element("hobbies.photography").unwrap().alt, some(eq("Photography")));
        expect_that!(page.element("not.translated").unwrap().content, eq("Original"));
        expect_that!(page.language_select(), some(eq("en")));
        expect_that!(switcher.stored_preference(), some(eq("en")));

        let current: Vec<bool> = page.language_buttons().iter().map(|b| b.aria_current).collect();
        expect_that!(current, elements_are![eq(&false), eq(&true)]);
    }

    #[rstest]
    #[case::unknown("fr")]
    #[case::empty("")]
    #[case::wrong_case("EN")]
    #[case::padded(" en ")]
    fn unsupported_language_is_noop(#[case] language: &str) {
        let mut page = sample_page();
        let mut switcher = switcher_with(Box::new(MemoryStore::new()), &mut page);
        let before = page.elements().to_vec();
        page.take_mutations();

        let applied = switcher.set_language(language, &mut page);

        assert_that!(applied, eq(false));
        assert_that!(switcher.current(), eq(&code("es")));
        assert_eq!(page.elements(), before.as_slice());
        assert!(page.mutations().is_empty());
        assert_that!(switcher.stored_preference(), none());
    }

    #[rstest]
    fn content_is_updated_before_current_marker() {
        let mut page = sample_page();
        let mut switcher = switcher_with(Box::new(MemoryStore::new()), &mut page);
        page.take_mutations();

        switcher.set_language("en", &mut page);

        let mutations = page.mutations();
        let last_text = mutations
            .iter()
            .rposition(|m| matches!(m, Mutation::Content { .. } | Mutation::Alt { .. }))
            .unwrap();
        let first_marker =
            mutations.iter().position(|m| matches!(m, Mutation::AriaCurrent { .. })).unwrap();
        assert_that!(last_text, lt(first_marker));
        assert_that!(mutations[0], eq(&Mutation::DocumentLanguage("en".to_string())));
    }

    #[googletest::test]
    fn storage_failure_is_tolerated() {
        let mut page = sample_page();
        let mut switcher = switcher_with(Box::new(UnavailableStore), &mut page);

        let applied = switcher.set_language("en", &mut page);

        expect_that!(applied, eq(true));
        expect_that!(switcher.current(), eq(&code("en")));
        expect_that!(page.document_language(), some(eq("en")));
    }

    #[googletest::test]
    fn subscribers_see_changes() {
        let mut page = sample_page();
        let mut switcher = switcher_with(Box::new(MemoryStore::new()), &mut page);
        let mut receiver = switcher.subscribe();

        expect_that!(receiver.has_changed().unwrap(), eq(false));

        switcher.set_language("en", &mut page);

        expect_that!(receiver.has_changed().unwrap(), eq(true));
        assert_eq!(*receiver.borrow_and_update(), code("en"));
    }

    #[googletest::test]
    fn configured_language_without_translations_is_unsupported() {
        let mut page = sample_page();
        let settings = SiteSettings {
            supported_languages: vec!["es".to_string(), "en".to_string(), "fr".to_string()],
            ..SiteSettings::default()
        };

        let mut switcher = LanguageSwitcher::initialize(
            builtin_table(),
            &settings,
            Box::new(MemoryStore::new()),
            &mut page,
        )
        .unwrap();

        expect_that!(switcher.supported().len(), eq(2));
        expect_that!(switcher.set_language("fr", &mut page), eq(false));
    }
}
