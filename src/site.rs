//! Startup wiring and page event dispatch.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{
    ConfigError,
    ConfigManager,
    SiteSettings,
    ValidationError,
};
use crate::i18n::{
    FileStore,
    LanguageSwitcher,
    MemoryStore,
    PreferenceStore,
    TranslationError,
    TranslationTable,
};
use crate::page::{
    Page,
    SearchRegion,
};
use crate::search::{
    CatalogError,
    SearchCatalog,
    SearchMatcher,
};

/// Errors raised while starting the site.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Translations(#[from] TranslationError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to read page {path}: {source}")]
    PageIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid page: {0}")]
    PageParse(#[from] serde_json::Error),
}

/// Something the visitor did on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// A language button was pressed or the select control changed.
    SelectLanguage(String),
    /// The search input now holds this text.
    Input(String),
    Click { inside_search: bool },
    /// The form around the search input was submitted.
    Submit,
}

/// A page with its language switcher and, if it has a search region, its search.
#[derive(Debug)]
pub struct Site {
    /// The document.
    page: Page,
    /// Owner of the active language.
    switcher: LanguageSwitcher,
    /// `None` when the page has no search region.
    search: Option<SearchMatcher>,
}

impl Site {
    /// Applies the initial language to `page` and attaches the search.
    pub fn bootstrap(
        settings: &SiteSettings,
        table: TranslationTable,
        catalog: SearchCatalog,
        mut page: Page,
        store: Box<dyn PreferenceStore>,
    ) -> Result<Self, SiteError> {
        for gap in table.coverage_gaps() {
            tracing::warn!(language = %gap.language, key = %gap.key, "Missing translation");
        }

        let switcher = LanguageSwitcher::initialize(Arc::new(table), settings, store, &mut page)?;

        let search = if let Some(region) = page.search_region_mut() {
            let mut matcher =
                SearchMatcher::new(Arc::new(catalog), switcher.current().clone(), settings.search)
                    .with_language_feed(switcher.subscribe());
            matcher.attach(region);
            Some(matcher)
        } else {
            tracing::debug!("Page has no search region; search disabled");
            None
        };

        Ok(Self { page, switcher, search })
    }

    /// Builds the site from the loaded settings.
    ///
    /// Unset paths fall back to the data embedded in the crate and an
    /// in-memory preference store.
    pub fn load(config: &ConfigManager) -> Result<Self, SiteError> {
        let settings = config.get_settings();
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        let fallback = settings.fallback_code().ok_or_else(|| {
            ConfigError::ValidationErrors(vec![ValidationError::new(
                "fallbackLanguage",
                "The fallback language cannot be empty",
            )])
        })?;

        let table = match &settings.translations_dir {
            Some(dir) => TranslationTable::load_dir(&config.resolve(dir), &settings.key_separator)?,
            None => TranslationTable::builtin(&settings.key_separator)?,
        };

        let catalog = match &settings.search_dir {
            Some(dir) => SearchCatalog::load_dir(&config.resolve(dir), fallback)?,
            None => SearchCatalog::builtin(fallback)?,
        };

        let page = match &settings.page_file {
            Some(file) => {
                let path = config.resolve(file);
                let content = std::fs::read_to_string(&path)
                    .map_err(|source| SiteError::PageIo { path, source })?;
                Page::from_json(&content)?
            }
            None => Page::builtin()?,
        };

        let store: Box<dyn PreferenceStore> = match &settings.preferences_file {
            Some(file) => Box::new(FileStore::open(&config.resolve(file))),
            None => Box::new(MemoryStore::new()),
        };

        Self::bootstrap(settings, table, catalog, page, store)
    }

    /// Routes `event` to the component that owns it.
    pub fn dispatch(&mut self, event: PageEvent) {
        tracing::debug!(?event, "Page event");

        match event {
            PageEvent::SelectLanguage(code) => {
                if self.switcher.set_language(&code, &mut self.page)
                    && let Some((matcher, region)) = self.search_parts()
                {
                    matcher.poll_language(region);
                }
            }
            PageEvent::Input(text) => {
                if let Some((matcher, region)) = self.search_parts() {
                    region.input.value.clone_from(&text);
                    matcher.on_input(&text, region);
                }
            }
            PageEvent::Click { inside_search: false } => {
                if let Some((matcher, region)) = self.search_parts() {
                    matcher.on_outside_click(region);
                }
            }
            PageEvent::Click { inside_search: true } => {}
            PageEvent::Submit => {
                if self.page.search_region().is_some_and(|region| region.has_form) {
                    tracing::debug!("Search form submission suppressed");
                }
            }
        }
    }

    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub const fn switcher(&self) -> &LanguageSwitcher {
        &self.switcher
    }

    #[must_use]
    pub const fn search(&self) -> Option<&SearchMatcher> {
        self.search.as_ref()
    }

    /// The matcher together with the region it renders into.
    fn search_parts(&mut self) -> Option<(&mut SearchMatcher, &mut SearchRegion)> {
        let matcher = self.search.as_mut()?;
        let region = self.page.search_region_mut()?;
        Some((matcher, region))
    }
}
