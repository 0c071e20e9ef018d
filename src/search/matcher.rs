//! Header search: reacts to input, outside clicks and language changes.

use std::sync::Arc;

use tokio::sync::watch;

use crate::config::SearchSettings;
use crate::search::catalog::{
    SearchCatalog,
    SearchRecord,
};
use crate::search::engine::{
    IndexedRecord,
    RankedHit,
    build_index,
    rank,
};
use crate::search::normalize::NormalizedQuery;
use crate::search::view::{
    ResultEntry,
    ResultsView,
};
use crate::types::LanguageCode;

/// Whether the result panel is showing anything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Idle,
    /// Hits of the last search, best first. Empty means the placeholder is shown.
    Open(Vec<RankedHit>),
}

/// Search over the current language's records.
///
/// Every input event recomputes the result list from scratch. A language
/// change replaces the whole index; nothing is carried over from the
/// previous language except the query text.
#[derive(Debug)]
pub struct SearchMatcher {
    /// Source of per-language records.
    catalog: Arc<SearchCatalog>,
    /// Minimum query length and field weights.
    settings: SearchSettings,
    /// Language the index was built for.
    language: LanguageCode,
    /// Normalized records of `language`.
    index: Vec<IndexedRecord>,
    /// Localized "no results" text.
    no_results: String,
    /// Raw text of the input, kept across dismissals.
    query: String,
    /// Result panel state.
    state: PanelState,
    /// Language-changed notifications; `None` once the sender is gone.
    language_feed: Option<watch::Receiver<LanguageCode>>,
}

impl SearchMatcher {
    #[must_use]
    pub fn new(
        catalog: Arc<SearchCatalog>,
        language: LanguageCode,
        settings: SearchSettings,
    ) -> Self {
        let mut matcher = Self {
            catalog,
            settings,
            language: language.clone(),
            index: Vec::new(),
            no_results: String::new(),
            query: String::new(),
            state: PanelState::Idle,
            language_feed: None,
        };
        matcher.reindex(language);
        matcher
    }

    /// Follows the active language published on `feed`.
    ///
    /// The value already in the channel counts as seen; only later changes
    /// are picked up by [`SearchMatcher::poll_language`].
    #[must_use]
    pub fn with_language_feed(mut self, mut feed: watch::Receiver<LanguageCode>) -> Self {
        feed.mark_unchanged();
        self.language_feed = Some(feed);
        self
    }

    /// Prepares `view` for this matcher: linked to the result container, collapsed.
    pub fn attach(&mut self, view: &mut dyn ResultsView) {
        view.bind();
        view.close();
        self.state = PanelState::Idle;
    }

    /// Handles a change of the search input.
    pub fn on_input(&mut self, raw: &str, view: &mut dyn ResultsView) {
        raw.clone_into(&mut self.query);
        self.run(view);
    }

    /// Handles a pointer interaction outside the search container.
    ///
    /// The query text is kept.
    pub fn on_outside_click(&mut self, view: &mut dyn ResultsView) {
        if self.is_open() {
            tracing::debug!("Search panel dismissed");
        }
        self.close(view);
    }

    /// Rebuilds the index for `language` and refreshes visible results.
    pub fn on_language_changed(&mut self, language: LanguageCode, view: &mut dyn ResultsView) {
        self.reindex(language);

        if NormalizedQuery::new(&self.query).is_searchable(self.settings.min_query_length) {
            self.run(view);
        }
    }

    /// Applies a pending language change from the feed.
    ///
    /// Returns whether a change was applied.
    pub fn poll_language(&mut self, view: &mut dyn ResultsView) -> bool {
        let Some(feed) = self.language_feed.as_mut() else {
            return false;
        };

        match feed.has_changed() {
            Ok(true) => {}
            Ok(false) => return false,
            Err(_) => {
                tracing::debug!("Language feed closed");
                self.language_feed = None;
                return false;
            }
        }

        let language = feed.borrow_and_update().clone();
        self.on_language_changed(language, view);
        true
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn language(&self) -> &LanguageCode {
        &self.language
    }

    #[must_use]
    pub const fn state(&self) -> &PanelState {
        &self.state
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, PanelState::Open(_))
    }

    /// Records of the last search with their scores, best first.
    #[must_use]
    pub fn results(&self) -> Vec<(&SearchRecord, u32)> {
        match &self.state {
            PanelState::Idle => Vec::new(),
            PanelState::Open(hits) => hits
                .iter()
                .filter_map(|hit| self.index.get(hit.position).map(|r| (r.record(), hit.score)))
                .collect(),
        }
    }

    /// Replaces the index with the records of `language`.
    fn reindex(&mut self, language: LanguageCode) {
        let language_index = self.catalog.index_for(&language);
        self.index = build_index(&language_index.records);
        self.no_results.clone_from(&language_index.no_results);

        tracing::debug!(language = %language, records = self.index.len(), "Search index rebuilt");
        self.language = language;
    }

    /// Runs the current query and renders the outcome.
    fn run(&mut self, view: &mut dyn ResultsView) {
        let query = NormalizedQuery::new(&self.query);
        if !query.is_searchable(self.settings.min_query_length) {
            self.close(view);
            return;
        }

        let hits = rank(&self.index, &query.terms(), &self.settings.weights);
        tracing::debug!(query = query.as_str(), hits = hits.len(), "Search ran");

        let entries = if hits.is_empty() {
            vec![ResultEntry::Placeholder { text: self.no_results.clone() }]
        } else {
            hits.iter()
                .filter_map(|hit| self.index.get(hit.position))
                .map(|indexed| {
                    let record = indexed.record();
                    ResultEntry::Link {
                        href: record.url.clone(),
                        title: record.title.clone(),
                        description: record.description.clone(),
                    }
                })
                .collect()
        };

        view.show(entries);
        self.state = PanelState::Open(hits);
    }

    /// Collapses the panel.
    fn close(&mut self, view: &mut dyn ResultsView) {
        view.close();
        self.state = PanelState::Idle;
    }
}
