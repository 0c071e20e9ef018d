//! Headless model of the parts of a page the site scripts touch.
//!
//! Only what the switcher and the search read or write is modelled: the
//! document language attribute, elements carrying a translation key, the
//! language selection controls, and the header search region.

use serde::{
    Deserialize,
    Serialize,
};

use crate::search::view::{
    ResultEntry,
    ResultsView,
    render_list,
};

/// Home page fixture shipped with the crate.
const BUILTIN_PAGE: &str = include_str!("../assets/page.json");

/// A change applied to the page, in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// `lang` attribute of the document element.
    DocumentLanguage(String),
    /// Text content of the element bound to the key.
    Content { key: String },
    /// `alt` attribute of the element bound to the key.
    Alt { key: String },
    /// Value of the language select control.
    LanguageSelect(String),
    /// `aria-current` of a language button; `None` when removed.
    AriaCurrent { code: String, value: Option<&'static str> },
}

/// An element, optionally bound to a translation key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Element {
    pub tag: String,
    pub i18n_key: Option<String>,
    /// Inner markup.
    pub content: String,
    pub alt: Option<String>,
}

impl Element {
    #[must_use]
    pub fn text(tag: &str, key: &str, content: &str) -> Self {
        Self {
            tag: tag.to_string(),
            i18n_key: Some(key.to_string()),
            content: content.to_string(),
            alt: None,
        }
    }

    #[must_use]
    pub fn image(key: &str, alt: &str) -> Self {
        Self {
            tag: "img".to_string(),
            i18n_key: Some(key.to_string()),
            content: String::new(),
            alt: Some(alt.to_string()),
        }
    }

    /// Elements without text content get their accessible label translated instead.
    #[must_use]
    pub fn is_text(&self) -> bool {
        !self.tag.eq_ignore_ascii_case("img")
    }
}

/// A button selecting one language.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageButton {
    pub code: String,
    pub aria_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchInput {
    pub value: String,
    pub aria_expanded: bool,
    pub aria_controls: Option<String>,
}

/// Search box in the page header: input, result container and form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRegion {
    pub input: SearchInput,
    /// Id of the result container.
    pub results_id: String,
    pub has_form: bool,
    /// Entries currently rendered in the result container.
    #[serde(skip)]
    results: Vec<ResultEntry>,
}

impl Default for SearchRegion {
    fn default() -> Self {
        Self {
            input: SearchInput::default(),
            results_id: "search-results".to_string(),
            has_form: true,
            results: Vec::new(),
        }
    }
}

impl SearchRegion {
    #[must_use]
    pub fn results(&self) -> &[ResultEntry] {
        &self.results
    }

    /// Markup of the result container's content.
    #[must_use]
    pub fn results_html(&self) -> String {
        render_list(&self.results)
    }
}

impl ResultsView for SearchRegion {
    fn bind(&mut self) {
        self.input.aria_controls = Some(self.results_id.clone());
    }

    fn show(&mut self, entries: Vec<ResultEntry>) {
        self.results = entries;
        self.input.aria_expanded = true;
    }

    fn close(&mut self) {
        self.results.clear();
        self.input.aria_expanded = false;
    }
}

/// The document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    /// `lang` attribute of the document element.
    lang: Option<String>,
    /// Elements in document order.
    elements: Vec<Element>,
    /// Value of the language select control, if the page has one.
    language_select: Option<String>,
    language_buttons: Vec<LanguageButton>,
    /// Header search region, if the page has one.
    search: Option<SearchRegion>,
    /// Mutations applied so far.
    #[serde(skip)]
    journal: Vec<Mutation>,
}

impl Page {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in home page.
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Self::from_json(BUILTIN_PAGE)
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    #[must_use]
    pub fn with_language_select(mut self, value: &str) -> Self {
        self.language_select = Some(value.to_string());
        self
    }

    #[must_use]
    pub fn with_language_button(mut self, code: &str) -> Self {
        self.language_buttons.push(LanguageButton { code: code.to_string(), aria_current: false });
        self
    }

    #[must_use]
    pub fn with_search(mut self, region: SearchRegion) -> Self {
        self.search = Some(region);
        self
    }

    #[must_use]
    pub fn document_language(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn set_document_language(&mut self, code: &str) {
        self.lang = Some(code.to_string());
        self.journal.push(Mutation::DocumentLanguage(code.to_string()));
    }

    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// First element bound to `key`.
    #[must_use]
    pub fn element(&self, key: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.i18n_key.as_deref() == Some(key))
    }

    /// Rewrites every element whose key `lookup` resolves.
    ///
    /// Elements whose key is unresolved or resolves to an empty string are
    /// left untouched. Returns how many elements were rewritten.
    pub fn localize<'a>(&mut self, lookup: impl Fn(&str) -> Option<&'a str>) -> usize {
        let mut rewritten = 0;
        for element in &mut self.elements {
            let Some(key) = element.i18n_key.as_deref() else {
                continue;
            };
            let Some(translation) = lookup(key).filter(|t| !t.is_empty()) else {
                continue;
            };

            if element.is_text() {
                translation.clone_into(&mut element.content);
                self.journal.push(Mutation::Content { key: key.to_string() });
            } else {
                element.alt = Some(translation.to_string());
                self.journal.push(Mutation::Alt { key: key.to_string() });
            }
            rewritten += 1;
        }
        rewritten
    }

    #[must_use]
    pub fn language_select(&self) -> Option<&str> {
        self.language_select.as_deref()
    }

    /// Reflects `code` in the select control; no-op without one.
    pub fn set_language_select(&mut self, code: &str) {
        if let Some(value) = &mut self.language_select {
            code.clone_into(value);
            self.journal.push(Mutation::LanguageSelect(code.to_string()));
        }
    }

    #[must_use]
    pub fn language_buttons(&self) -> &[LanguageButton] {
        &self.language_buttons
    }

    /// Sets `aria-current` on the button for `code` and removes it elsewhere.
    pub fn mark_current_language(&mut self, code: &str) {
        for button in &mut self.language_buttons {
            button.aria_current = button.code == code;
            self.journal.push(Mutation::AriaCurrent {
                code: button.code.clone(),
                value: button.aria_current.then_some("true"),
            });
        }
    }

    #[must_use]
    pub const fn search_region(&self) -> Option<&SearchRegion> {
        self.search.as_ref()
    }

    pub const fn search_region_mut(&mut self) -> Option<&mut SearchRegion> {
        self.search.as_mut()
    }

    /// Mutations applied so far, oldest first.
    #[must_use]
    pub fn mutations(&self) -> &[Mutation] {
        &self.journal
    }

    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }
}
