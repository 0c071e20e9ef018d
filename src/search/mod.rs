//! In-page keyword search over the site's sections.
pub mod catalog;
pub mod engine;
pub mod matcher;
pub mod normalize;
pub mod view;

pub use catalog::{
    CatalogError,
    LanguageIndex,
    SearchCatalog,
    SearchRecord,
};
pub use engine::{
    IndexedRecord,
    MatchedField,
    RankedHit,
    build_index,
    rank,
};
pub use matcher::{
    PanelState,
    SearchMatcher,
};
pub use normalize::{
    NormalizedQuery,
    normalize,
    tokenize,
};
pub use view::{
    ResultEntry,
    ResultsView,
    render_list,
};
