//! Site translations, the stored language preference, and the switcher tying them to the page.

pub mod storage;
pub mod switcher;
pub mod table;

pub use storage::{
    FileStore,
    MemoryStore,
    PreferenceStore,
    StorageError,
};
pub use switcher::LanguageSwitcher;
pub use table::{
    CoverageGap,
    TranslationError,
    TranslationTable,
    flatten_json,
};
