//! bilingual-site
//!
//! 2 言語サイト向けの言語切り替えとページ内キーワード検索

pub mod config;
pub mod i18n;
pub mod page;
pub mod search;
pub mod shell;
pub mod site;
pub mod types;

/// テスト用ユーティリティ
mod test_utils;

// Site を再エクスポート
pub use site::{
    PageEvent,
    Site,
    SiteError,
};
