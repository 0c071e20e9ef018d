//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use crate::i18n::{
    PreferenceStore,
    StorageError,
};
use crate::search::view::{
    ResultEntry,
    ResultsView,
};
use crate::types::LanguageCode;

/// テスト用の言語コードを作成する
pub(crate) fn code(s: &str) -> LanguageCode {
    LanguageCode::new(s).unwrap()
}

/// 描画内容を記録する `ResultsView`
#[derive(Debug, Default)]
pub(crate) struct RecordingView {
    /// `bind` が呼ばれたか
    pub(crate) bound: bool,
    /// 展開状態
    pub(crate) expanded: bool,
    /// 最後に表示されたエントリ
    pub(crate) entries: Vec<ResultEntry>,
    /// `show` の呼び出し回数
    pub(crate) show_calls: usize,
}

impl ResultsView for RecordingView {
    fn bind(&mut self) {
        self.bound = true;
    }

    fn show(&mut self, entries: Vec<ResultEntry>) {
        self.entries = entries;
        self.expanded = true;
        self.show_calls += 1;
    }

    fn close(&mut self) {
        self.entries.clear();
        self.expanded = false;
    }
}

/// 書き込みが常に失敗するストレージ
#[derive(Debug, Default)]
pub(crate) struct UnavailableStore;

impl PreferenceStore for UnavailableStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}
