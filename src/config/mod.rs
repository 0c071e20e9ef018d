//! Site configuration: settings types, file loading and validation.
/// 設定の読み込みと保持
mod manager;
/// 設定の型定義とバリデーション
mod types;

pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    SearchSettings,
    SearchWeights,
    SiteSettings,
    ValidationError,
};
