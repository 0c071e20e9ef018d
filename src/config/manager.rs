//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    SiteSettings,
};

/// 設定ファイル名
const CONFIG_FILE_NAME: &str = ".site-i18n.json";

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: SiteSettings,

    /// サイトのルートパス
    site_root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: SiteSettings::default(), site_root: None }
    }

    /// 設定を読み込む
    ///
    /// サイトルートに `.site-i18n.json` があればそれを使い、なければデフォルト設定を使う。
    /// 失敗した場合は既存の設定とサイトルートを保持する。
    ///
    /// # Arguments
    /// * `site_root` - サイトのルートパス
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, site_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for site root: {:?}", site_root);

        let settings = match &site_root {
            Some(root) => read_settings_file(root)?.unwrap_or_default(),
            None => SiteSettings::default(),
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.site_root = site_root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &SiteSettings {
        &self.current_settings
    }

    /// サイトルートを取得
    #[must_use]
    pub const fn site_root(&self) -> Option<&PathBuf> {
        self.site_root.as_ref()
    }

    /// 設定内の相対パスをサイトルート基準で解決する
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.site_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// サイトルートの設定ファイルを読む。ファイルがなければ `None`
fn read_settings_file(site_root: &Path) -> Result<Option<SiteSettings>, ConfigError> {
    let config_path = site_root.join(CONFIG_FILE_NAME);

    let content = match std::fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("Configuration file not found: {:?}", config_path);
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::debug!("Loaded configuration from: {:?}", config_path);
    Ok(Some(serde_json::from_str(&content)?))
}
