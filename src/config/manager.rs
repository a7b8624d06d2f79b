//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    CatalogSettings,
    ConfigError,
    SettingsOverrides,
    loader,
};

/// ワークスペースの設定とコマンドラインの上書きをまとめて管理する
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定（上書き適用後）
    current_settings: CatalogSettings,

    /// `.ts-catalog.json` を探したワークスペースのルート
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: CatalogSettings::default(), workspace_root: None }
    }

    /// ワークスペースの `.ts-catalog.json` を読み込む
    ///
    /// ファイルがない場合はデフォルト値を使う。
    /// 失敗した場合は以前の設定がそのまま残る。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!(?workspace_root, "Loading catalog settings");

        let settings = match &workspace_root {
            Some(root) => loader::load_from_workspace(root)?.unwrap_or_default(),
            None => CatalogSettings::default(),
        };
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.workspace_root = workspace_root;
        tracing::debug!(settings = ?self.current_settings, "Catalog settings loaded");
        Ok(())
    }

    /// コマンドライン引数 (`--no-obsolete`, `--jobs`) で設定を上書きする
    ///
    /// 上書き後の設定もバリデーションされ、エラーの場合は現在の設定を変更しない。
    ///
    /// # Errors
    /// - バリデーションエラー（`--jobs 0` など）
    pub fn apply_overrides(&mut self, overrides: SettingsOverrides) -> Result<(), ConfigError> {
        let settings = self.current_settings.with_overrides(overrides);
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        tracing::debug!(?overrides, "Command line overrides applied");
        self.current_settings = settings;
        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &CatalogSettings {
        &self.current_settings
    }

    /// 設定を読み込んだワークスペースのルート
    #[must_use]
    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }
}
