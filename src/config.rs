use crate::error::{MediaAiError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ベースURLを上書きする環境変数
pub const BASE_URL_ENV: &str = "MEDIA_AI_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// プレビュー画像の最大辺(px)
    pub preview_max_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_seconds: 120,
            preview_max_size: 256,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MediaAiError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("media-ai").join("config.json"))
    }

    /// 実際に使うベースURL（環境変数を優先）
    pub fn effective_base_url(&self) -> String {
        self.base_url_with_override(std::env::var(BASE_URL_ENV).ok().as_deref())
    }

    /// 上書き値（空白のみは無視）があればそれを使う
    pub fn base_url_with_override(&self, override_url: Option<&str>) -> String {
        match override_url {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => self.base_url.clone(),
        }
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        validate_base_url(&url)?;
        self.base_url = url;
        self.save()
    }

    pub fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(MediaAiError::Config("タイムアウトは1秒以上にしてください".into()));
        }
        self.timeout_seconds = seconds;
        self.save()
    }
}

/// ベースURLの形式チェック（http:// または https://）
pub fn validate_base_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(MediaAiError::Config(format!(
            "ベースURLは http:// または https:// で始めてください: {}",
            url
        )))
    }
}
