use crate::error::{OgpError, Result};
use mihara_ogp_common::SiteConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// ギャラリー用CSV
pub const GALLERY_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vR0jkQnLXsIL33pmO60BCd0hIr_v5xh34cJ_IWAHkF0pTaj855pzicmNoVx6W8CPK3MEhlp-irodPSE/pub?gid=1232979489&single=true&output=csv";

/// 親子さんぽ用CSV（フォーム回答シート）
pub const LOCAL_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vTia8V00j15toSprtd2bQV4JWrZprRz7m_cf73IZla6KOu62wtunUjCrb9wKkyNthWep8TfDeT8HW2B/pub?gid=1467172273&single=true&output=csv";

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// CSVの取得元。`location` はURLまたはローカルファイルのパス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub location: String,
}

impl SourceConfig {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.location.starts_with("http://") || self.location.starts_with("https://")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".into(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models".into(),
        }
    }
}

impl GeminiConfig {
    pub fn get_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(OgpError::MissingApiKey)
    }

    /// `generateContent` のURL（キー付き）
    pub fn generate_url(&self, api_key: &str) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            api_key
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 待ち受けアドレス
    pub listen: String,
    /// 配信するHTMLのルートディレクトリ
    pub site_root: PathBuf,
    /// canonical URLの基点（未設定ならcanonicalは書き換えない）
    pub public_base_url: Option<String>,
    /// 結果を `<meta name="ogp-debug">` として埋め込む
    pub diagnostics: bool,
    pub log_level: String,
    /// 上から順に探す
    pub sources: Vec<SourceConfig>,
    /// ヘッダー判定ルールのJSON（未指定なら組み込みルール）
    pub header_aliases: Option<PathBuf>,
    pub gemini: GeminiConfig,
    pub site: SiteConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8788".into(),
            site_root: PathBuf::from("public"),
            public_base_url: None,
            diagnostics: false,
            log_level: "info".into(),
            sources: vec![
                SourceConfig::new("gallery", GALLERY_CSV_URL),
                SourceConfig::new("oyako-sanpo", LOCAL_CSV_URL),
            ],
            header_aliases: None,
            gemini: GeminiConfig::default(),
            site: SiteConfig::default(),
        }
    }
}

impl Config {
    /// 設定を読み込む
    ///
    /// パス指定時はそのファイルが必須。未指定なら既定パスを探し、なければ既定値。
    /// 環境変数 `GEMINI_API_KEY` があれば設定ファイルの値より優先する。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(OgpError::Config(format!(
                        "設定ファイルが見つかりません: {}",
                        path.display()
                    )));
                }
                Self::from_json(&std::fs::read_to_string(path)?)?
            }
            None => {
                let default_path = Self::config_path()?;
                if default_path.exists() {
                    Self::from_json(&std::fs::read_to_string(&default_path)?)?
                } else {
                    Self::default()
                }
            }
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.gemini.api_key = Some(key);
            }
        }

        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(empty) = self.sources.iter().find(|s| s.location.trim().is_empty()) {
            return Err(OgpError::Config(format!("CSVの取得元が空です: {}", empty.name)));
        }
        Ok(())
    }

    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| OgpError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("mihara-ogp").join("config.json"))
    }

    pub fn set_api_key(&mut self, key: String, path: Option<&Path>) -> Result<()> {
        self.gemini.api_key = Some(key);
        self.save(path)
    }

    /// 表示用（APIキーを伏せる）
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        if masked.gemini.api_key.is_some() {
            masked.gemini.api_key = Some("********".into());
        }
        masked
    }
}
