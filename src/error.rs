use thiserror::Error;

#[derive(Error, Debug)]
pub enum OgpError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。環境変数 GEMINI_API_KEY か設定ファイルの gemini.api_key を設定してください")]
    MissingApiKey,

    #[error("CSV取得エラー ({source_name}): HTTP {status}")]
    CsvFetch { source_name: String, status: u16 },

    #[error("スポットが見つかりません: {0}")]
    SpotNotFound(String),

    #[error("リクエストデータが不正です: {0}")]
    InvalidRequestBody(String),

    #[error("Gemini APIエラー: HTTP {status}")]
    Upstream { status: u16, details: String },

    #[error(transparent)]
    HeaderAliases(#[from] mihara_ogp_common::Error),

    #[error("HTTP通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OgpError>;
