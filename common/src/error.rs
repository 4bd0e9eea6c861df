//! エラー型定義
//!
//! 共通ライブラリで失敗しうるのはヘッダー定義ファイルの読み込みだけ。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("ヘッダー定義ファイルを読み込めません: {0}")]
    Io(#[from] std::io::Error),

    #[error("ヘッダー定義のJSONが不正です: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ヘッダー定義が不正です: {0}")]
    InvalidAliases(String),
}

pub type Result<T> = std::result::Result<T, Error>;
