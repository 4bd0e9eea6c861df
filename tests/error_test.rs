//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use mihara_ogp::config::{Config, SourceConfig};
use mihara_ogp::error::OgpError;
use mihara_ogp::server::AppState;
use tempfile::tempdir;

/// 存在しない設定ファイルを指定した場合
#[test]
fn test_load_missing_config() {
    let result = Config::load(Some(std::path::Path::new("/nonexistent/path/12345/config.json")));
    assert!(matches!(result, Err(OgpError::Config(_))));
}

/// 壊れた設定ファイル
#[test]
fn test_load_broken_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ listen: ").unwrap();

    let result = Config::load(Some(&path));
    assert!(matches!(result, Err(OgpError::JsonParse(_))));
}

/// ヘッダー定義ファイルにタイトル列の指定がない場合
#[test]
fn test_header_aliases_without_title() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("aliases.json");
    std::fs::write(&path, r#"{"rules":[{"role":"image","keywords":["photo"]}]}"#).unwrap();

    let config = Config {
        header_aliases: Some(path),
        ..Default::default()
    };
    let result = AppState::from_config(config);
    assert!(matches!(result, Err(OgpError::HeaderAliases(_))));
}

/// 存在しないCSVファイルを取得元にした場合は取得失敗として扱う
#[tokio::test]
async fn test_missing_csv_file_resolves_to_failure() {
    let config = Config {
        sources: vec![SourceConfig::new("local", "/nonexistent/path/12345/spots.csv")],
        ..Default::default()
    };
    let state = AppState::from_config(config).unwrap();

    let resolution = state.resolver.resolve("三原城跡").await;
    assert!(resolution.record().is_none());
    assert!(resolution.outcome().starts_with("error_"));
    assert!(matches!(resolution.into_result("三原城跡"), Err(OgpError::Io(_))));
}

/// OgpErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        OgpError::Config("テスト設定エラー".to_string()),
        OgpError::MissingApiKey,
        OgpError::CsvFetch {
            source_name: "gallery".to_string(),
            status: 404,
        },
        OgpError::SpotNotFound("三原城跡".to_string()),
        OgpError::InvalidRequestBody("EOF".to_string()),
        OgpError::Upstream {
            status: 503,
            details: "unavailable".to_string(),
        },
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// MissingApiKeyエラーのメッセージ確認
#[test]
fn test_missing_api_key_message() {
    let display = format!("{}", OgpError::MissingApiKey);

    assert!(display.contains("APIキー"));
    assert!(display.contains("GEMINI_API_KEY"));
}

/// CSV取得エラーに取得元と状態コードが入る
#[test]
fn test_csv_fetch_message() {
    let err = OgpError::CsvFetch {
        source_name: "oyako-sanpo".to_string(),
        status: 500,
    };
    let display = format!("{}", err);

    assert!(display.contains("oyako-sanpo"));
    assert!(display.contains("500"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: OgpError = io_err.into();

    assert!(matches!(err, OgpError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: OgpError = json_err.into();

    assert!(matches!(err, OgpError::JsonParse(_)));
}

/// common::Errorからの変換
#[test]
fn test_common_error_conversion() {
    let common_err = mihara_ogp_common::Error::InvalidAliases("タイトル列の指定がありません".to_string());
    let err: OgpError = common_err.into();

    assert!(matches!(err, OgpError::HeaderAliases(_)));
    assert!(format!("{}", err).contains("タイトル列"));
}
