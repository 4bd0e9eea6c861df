//! チャット中継の結合テスト
//!
//! Gemini APIの代わりにローカルの偽サーバーへ転送させて検証する

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use mihara_ogp::config::{Config, GeminiConfig};
use mihara_ogp::server::{build_router, AppState};
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::net::TcpListener;

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// 受け取った内容をそのまま返す偽のGemini API
async fn spawn_fake_gemini() -> String {
    let router = Router::new()
        .route(
            "/models/:model_action",
            post(
                |Path(model_action): Path<String>,
                 Query(query): Query<HashMap<String, String>>,
                 Json(body): Json<Value>| async move {
                    Json(json!({
                        "modelAction": model_action,
                        "key": query.get("key"),
                        "echo": body,
                    }))
                },
            ),
        )
        .route(
            "/quota/:model_action",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "quota exceeded") }),
        );
    spawn(router).await
}

async fn spawn_proxy(api_key: Option<&str>, endpoint: String) -> String {
    let config = Config {
        gemini: GeminiConfig {
            api_key: api_key.map(String::from),
            endpoint,
            ..Default::default()
        },
        ..Default::default()
    };
    spawn(build_router(AppState::from_config(config).unwrap())).await
}

async fn post_chat(base: &str, body: &str) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/api/chat", base))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap();
    let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
    let json = response.json::<Value>().await.unwrap();
    (status, json)
}

const CHAT_BODY: &str = r#"{"contents":[{"role":"user","parts":[{"text":"三原城跡はどこ？"}]}]}"#;

/// 本文とキーが上流に届き、応答がそのまま返る
#[tokio::test]
async fn test_forwarded_to_gemini() {
    let upstream = spawn_fake_gemini().await;
    let base = spawn_proxy(Some("test-key"), format!("{}/models", upstream)).await;

    let (status, body) = post_chat(&base, CHAT_BODY).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modelAction"], "gemini-2.5-flash:generateContent");
    assert_eq!(body["key"], "test-key");
    assert_eq!(body["echo"]["contents"][0]["parts"][0]["text"], "三原城跡はどこ？");
}

/// キー未設定は500
#[tokio::test]
async fn test_missing_api_key() {
    let upstream = spawn_fake_gemini().await;
    let base = spawn_proxy(None, format!("{}/models", upstream)).await;

    let (status, body) = post_chat(&base, CHAT_BODY).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "APIキーが設定されていません。");
}

/// キーの確認は本文の解析より先
#[tokio::test]
async fn test_api_key_checked_before_body() {
    let base = spawn_proxy(None, "http://127.0.0.1:1/models".into()).await;

    let (status, body) = post_chat(&base, "not json").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "APIキーが設定されていません。");
}

/// JSONでない本文は400
#[tokio::test]
async fn test_invalid_body() {
    let upstream = spawn_fake_gemini().await;
    let base = spawn_proxy(Some("test-key"), format!("{}/models", upstream)).await;

    let (status, body) = post_chat(&base, "{\"contents\": [").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "リクエストデータが不正です。");
}

/// 上流のエラーは状態コードを保ったまま返す
#[tokio::test]
async fn test_upstream_error_status_kept() {
    let upstream = spawn_fake_gemini().await;
    let base = spawn_proxy(Some("test-key"), format!("{}/quota", upstream)).await;

    let (status, body) = post_chat(&base, CHAT_BODY).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "Gemini API Error");
    assert_eq!(body["details"], "quota exceeded");
}

/// 上流に接続できなければ500
#[tokio::test]
async fn test_upstream_unreachable() {
    let base = spawn_proxy(Some("test-key"), "http://127.0.0.1:1/models".into()).await;

    let (status, body) = post_chat(&base, CHAT_BODY).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Server Error");
    assert!(body["details"].is_string());
}

/// POST以外は受け付けない
#[tokio::test]
async fn test_get_not_allowed() {
    let base = spawn_proxy(Some("test-key"), "http://127.0.0.1:1/models".into()).await;
    let response = reqwest::get(format!("{}/api/chat", base)).await.unwrap();
    assert_eq!(response.status().as_u16(), 405);
}
