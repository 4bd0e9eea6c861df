//! チャット中継（Gemini API）
//!
//! 画面から送られたJSONをそのままGeminiの `generateContent` に転送する。
//! APIキーはサーバー側だけが持つ。

use crate::error::{OgpError, Result};
use crate::server::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, warn};

/// `POST /api/chat`
pub async fn chat_proxy(State(state): State<AppState>, body: Bytes) -> Response {
    match forward(&state, &body).await {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            text,
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// リクエストを転送し、上流の本文をテキストのまま返す
pub async fn forward(state: &AppState, body: &[u8]) -> Result<String> {
    let gemini = &state.config.gemini;
    let api_key = gemini.get_api_key()?;

    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| OgpError::InvalidRequestBody(e.to_string()))?;

    debug!(model = %gemini.model, bytes = body.len(), "Gemini APIへ転送");
    let response = state
        .http
        .post(gemini.generate_url(api_key))
        .json(&payload)
        .send()
        .await?;

    // 空レスポンスでも落ちないよう、まずテキストで受け取る
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(OgpError::Upstream {
            status: status.as_u16(),
            details: text,
        });
    }
    Ok(text)
}

fn error_response(err: OgpError) -> Response {
    let (status, body) = match &err {
        OgpError::MissingApiKey => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "APIキーが設定されていません。" }),
        ),
        OgpError::InvalidRequestBody(_) => (
            StatusCode::BAD_REQUEST,
            json!({ "error": "リクエストデータが不正です。" }),
        ),
        OgpError::Upstream { status, details } => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            json!({ "error": "Gemini API Error", "details": details }),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Server Error", "details": other.to_string() }),
        ),
    };

    warn!(status = status.as_u16(), error = %err, "チャット中継エラー");
    (status, Json(body)).into_response()
}
