//! OGP書き換えミドルウェア
//!
//! ページ配信の後段でHTMLレスポンスを受け取り、`?spot=` に対応するスポットの
//! 情報でメタタグを書き換える。解決できなかった場合は元のレスポンスをそのまま返す。

use crate::config::Config;
use crate::resolver::Resolution;
use crate::server::AppState;
use axum::{
    body::Body,
    extract::{Query, Request, State},
    http::{header, Uri},
    middleware::Next,
    response::Response,
};
use mihara_ogp_common::{append_to_head, apply_meta, diagnostic_tag, Locale, PageMeta};
use tracing::{debug, warn};

/// ページURLのクエリ
#[derive(Debug, Default)]
pub struct SpotQuery {
    pub spot: Option<String>,
    pub lang: Option<String>,
}

impl SpotQuery {
    /// 同じキーが複数あれば最初の値を使う。解釈できないクエリは「指定なし」とみなす
    pub fn from_uri(uri: &Uri) -> Self {
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();

        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };
        Self {
            spot: first("spot"),
            lang: first("lang"),
        }
    }

    /// 空文字の `spot=` は未指定扱い
    pub fn spot(&self) -> Option<&str> {
        self.spot.as_deref().filter(|s| !s.is_empty())
    }

    pub fn locale(&self) -> Locale {
        Locale::from_param(self.lang.as_deref())
    }
}

/// canonical URL（`public_base_url` + パスとクエリ）
pub fn canonical_url(config: &Config, uri: &Uri) -> Option<String> {
    let base = config.public_base_url.as_deref()?;
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    Some(format!("{}{}", base.trim_end_matches('/'), path))
}

/// 解決結果をHTMLに反映する
///
/// 見つからなかった場合、診断タグが無効なら入力をそのまま返す。
pub fn render_html(
    html: &str,
    resolution: &Resolution,
    locale: Locale,
    canonical: Option<String>,
    config: &Config,
) -> String {
    let mut out = match resolution.record() {
        Some(record) => {
            let mut meta = PageMeta::from_record(record, locale, &config.site);
            if let Some(url) = canonical {
                meta = meta.with_canonical(url);
            }
            apply_meta(html, &meta)
        }
        None => html.to_string(),
    };

    if config.diagnostics {
        out = append_to_head(&out, &diagnostic_tag(&resolution.outcome()));
    }
    out
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("text/html"))
        .unwrap_or(false)
}

/// axumミドルウェア本体
pub async fn ogp_rewrite(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let query = SpotQuery::from_uri(req.uri());
    let canonical = canonical_url(&state.config, req.uri());

    let response = next.run(req).await;

    if !is_html(&response) {
        return response;
    }
    let Some(spot) = query.spot() else {
        return response;
    };
    let locale = query.locale();

    let resolution = state.resolver.resolve(spot).await;
    if resolution.record().is_none() && !state.config.diagnostics {
        debug!(spot, outcome = %resolution.outcome(), "書き換えなし");
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "レスポンス本文の読み込みに失敗");
            return Response::from_parts(parts, Body::empty());
        }
    };

    let html = match String::from_utf8(Vec::from(bytes)) {
        Ok(html) => html,
        Err(e) => {
            warn!(spot, "UTF-8ではないHTMLのため書き換えをスキップ");
            return Response::from_parts(parts, Body::from(e.into_bytes()));
        }
    };

    let rewritten = render_html(&html, &resolution, locale, canonical, &state.config);
    debug!(spot, %locale, outcome = %resolution.outcome(), "メタタグを書き換え");

    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(rewritten))
}
