//! HTTPサーバー
//!
//! `site_root` の静的ページを配信し、その応答をOGP書き換えミドルウェアに通す。
//! `/api/chat` はGemini APIへの中継。

use crate::chat;
use crate::config::Config;
use crate::error::Result;
use crate::middleware::ogp_rewrite;
use crate::resolver::SpotResolver;
use crate::source::build_sources;
use axum::{middleware, routing::post, Router};
use mihara_ogp_common::HeaderAliases;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

/// リクエスト間で共有する読み取り専用の状態
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub resolver: Arc<SpotResolver>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mihara-ogp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let aliases = match &config.header_aliases {
            Some(path) => HeaderAliases::from_file(path)?,
            None => HeaderAliases::default(),
        };

        let sources = build_sources(&config.sources, &http);
        let resolver = SpotResolver::new(sources, aliases);

        Ok(Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            http,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let site = ServeDir::new(&state.config.site_root);

    Router::new()
        .route("/api/chat", post(chat::chat_proxy))
        .fallback_service(site)
        .layer(middleware::from_fn_with_state(state.clone(), ogp_rewrite))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(state: AppState) -> Result<()> {
    let addr = state.config.listen.clone();
    let listener = TcpListener::bind(&addr).await?;

    info!(
        addr = %addr,
        root = %state.config.site_root.display(),
        sources = state.resolver.sources().len(),
        "HTTPサーバーを起動"
    );
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
