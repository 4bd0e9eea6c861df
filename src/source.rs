//! CSV取得元
//!
//! 公開スプレッドシート（HTTP）とローカルファイルの2種類。
//! リクエストごとに毎回取得し、キャッシュはしない。

use crate::config::SourceConfig;
use crate::error::{OgpError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

#[async_trait]
pub trait CsvSource: Send + Sync {
    /// ログ用の名前
    fn name(&self) -> &str;

    /// CSV本文を取得
    async fn fetch(&self) -> Result<String>;
}

/// HTTP GETで取得する取得元
pub struct HttpCsvSource {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl HttpCsvSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl CsvSource for HttpCsvSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<String> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OgpError::CsvFetch {
                source_name: self.name.clone(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// ローカルファイルから読む取得元
pub struct FileCsvSource {
    name: String,
    path: PathBuf,
}

impl FileCsvSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[async_trait]
impl CsvSource for FileCsvSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<String> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}

/// 設定から取得元の一覧を組み立てる（順序は設定どおり）
pub fn build_sources(configs: &[SourceConfig], client: &reqwest::Client) -> Vec<Arc<dyn CsvSource>> {
    configs
        .iter()
        .map(|c| -> Arc<dyn CsvSource> {
            if c.is_remote() {
                Arc::new(HttpCsvSource::new(&c.name, &c.location, client.clone()))
            } else {
                Arc::new(FileCsvSource::new(&c.name, &c.location))
            }
        })
        .collect()
}
