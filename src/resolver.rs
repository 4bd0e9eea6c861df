//! スポット解決
//!
//! 取得元を設定順に試し、最初に見つかったスポットを返す。
//! 取得・解析の失敗はここで握りつぶし、呼び出し側には結果の種別だけを渡す。

use crate::error::{OgpError, Result};
use crate::source::CsvSource;
use mihara_ogp_common::{find_spot_with, CsvDocument, HeaderAliases, SpotRecord};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 解決結果
#[derive(Debug)]
pub enum Resolution {
    Found { record: SpotRecord, source: String },
    /// どの取得元にも一致する行がない
    NotFound,
    /// すべての取得元で取得に失敗した（最後のエラー）
    Failed(OgpError),
}

impl Resolution {
    pub fn record(&self) -> Option<&SpotRecord> {
        match self {
            Resolution::Found { record, .. } => Some(record),
            _ => None,
        }
    }

    /// 診断タグに埋め込む結果コード
    pub fn outcome(&self) -> String {
        match self {
            Resolution::Found { .. } => "success_rewritten".into(),
            Resolution::NotFound => "spot_not_found_in_csv".into(),
            Resolution::Failed(e) => format!("error_{}", e),
        }
    }

    pub fn into_result(self, title: &str) -> Result<(SpotRecord, String)> {
        match self {
            Resolution::Found { record, source } => Ok((record, source)),
            Resolution::NotFound => Err(OgpError::SpotNotFound(title.to_string())),
            Resolution::Failed(e) => Err(e),
        }
    }
}

pub struct SpotResolver {
    sources: Vec<Arc<dyn CsvSource>>,
    aliases: HeaderAliases,
}

impl SpotResolver {
    pub fn new(sources: Vec<Arc<dyn CsvSource>>, aliases: HeaderAliases) -> Self {
        Self { sources, aliases }
    }

    pub fn sources(&self) -> &[Arc<dyn CsvSource>] {
        &self.sources
    }

    /// タイトルに一致するスポットを探す
    pub async fn resolve(&self, title: &str) -> Resolution {
        let mut last_error = None;
        let mut fetched_any = false;

        for source in &self.sources {
            let text = match source.fetch().await {
                Ok(text) => text,
                Err(e) => {
                    warn!(source = source.name(), error = %e, "CSVの取得に失敗");
                    last_error = Some(e);
                    continue;
                }
            };
            fetched_any = true;

            let doc = CsvDocument::parse(&text);
            if let Some(record) = find_spot_with(&doc, title, &self.aliases) {
                info!(source = source.name(), spot = title, "スポットを検出");
                return Resolution::Found {
                    record,
                    source: source.name().to_string(),
                };
            }
            debug!(source = source.name(), rows = doc.len(), spot = title, "一致する行なし");
        }

        match last_error {
            Some(e) if !fetched_any => Resolution::Failed(e),
            _ => Resolution::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedSource {
        name: &'static str,
        body: Option<&'static str>,
    }

    #[async_trait]
    impl CsvSource for FixedSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(&self) -> Result<String> {
            match self.body {
                Some(body) => Ok(body.to_string()),
                None => Err(OgpError::CsvFetch {
                    source_name: self.name.into(),
                    status: 503,
                }),
            }
        }
    }

    fn resolver(sources: Vec<FixedSource>) -> SpotResolver {
        SpotResolver::new(
            sources
                .into_iter()
                .map(|s| Arc::new(s) as Arc<dyn CsvSource>)
                .collect(),
            HeaderAliases::default(),
        )
    }

    #[tokio::test]
    async fn test_first_source_wins() {
        let r = resolver(vec![
            FixedSource { name: "gallery", body: Some("title,desc\n港,ギャラリー\n") },
            FixedSource { name: "local", body: Some("title,desc\n港,親子さんぽ\n") },
        ]);
        match r.resolve("港").await {
            Resolution::Found { record, source } => {
                assert_eq!(source, "gallery");
                assert_eq!(record.description, "ギャラリー");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_falls_through_to_second_source() {
        let r = resolver(vec![
            FixedSource { name: "gallery", body: None },
            FixedSource { name: "local", body: Some("タイトル,紹介\n公園,遊具がある\n") },
        ]);
        let resolution = r.resolve("公園").await;
        assert_eq!(resolution.outcome(), "success_rewritten");
        assert_eq!(resolution.record().unwrap().description, "遊具がある");
    }

    #[tokio::test]
    async fn test_not_found_when_any_source_answered() {
        let r = resolver(vec![
            FixedSource { name: "gallery", body: Some("title\n港\n") },
            FixedSource { name: "local", body: None },
        ]);
        let resolution = r.resolve("Nonexistent").await;
        assert!(matches!(resolution, Resolution::NotFound));
        assert_eq!(resolution.outcome(), "spot_not_found_in_csv");
    }

    #[tokio::test]
    async fn test_failed_when_all_sources_fail() {
        let r = resolver(vec![FixedSource { name: "gallery", body: None }]);
        let resolution = r.resolve("港").await;
        assert!(resolution.outcome().starts_with("error_"));
        assert!(matches!(
            resolution.into_result("港"),
            Err(OgpError::CsvFetch { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_no_sources_is_not_found() {
        let r = resolver(vec![]);
        assert!(matches!(
            r.resolve("港").await.into_result("港"),
            Err(OgpError::SpotNotFound(_))
        ));
    }
}
