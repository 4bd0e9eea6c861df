//! ヘッダー名エイリアス解決モジュール
//!
//! CSVヘッダーの表記ゆれ（英語名・日本語名・`_en` 接尾辞）を
//! 正規のフィールド役割（FieldRole）に対応付ける。

use crate::csv::Row;
use crate::error::{Error, Result};
use crate::types::{FieldRole, SpotRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 役割とその判定キーワード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRule {
    pub role: FieldRole,
    /// 小文字で記述する。ヘッダー名に部分一致すれば該当
    pub keywords: Vec<String>,
}

/// ヘッダー判定ルール
///
/// ルールは上から順に評価され、最初に一致した役割がその列の役割になる。
/// `desc_en` が `desc` に吸収されないよう、`_en` 付きのルールを先に置く。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderAliases {
    pub rules: Vec<AliasRule>,
}

impl Default for HeaderAliases {
    fn default() -> Self {
        let rule = |role, keywords: &[&str]| AliasRule {
            role,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        };

        Self {
            rules: vec![
                rule(FieldRole::Image, &["image", "画像"]),
                rule(FieldRole::DescriptionEn, &["desc_en", "description_en"]),
                rule(FieldRole::Description, &["desc", "紹介"]),
                rule(FieldRole::TitleEn, &["title_en"]),
                rule(FieldRole::Title, &["title", "タイトル"]),
            ],
        }
    }
}

impl HeaderAliases {
    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let aliases: Self = serde_json::from_str(json)?;
        aliases.validate()?;
        Ok(aliases)
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn validate(&self) -> Result<()> {
        let has_title = self
            .rules
            .iter()
            .any(|r| r.role == FieldRole::Title && r.keywords.iter().any(|k| !k.is_empty()));
        if !has_title {
            return Err(Error::InvalidAliases("タイトル列のキーワードが空です".into()));
        }
        Ok(())
    }

    /// ヘッダー名から役割を判定
    pub fn resolve(&self, header: &str) -> Option<FieldRole> {
        let name = header.trim().to_lowercase();
        self.rules
            .iter()
            .find(|rule| {
                rule.keywords
                    .iter()
                    .any(|k| !k.is_empty() && name.contains(k.as_str()))
            })
            .map(|rule| rule.role)
    }
}

/// 役割→列番号の対応表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderIndex {
    columns: HashMap<FieldRole, usize>,
}

impl HeaderIndex {
    /// ヘッダー行から対応表を構築
    ///
    /// 同じ役割の列が複数ある場合は左側の列を採用する。
    /// 後続の `rpg_title_en` などが `title_en` を上書きすることはない。
    pub fn build(header: &[String], aliases: &HeaderAliases) -> Self {
        let mut columns = HashMap::new();
        for (index, name) in header.iter().enumerate() {
            if let Some(role) = aliases.resolve(name) {
                columns.entry(role).or_insert(index);
            }
        }
        Self { columns }
    }

    pub fn column(&self, role: FieldRole) -> Option<usize> {
        self.columns.get(&role).copied()
    }

    pub fn title_column(&self) -> Option<usize> {
        self.column(FieldRole::Title)
    }

    /// データ行をSpotRecordに変換（値はtrim済み）
    pub fn record_from(&self, row: &Row) -> SpotRecord {
        let mut record = SpotRecord::default();
        for (&role, &index) in &self.columns {
            let value = row.get(index).map(|v| v.trim().to_string()).unwrap_or_default();
            record.set(role, value);
        }
        record
    }
}
