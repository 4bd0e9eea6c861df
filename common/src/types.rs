//! スポット情報の型定義
//!
//! - FieldRole: CSV列の正規化された役割
//! - Locale: 表示言語（jp / en）
//! - SpotRecord: 照合に成功した1スポット分のデータ

use serde::{Deserialize, Serialize};
use std::fmt;

/// CSV列の役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    Title,
    TitleEn,
    Description,
    DescriptionEn,
    Image,
}

impl FieldRole {
    pub const ALL: [FieldRole; 5] = [
        FieldRole::Title,
        FieldRole::TitleEn,
        FieldRole::Description,
        FieldRole::DescriptionEn,
        FieldRole::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldRole::Title => "title",
            FieldRole::TitleEn => "title_en",
            FieldRole::Description => "description",
            FieldRole::DescriptionEn => "description_en",
            FieldRole::Image => "image",
        }
    }
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 表示言語
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Jp,
    En,
}

impl Locale {
    /// `lang` クエリパラメータから判定（"en" 以外はすべて日本語）
    pub fn from_param(lang: Option<&str>) -> Self {
        match lang {
            Some("en") => Locale::En,
            _ => Locale::Jp,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Jp => "jp",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 照合結果のスポットデータ
///
/// 列が存在しない役割は空文字になる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotRecord {
    pub title: String,
    pub title_en: String,
    pub description: String,
    pub description_en: String,
    pub image: String,
}

impl SpotRecord {
    pub fn get(&self, role: FieldRole) -> &str {
        match role {
            FieldRole::Title => &self.title,
            FieldRole::TitleEn => &self.title_en,
            FieldRole::Description => &self.description,
            FieldRole::DescriptionEn => &self.description_en,
            FieldRole::Image => &self.image,
        }
    }

    pub fn set(&mut self, role: FieldRole, value: String) {
        match role {
            FieldRole::Title => self.title = value,
            FieldRole::TitleEn => self.title_en = value,
            FieldRole::Description => self.description = value,
            FieldRole::DescriptionEn => self.description_en = value,
            FieldRole::Image => self.image = value,
        }
    }

    /// 表示用タイトル（英語版が空なら日本語版）
    pub fn display_title(&self, locale: Locale) -> &str {
        match locale {
            Locale::En if !self.title_en.is_empty() => &self.title_en,
            _ => &self.title,
        }
    }

    /// 表示用の説明文。どの列も空なら None
    pub fn display_description(&self, locale: Locale) -> Option<&str> {
        let candidates = match locale {
            Locale::En => [self.description_en.as_str(), self.description.as_str()],
            Locale::Jp => [self.description.as_str(), ""],
        };
        candidates.into_iter().find(|s| !s.is_empty())
    }
}
