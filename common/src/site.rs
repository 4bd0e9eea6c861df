//! サイト設定
//!
//! ページタイトルの接尾辞や説明文の代替文言など、言語ごとの固定文言をまとめる。

use crate::image::DEFAULT_THUMBNAIL_WIDTH;
use crate::types::Locale;
use serde::{Deserialize, Serialize};

/// 言語ごとの文言
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleText {
    /// `{タイトル} | {site_suffix}` の接尾辞
    pub site_suffix: String,
    /// 説明文が空のときの文言。`{title}` を表示タイトルに置換する
    pub description_fallback: String,
}

impl LocaleText {
    pub fn page_title(&self, title: &str) -> String {
        format!("{} | {}", title, self.site_suffix)
    }

    pub fn fallback_description(&self, title: &str) -> String {
        self.description_fallback.replace("{title}", title)
    }
}

/// サイト全体の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub jp: LocaleText,
    pub en: LocaleText,
    /// 画像列が空のときに使う画像（トップ画像）
    pub fallback_image: String,
    pub thumbnail_width: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            jp: LocaleText {
                site_suffix: "三原市まち歩き PHOTO MAP".into(),
                description_fallback: "{title}の風景です。".into(),
            },
            en: LocaleText {
                site_suffix: "Mihara Walk PHOTO MAP".into(),
                description_fallback: "{title} scenery.".into(),
            },
            fallback_image: "https://i.postimg.cc/Dy2sThhC/IMG-9586.jpg".into(),
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
        }
    }
}

impl SiteConfig {
    pub fn text(&self, locale: Locale) -> &LocaleText {
        match locale {
            Locale::Jp => &self.jp,
            Locale::En => &self.en,
        }
    }
}
