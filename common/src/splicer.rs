//! メタタグ書き換えモジュール
//!
//! HTMLを丸ごと組み立て直すのではなく、既存のタグだけをその場で書き換える。
//!
//! 対象:
//! - `<title>` の本文
//! - `meta[name="description"]` / `meta[property="og:*"]` / `meta[name="twitter:*"]` の `content`
//! - `link[rel="canonical"]` の `href`（URLが指定された場合のみ）
//!
//! 元のHTMLに存在しないタグは追加しない。

use crate::image::normalize_image;
use crate::site::SiteConfig;
use crate::types::{Locale, SpotRecord};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Serialize;
use std::ops::Range;

/// 説明文の最大文字数
pub const DESCRIPTION_MAX_CHARS: usize = 100;

/// 診断用metaタグのname
pub const DIAGNOSTIC_META_NAME: &str = "ogp-debug";

/// 要素として扱わない区間（コメントと、中身がテキスト扱いになる要素）
///
/// 閉じられていなければ文書末尾まで。
const OPAQUE: &str = r"(?P<skip><!--.*?(?:-->|\z)|<script\b[^>]*>.*?(?:</script\s*>|\z)|<style\b[^>]*>.*?(?:</style\s*>|\z)|<textarea\b[^>]*>.*?(?:</textarea\s*>|\z)|<noscript\b[^>]*>.*?(?:</noscript\s*>|\z))";

lazy_static! {
    static ref HEAD_TAG: Regex = Regex::new(&format!(
        r#"(?is){}|(?P<open><title(?:\s[^>]*)?>).*?(?P<close></title\s*>)|(?P<void><(?:meta|link)\b(?:[^>"']|"[^"]*"|'[^']*')*>)"#,
        OPAQUE
    ))
    .unwrap();
    static ref ATTRIBUTE: Regex = Regex::new(
        r#"(?P<name>[^\s"'<>/=]+)(?:\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|(?P<bare>[^\s"'=<>`]+)))?"#
    )
    .unwrap();
    static ref HEAD_CLOSE: Regex =
        Regex::new(&format!(r"(?is){}|(?P<head></head\s*>)", OPAQUE)).unwrap();
}

/// 書き換え後のメタ情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// `{タイトル} | {サイト名}`
    pub page_title: String,
    pub description: String,
    pub image: String,
    pub canonical: Option<String>,
}

impl PageMeta {
    /// スポットデータと言語からメタ情報を組み立てる
    pub fn from_record(record: &SpotRecord, locale: Locale, site: &SiteConfig) -> Self {
        let text = site.text(locale);
        let title = record.display_title(locale);

        let description = match record.display_description(locale) {
            Some(desc) => sanitize_description(desc),
            None => sanitize_description(&text.fallback_description(title)),
        };

        let image = if record.image.is_empty() {
            site.fallback_image.clone()
        } else {
            normalize_image(&record.image, site.thumbnail_width)
        };

        Self {
            page_title: text.page_title(title),
            description,
            image,
            canonical: None,
        }
    }

    pub fn with_canonical(mut self, url: impl Into<String>) -> Self {
        self.canonical = Some(url.into());
        self
    }
}

/// 説明文から改行を除き、先頭100文字に切り詰める
pub fn sanitize_description(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .take(DESCRIPTION_MAX_CHARS)
        .collect()
}

/// スポットデータでHTMLを書き換える
///
/// `record` が None の場合は元のHTMLをそのまま返す。
pub fn rewrite(html: &str, record: Option<&SpotRecord>, locale: Locale, site: &SiteConfig) -> String {
    match record {
        Some(record) => apply_meta(html, &PageMeta::from_record(record, locale, site)),
        None => html.to_string(),
    }
}

/// メタ情報を既存タグに反映
pub fn apply_meta(html: &str, meta: &PageMeta) -> String {
    HEAD_TAG
        .replace_all(html, |caps: &Captures| {
            if caps.name("skip").is_some() {
                return caps[0].to_string();
            }
            if let (Some(open), Some(close)) = (caps.name("open"), caps.name("close")) {
                return format!("{}{}{}", open.as_str(), escape_text(&meta.page_title), close.as_str());
            }
            let tag = &caps[0];
            rewrite_void_tag(tag, meta).unwrap_or_else(|| tag.to_string())
        })
        .into_owned()
}

/// `</head>` の直前にHTML断片を挿入する。`</head>` がなければ何もしない
pub fn append_to_head(html: &str, snippet: &str) -> String {
    let head_close = HEAD_CLOSE
        .captures_iter(html)
        .find_map(|caps| caps.name("head"));
    match head_close {
        Some(m) => {
            let mut out = String::with_capacity(html.len() + snippet.len());
            out.push_str(&html[..m.start()]);
            out.push_str(snippet);
            out.push_str(&html[m.start()..]);
            out
        }
        None => html.to_string(),
    }
}

/// 診断用metaタグ
pub fn diagnostic_tag(outcome: &str) -> String {
    format!(
        r#"<meta name="{}" content="{}">"#,
        DIAGNOSTIC_META_NAME,
        escape_attr(outcome)
    )
}

/// 書き換え対象のタグ
enum Target {
    Title,
    Description,
    Image,
    Canonical,
}

struct Attribute {
    name: String,
    value: String,
    span: Range<usize>,
}

fn classify(tag_name: &str, attrs: &[Attribute]) -> Option<(Target, &'static str)> {
    let value_of = |name: &str| attrs.iter().find(|a| a.name == name).map(|a| a.value.as_str());

    match tag_name {
        "meta" => {
            let by_name = match value_of("name") {
                Some("description") | Some("twitter:description") => Some(Target::Description),
                Some("twitter:title") => Some(Target::Title),
                Some("twitter:image") => Some(Target::Image),
                _ => None,
            };
            let target = by_name.or_else(|| match value_of("property") {
                Some("og:title") => Some(Target::Title),
                Some("og:description") => Some(Target::Description),
                Some("og:image") => Some(Target::Image),
                _ => None,
            })?;
            Some((target, "content"))
        }
        "link" if value_of("rel") == Some("canonical") => Some((Target::Canonical, "href")),
        _ => None,
    }
}

fn rewrite_void_tag(tag: &str, meta: &PageMeta) -> Option<String> {
    let name_end = tag[1..]
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .map(|i| i + 1)?;
    let tag_name = tag[1..name_end].to_ascii_lowercase();

    // 属性の追加位置は自己終了の `/` の手前。引用符なしの値に続く `/` は値の一部
    let body_end = if tag.ends_with("/>") { tag.len() - 2 } else { tag.len() - 1 };
    let body_end = body_end.max(name_end);
    let attrs = parse_attributes(tag, name_end..tag.len() - 1);

    let (target, attr_name) = classify(&tag_name, &attrs)?;
    let value = match target {
        Target::Title => meta.page_title.as_str(),
        Target::Description => meta.description.as_str(),
        Target::Image => meta.image.as_str(),
        Target::Canonical => meta.canonical.as_deref()?,
    };
    let replacement = format!(r#"{}="{}""#, attr_name, escape_attr(value));

    let mut out = String::with_capacity(tag.len() + replacement.len());
    match attrs.iter().find(|a| a.name == attr_name) {
        Some(existing) => {
            out.push_str(&tag[..existing.span.start]);
            out.push_str(&replacement);
            out.push_str(&tag[existing.span.end..]);
        }
        None => {
            out.push_str(&tag[..body_end]);
            out.push(' ');
            out.push_str(&replacement);
            out.push_str(&tag[body_end..]);
        }
    }
    Some(out)
}

fn parse_attributes(tag: &str, body: Range<usize>) -> Vec<Attribute> {
    let offset = body.start;
    ATTRIBUTE
        .captures_iter(&tag[body])
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let value = caps
                .name("dq")
                .or_else(|| caps.name("sq"))
                .or_else(|| caps.name("bare"))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            Some(Attribute {
                name: caps["name"].to_ascii_lowercase(),
                value,
                span: offset + whole.start()..offset + whole.end(),
            })
        })
        .collect()
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
