//! スポット照合モジュール
//!
//! パース済みCSVから `spot` パラメータに一致する行を探す。
//! 比較は空白（全角スペース含む）を除去した文字列の完全一致。
//! 大文字小文字は区別する。

use crate::alias::{HeaderAliases, HeaderIndex};
use crate::csv::{CsvDocument, Row};
use crate::types::SpotRecord;

/// 比較キーを生成（空白をすべて除去）
///
/// # Examples
/// ```
/// use mihara_ogp_common::comparison_key;
///
/// assert_eq!(comparison_key("Old\u{3000}Bridge "), "OldBridge");
/// ```
pub fn comparison_key(title: &str) -> String {
    title.chars().filter(|c| !c.is_whitespace()).collect()
}

/// 既定のヘッダールールでスポットを探す
pub fn find_spot(doc: &CsvDocument, target_title: &str) -> Option<SpotRecord> {
    find_spot_with(doc, target_title, &HeaderAliases::default())
}

/// 指定したヘッダールールでスポットを探す
///
/// # Returns
/// * `Some(SpotRecord)` - 最初に一致した行
/// * `None` - データ行がない / タイトル列がない / 一致なし
pub fn find_spot_with(
    doc: &CsvDocument,
    target_title: &str,
    aliases: &HeaderAliases,
) -> Option<SpotRecord> {
    if doc.len() < 2 {
        return None;
    }

    let index = HeaderIndex::build(doc.header()?, aliases);
    let title_column = index.title_column()?;

    let target_key = comparison_key(target_title);
    if target_key.is_empty() {
        return None;
    }

    doc.records()
        .iter()
        .filter(|row| !is_blank(row) && row.len() > title_column)
        .find(|row| comparison_key(row[title_column].trim()) == target_key)
        .map(|row| index.record_from(row))
}

/// CSV文字列を直接照合
pub fn find_spot_in_csv(csv_text: &str, target_title: &str) -> Option<SpotRecord> {
    find_spot(&CsvDocument::parse(csv_text), target_title)
}

fn is_blank(row: &Row) -> bool {
    row.iter().all(|field| field.trim().is_empty())
}
