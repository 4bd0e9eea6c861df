//! 画像URL変換モジュール
//!
//! GoogleドライブのファイルURLはSNSのクローラーが画像として読めないため、
//! サムネイル用エンドポイントに書き換える。それ以外のURLはそのまま使う。

use lazy_static::lazy_static;
use regex::Regex;

/// GoogleドライブのURLに含まれるホスト名
pub const DRIVE_HOST: &str = "drive.google.com";

/// サムネイル幅の既定値（px）
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 1200;

lazy_static! {
    /// ドライブのファイルID（英数字・`-`・`_` が25文字以上続く部分）
    static ref DRIVE_FILE_ID: Regex = Regex::new(r"[-A-Za-z0-9_]{25,}").unwrap();
}

/// URLからドライブのファイルIDを抽出
pub fn drive_file_id(url: &str) -> Option<&str> {
    if !url.contains(DRIVE_HOST) {
        return None;
    }
    DRIVE_FILE_ID.find(url).map(|m| m.as_str())
}

/// 画像URLを埋め込み可能な形に変換
///
/// # Arguments
/// * `raw` - CSVの画像列の値
/// * `width` - サムネイル幅（px）
///
/// # Returns
/// 空文字なら空文字。ドライブのURLならサムネイルURL、それ以外は入力のまま。
///
/// # Examples
/// ```
/// use mihara_ogp_common::normalize_image;
///
/// let url = normalize_image("https://drive.google.com/file/d/ABCDEFGHIJKLMNOPQRSTUVWXY0123/view", 1200);
/// assert_eq!(url, "https://drive.google.com/thumbnail?id=ABCDEFGHIJKLMNOPQRSTUVWXY0123&sz=w1200");
/// ```
pub fn normalize_image(raw: &str, width: u32) -> String {
    match drive_file_id(raw) {
        Some(id) => format!("https://{}/thumbnail?id={}&sz=w{}", DRIVE_HOST, id, width),
        None => raw.to_string(),
    }
}
