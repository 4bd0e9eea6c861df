//! Mihara OGP Common Library
//!
//! スポットごとのOGP書き換えに使う純粋なロジック（ネットワークI/Oなし）:
//! CSVパース → ヘッダー解決 → スポット照合 → 画像URL変換 → メタタグ書き換え

pub mod csv;
pub mod types;
pub mod alias;
pub mod error;
pub mod matcher;
pub mod image;
pub mod site;
pub mod splicer;

pub use csv::{CsvDocument, Row};
pub use types::{FieldRole, Locale, SpotRecord};
pub use alias::{AliasRule, HeaderAliases, HeaderIndex};
pub use error::{Error, Result};
pub use matcher::{comparison_key, find_spot, find_spot_in_csv, find_spot_with};
pub use image::{normalize_image, DEFAULT_THUMBNAIL_WIDTH};
pub use site::{LocaleText, SiteConfig};
pub use splicer::{append_to_head, apply_meta, diagnostic_tag, rewrite, sanitize_description, PageMeta};
