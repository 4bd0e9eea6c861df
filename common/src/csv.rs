//! CSVパーサー
//!
//! Googleスプレッドシートの公開CSVを読むための最小実装。
//! ダブルクォートで囲まれたフィールド内のカンマ・改行・`""` エスケープに対応する。
//! どんな入力でもエラーにはならず、読めた範囲の行を返す。

/// CSVの1行（フィールドの並び）
pub type Row = Vec<String>;

/// パース済みCSV文書
///
/// 1行目がヘッダー、2行目以降がデータ行。
/// 行ごとのフィールド数は揃っているとは限らない（末尾の空欄が省略されることがある）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvDocument {
    rows: Vec<Row>,
}

impl CsvDocument {
    /// CSV文字列をパース
    pub fn parse(text: &str) -> Self {
        parse(text)
    }

    /// 全行（ヘッダー含む）
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// ヘッダー行
    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// データ行（ヘッダーを除く）
    pub fn records(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// CSV文字列を行×フィールドに分解する
///
/// クォート外の `\n` / `\r` / `\r\n` を行区切りとして扱う。
/// 閉じられていないクォートは入力末尾までをフィールド内容とみなす。
///
/// # Examples
/// ```
/// use mihara_ogp_common::csv::parse;
///
/// let doc = parse("a,\"b,c\nd\",e");
/// assert_eq!(doc.rows(), &[vec!["a".to_string(), "b,c\nd".to_string(), "e".to_string()]]);
/// ```
pub fn parse(text: &str) -> CsvDocument {
    let mut rows = Vec::new();
    let mut row: Row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    // "" はリテラルの "
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => row.push(std::mem::take(&mut field)),
            '\r' | '\n' if !in_quotes => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    // 末尾に改行がない場合の最終行
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    CsvDocument { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_simple() {
        let doc = parse("title,desc\n三原城跡,石垣が残る\n");
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.header(), Some(&row(&["title", "desc"])));
        assert_eq!(doc.records(), &[row(&["三原城跡", "石垣が残る"])]);
    }

    #[test]
    fn test_quoted_comma_and_newline() {
        let doc = parse("a,\"b,c\nd\",e");
        assert_eq!(doc.rows(), &[row(&["a", "b,c\nd", "e"])]);
    }

    #[test]
    fn test_escaped_quote() {
        let doc = parse("\"he said \"\"hi\"\"\"");
        assert_eq!(doc.rows(), &[row(&["he said \"hi\""])]);
    }

    #[test]
    fn test_crlf_is_single_break() {
        let doc = parse("a,b\r\nc,d\r\n");
        assert_eq!(doc.rows(), &[row(&["a", "b"]), row(&["c", "d"])]);
    }

    #[test]
    fn test_lone_cr_breaks_row() {
        let doc = parse("a\rb");
        assert_eq!(doc.rows(), &[row(&["a"]), row(&["b"])]);
    }

    #[test]
    fn test_crlf_inside_quotes_is_kept() {
        let doc = parse("\"line1\r\nline2\",x");
        assert_eq!(doc.rows(), &[row(&["line1\r\nline2", "x"])]);
    }

    #[test]
    fn test_trailing_empty_fields_kept() {
        let doc = parse("a,,\nb,");
        assert_eq!(doc.rows(), &[row(&["a", "", ""]), row(&["b", ""])]);
    }

    #[test]
    fn test_blank_line_yields_single_empty_field() {
        let doc = parse("h\n\nv\n");
        assert_eq!(doc.rows(), &[row(&["h"]), row(&[""]), row(&["v"])]);
    }

    #[test]
    fn test_empty_input() {
        let doc = parse("");
        assert!(doc.is_empty());
        assert!(doc.header().is_none());
        assert!(doc.records().is_empty());
    }

    #[test]
    fn test_unterminated_quote_flushes_rest() {
        let doc = parse("a,\"open\nstill open");
        assert_eq!(doc.rows(), &[row(&["a", "open\nstill open"])]);
    }

    #[test]
    fn test_quote_in_middle_of_field_toggles() {
        // 途中の " もクォート開始として扱う
        let doc = parse("ab\"c,d\"e,f");
        assert_eq!(doc.rows(), &[row(&["abc,de", "f"])]);
    }
}
