//! Tolerant text table parser with encoding auto-detection.
//!
//! Turns a pasted or exported gradebook into a rectangular [`RawTable`].
//! The parser never fails: unbalanced quotes leave the rest of the line
//! inside the current cell, and short rows are padded.

use encoding_rs::{Encoding, UTF_8};
use std::path::Path;

/// Byte-order marks checked before running detection.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Rectangular table of trimmed string cells.
///
/// The first row fixes the width: shorter rows are padded with empty cells
/// and cells past that width are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
    width: usize,
}

impl RawTable {
    /// Build a table from rows, fitting every row to the first row's width.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { rows, width }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Cell text, or `""` outside the table.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

/// Result of parsing raw bytes, with the encoding that was used.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub table: RawTable,
    pub encoding: String,
}

/// Parse text content into a table.
///
/// Blank and whitespace-only lines are dropped. Handles both `\n` and
/// `\r\n` line endings.
///
/// # Example
/// ```ignore
/// use classin_convert::parse_table;
///
/// let table = parse_table("Name,Quiz\n\"Li, Wei\",85\n");
/// assert_eq!(table.cell(1, 0), "Li, Wei");
/// ```
pub fn parse_table(content: &str) -> RawTable {
    let rows = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect();

    RawTable::from_rows(rows)
}

/// Split one line into cells on commas outside double quotes.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                cells.push(clean_cell(&current));
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    cells.push(clean_cell(&current));

    cells
}

/// Trim a cell and unwrap it if it is fully quoted.
fn clean_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].replace("\"\"", "\"").trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Detect the encoding of raw bytes.
///
/// BOMs and valid UTF-8 win outright; otherwise chardet decides, with the
/// GB family folded into GB18030 (its superset).
pub fn detect_encoding(bytes: &[u8]) -> String {
    if bytes.starts_with(UTF8_BOM) {
        return "utf-8".to_string();
    }
    if bytes.starts_with(UTF16LE_BOM) {
        return "utf-16le".to_string();
    }
    if bytes.starts_with(UTF16BE_BOM) {
        return "utf-16be".to_string();
    }
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "gb2312" | "gbk" | "gb18030" | "hz-gb-2312" => "gb18030".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            "windows-1252".to_string()
        }
        other => other.to_string(),
    }
}

/// Decode bytes with the given encoding label, lossily.
///
/// Unknown labels fall back to UTF-8. A leading BOM is removed.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let encoding = Encoding::for_label(encoding.as_bytes()).unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

/// Parse bytes with encoding auto-detection.
pub fn parse_bytes_auto(bytes: &[u8]) -> ParseResult {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);

    ParseResult {
        table: parse_table(&content),
        encoding,
    }
}

/// Read and parse a file with encoding auto-detection.
pub fn parse_file_auto<P: AsRef<Path>>(path: P) -> std::io::Result<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    Ok(parse_bytes_auto(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_table() {
        let table = parse_table("a,b,c\n1,2,3");

        assert_eq!(table.len(), 2);
        assert_eq!(table.width(), 3);
        assert_eq!(table.cell(1, 2), "3");
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let table = parse_table("a,b\r\n\r\n   \r\n1,2\r\n");

        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, 1), "2");
    }

    #[test]
    fn test_quoted_comma() {
        let cells = parse_line(r#"x,"a,b",y"#);
        assert_eq!(cells, vec!["x", "a,b", "y"]);
    }

    #[test]
    fn test_doubled_quotes_collapse() {
        let cells = parse_line(r#""say ""hi""",2"#);
        assert_eq!(cells, vec![r#"say "hi""#, "2"]);
    }

    #[test]
    fn test_cells_trimmed() {
        let cells = parse_line("  Li Wei , 85 ,\" x \"");
        assert_eq!(cells, vec!["Li Wei", "85", "x"]);
    }

    #[test]
    fn test_unclosed_quote_is_best_effort() {
        let cells = parse_line(r#"Li,"85,90"#);
        assert_eq!(cells, vec!["Li", "\"85,90"]);
    }

    #[test]
    fn test_short_rows_padded() {
        let table = parse_table("a,b,c,d\n1,2");

        assert_eq!(table.row(1).unwrap().len(), 4);
        assert_eq!(table.cell(1, 3), "");
    }

    #[test]
    fn test_long_rows_truncated_to_first_row() {
        let table = parse_table("Gradebook export\nStudent Name,Quiz 1,Quiz 2\n");

        assert_eq!(table.width(), 1);
        assert_eq!(table.row(0).unwrap(), ["Gradebook export"]);
        assert_eq!(table.row(1).unwrap(), ["Student Name"]);
        assert_eq!(table.cell(1, 2), "");
    }

    #[test]
    fn test_empty_input() {
        let table = parse_table("");
        assert!(table.is_empty());
        assert_eq!(table.width(), 0);
        assert_eq!(table.cell(0, 0), "");
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("学生姓名,作业1\n".as_bytes());

        let result = parse_bytes_auto(&bytes);
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.table.cell(0, 0), "学生姓名");
    }

    #[test]
    fn test_gb18030_decoding() {
        let (bytes, _, _) = encoding_rs::GB18030.encode("学生姓名,作业1\n张三,85\n");
        let decoded = decode_content(&bytes, "gb18030");
        assert!(decoded.starts_with("学生姓名"));
    }

    #[test]
    fn test_utf16le_bom_detected() {
        let mut bytes = UTF16LE_BOM.to_vec();
        for unit in "Name,Quiz".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }

        let result = parse_bytes_auto(&bytes);
        assert_eq!(result.encoding, "utf-16le");
        assert_eq!(result.table.cell(0, 1), "Quiz");
    }

    #[test]
    fn test_parse_file_auto() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        std::fs::write(&path, "Student Name,Quiz\nLi,5\n").unwrap();

        let result = parse_file_auto(&path).unwrap();
        assert_eq!(result.table.len(), 2);
    }
}
