//! Structural discovery inside a noisy export.
//!
//! ClassIn exports look like this once the leading junk is skipped:
//!
//! ```text
//! row h     │ 学生姓名 │ Quiz 1 │ Essay  │ Remarks │
//! row h+1   │ 满分     │ 50     │ 100分  │         │   ← max marks
//! row h+2   │ 类别     │ 测验   │ 作业   │         │   ← category (skipped)
//! row h+3.. │ 张三     │ 45     │ 已提交 │ ...     │   ← students
//! ```
//!
//! Both the conversion and the status-discovery pass go through
//! [`detect_layout`], so they always agree on what is an assignment.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{HEADER_MARKERS, HEADER_SCAN_LIMIT, STUDENT_SEPARATOR_PREFIX};
use crate::models::{parse_number, Assignment};
use crate::parser::RawTable;

/// Everything that is not part of a decimal number.
static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.]").expect("static regex"));

/// Offset from the header row to the first student row.
const STUDENT_ROW_OFFSET: usize = 3;

/// Header position and valid assignment columns of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub header_row: usize,
    pub assignments: Vec<Assignment>,
}

impl SheetLayout {
    /// Index of the first row that may hold a student.
    pub fn first_student_row(&self) -> usize {
        self.header_row + STUDENT_ROW_OFFSET
    }

    pub fn has_assignments(&self) -> bool {
        !self.assignments.is_empty()
    }
}

/// Locate header row and assignments in one go.
pub fn detect_layout(table: &RawTable) -> SheetLayout {
    let header_row = locate_header_row(table);
    let assignments = extract_assignments(table, header_row);
    SheetLayout {
        header_row,
        assignments,
    }
}

/// Index of the student-name header row, or 0 when none is found.
///
/// Only the first [`HEADER_SCAN_LIMIT`] rows are searched.
pub fn locate_header_row(table: &RawTable) -> usize {
    table
        .rows()
        .iter()
        .take(HEADER_SCAN_LIMIT)
        .position(|row| {
            let first = row.first().map(|c| c.trim()).unwrap_or("");
            HEADER_MARKERS.iter().any(|marker| first.contains(marker))
        })
        .unwrap_or(0)
}

/// Valid assignment columns below `header_row`.
///
/// A column qualifies when its header is non-empty and its max-marks cell
/// cleans to a positive number. Column 0 holds student names and is never
/// an assignment.
pub fn extract_assignments(table: &RawTable, header_row: usize) -> Vec<Assignment> {
    let marks_row = header_row + 1;
    if table.len() < header_row + 2 {
        return Vec::new();
    }

    (1..table.width())
        .filter_map(|column| {
            let name = table.cell(header_row, column).trim();
            if name.is_empty() {
                return None;
            }
            let total = clean_total_marks(table.cell(marks_row, column))?;
            Some(Assignment::new(name, total, column))
        })
        .collect()
}

/// Strip everything but digits and dots, then parse (`"100分"` → 100).
pub fn clean_total_marks(raw: &str) -> Option<f64> {
    let cleaned = NON_NUMERIC.replace_all(raw, "");
    parse_number(&cleaned).filter(|total| *total > 0.0)
}

/// Whether a row is a student row (named, not a `---` separator).
pub fn is_student_row(row: &[String]) -> bool {
    let first = row.first().map(|c| c.trim()).unwrap_or("");
    !first.is_empty() && !first.starts_with(STUDENT_SEPARATOR_PREFIX)
}

/// Student rows of the table, in input order.
pub fn student_rows<'a>(
    table: &'a RawTable,
    layout: &SheetLayout,
) -> impl Iterator<Item = &'a [String]> + 'a {
    table
        .rows()
        .iter()
        .skip(layout.first_student_row())
        .map(Vec::as_slice)
        .filter(|row| is_student_row(row))
}
