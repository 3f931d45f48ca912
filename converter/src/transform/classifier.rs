//! Column classification.
//!
//! Each assignment column is scanned across every student before any mark
//! is resolved, because "submitted" means different things depending on
//! the column as a whole:
//!
//! - [`ColumnKind::Mixed`] - some student has a number or a letter grade;
//!   a bare "submitted" is imputed as the column average.
//! - [`ColumnKind::PureStatus`] - statuses only; "submitted" earns full marks.

use crate::config::BLANK_MARKER;
use crate::models::{
    is_standard_grade, parse_number, Assignment, ColumnKind, ColumnStat, GradeMapping,
};
use crate::parser::RawTable;

use super::layout::{student_rows, SheetLayout};

/// Running evidence for one column.
#[derive(Debug, Default)]
struct ColumnScan {
    seen_numeric: bool,
    seen_grade: bool,
    scores: Vec<f64>,
}

impl ColumnScan {
    fn observe(&mut self, cell: &str, assignment: &Assignment, mapping: &GradeMapping) {
        if let Some(score) = parse_number(cell) {
            self.seen_numeric = true;
            self.scores.push(score);
            return;
        }

        // Letter grades count as evidence even when the mapping lacks them;
        // free-text statuses only contribute a score.
        if is_standard_grade(cell) {
            self.seen_grade = true;
        }
        if let Some(pct) = mapping.percentage(cell) {
            self.scores.push(assignment.marks_for_percentage(pct));
        }
    }

    fn finish(self) -> ColumnStat {
        let kind = if self.seen_numeric || self.seen_grade {
            ColumnKind::Mixed
        } else {
            ColumnKind::PureStatus
        };
        let average = if self.scores.is_empty() {
            0.0
        } else {
            self.scores.iter().sum::<f64>() / self.scores.len() as f64
        };
        ColumnStat::new(kind, average)
    }
}

/// Cells that carry no evidence at all.
fn is_ignored(cell: &str, assignment: &Assignment) -> bool {
    cell.is_empty() || cell == BLANK_MARKER || cell == assignment.name.trim()
}

/// Classify one assignment column.
pub fn classify_column(
    table: &RawTable,
    layout: &SheetLayout,
    assignment: &Assignment,
    mapping: &GradeMapping,
) -> ColumnStat {
    let mut scan = ColumnScan::default();

    for row in student_rows(table, layout) {
        let cell = row
            .get(assignment.source_column)
            .map(|c| c.trim())
            .unwrap_or("");
        if is_ignored(cell, assignment) {
            continue;
        }
        scan.observe(cell, assignment, mapping);
    }

    scan.finish()
}

/// Classify every assignment of the layout.
///
/// The result is index-aligned with `layout.assignments`, so assignments
/// that share a header name keep separate statistics.
pub fn classify_columns(
    table: &RawTable,
    layout: &SheetLayout,
    mapping: &GradeMapping,
) -> Vec<ColumnStat> {
    layout
        .assignments
        .iter()
        .map(|assignment| classify_column(table, layout, assignment, mapping))
        .collect()
}
