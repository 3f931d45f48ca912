//! High-level conversion API.
//!
//! Combines every stage: parsing, header and assignment detection, column
//! classification, mark resolution and date synthesis.
//!
//! # Example
//!
//! ```rust,ignore
//! use classin_convert::{convert, ConvertOptions, GradeMapping};
//!
//! let content = std::fs::read_to_string("gradebook.csv")?;
//! let options = ConvertOptions::from_start_str("2026-09-01")?;
//! let result = convert(&content, &GradeMapping::with_defaults(), &options);
//!
//! println!("{} records", result.records.len());
//! ```

use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::{BLANK_MARKER, DEFAULT_CATEGORY};
use crate::error::{ConvertError, ConvertResult, DateError};
use crate::logs::ConversionLog;
use crate::models::{Assignment, ColumnStat, GradeMapping, TargetRecord};
use crate::parser::{parse_bytes_auto, parse_table, RawTable};

use super::classifier::classify_columns;
use super::dates::{parse_start_date, DateWindow};
use super::layout::{detect_layout, student_rows};
use super::resolver::resolve_mark;

/// Options for one conversion run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConvertOptions {
    /// First day assignments may be dated on.
    pub start_date: NaiveDate,

    /// Last day assignments may be dated on (local date when unset).
    pub today: Option<NaiveDate>,

    /// Seed for the date draw; unset means a fresh random draw per run.
    pub seed: Option<u64>,

    /// Category written on every record.
    pub category: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            start_date: Local::now().date_naive(),
            today: None,
            seed: None,
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

impl ConvertOptions {
    /// Options with a `yyyy-mm-dd` start date.
    pub fn from_start_str(start: &str) -> Result<Self, DateError> {
        Ok(Self {
            start_date: parse_start_date(start)?,
            ..Self::default()
        })
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn effective_today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Result of a conversion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    /// Normalized records, student-major in input order.
    pub records: Vec<TargetRecord>,

    /// Detected assignment columns.
    pub assignments: Vec<Assignment>,

    /// Column statistics, index-aligned with `assignments`.
    pub column_stats: Vec<ColumnStat>,

    /// Number of qualifying student rows.
    pub student_count: usize,

    /// Start date lies after today; every assignment got the start date.
    pub start_date_in_future: bool,

    /// Non-blank cells that resolved to no mark.
    pub unresolved_cells: usize,

    /// What happened, for display.
    pub log: ConversionLog,
}

impl ConversionResult {
    /// No records at all, which callers report as "no valid data found".
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Turn an empty result into [`ConvertError::NoValidData`].
    pub fn require_records(self) -> ConvertResult<Self> {
        if !self.is_empty() {
            return Ok(self);
        }
        let reason = if self.assignments.is_empty() {
            "no assignment columns with maximum marks were detected"
        } else {
            "no student rows were found below the header"
        };
        Err(ConvertError::NoValidData(reason.to_string()))
    }
}

/// Convert export text, drawing dates from the options' seed or `thread_rng`.
pub fn convert(
    content: &str,
    mapping: &GradeMapping,
    options: &ConvertOptions,
) -> ConversionResult {
    let table = parse_table(content);
    convert_table(&table, mapping, options)
}

/// Convert raw export bytes, detecting their encoding first.
pub fn convert_bytes(
    bytes: &[u8],
    mapping: &GradeMapping,
    options: &ConvertOptions,
) -> ConversionResult {
    let parsed = parse_bytes_auto(bytes);
    let mut result = convert_table(&parsed.table, mapping, options);
    result.log.info(format!("Decoded input as {}", parsed.encoding));
    result
}

/// Convert an already parsed table.
pub fn convert_table(
    table: &RawTable,
    mapping: &GradeMapping,
    options: &ConvertOptions,
) -> ConversionResult {
    match options.seed {
        Some(seed) => convert_with_rng(table, mapping, options, &mut StdRng::seed_from_u64(seed)),
        None => convert_with_rng(table, mapping, options, &mut rand::thread_rng()),
    }
}

/// Convert with an explicit random source for the date draw.
pub fn convert_with_rng<R: Rng + ?Sized>(
    table: &RawTable,
    mapping: &GradeMapping,
    options: &ConvertOptions,
    rng: &mut R,
) -> ConversionResult {
    let mut log = ConversionLog::new();
    log.info(format!("📖 Read {} rows × {} columns", table.len(), table.width()));

    // 1. Layout
    let layout = detect_layout(table);
    log.info(format!("Header row at line {}", layout.header_row + 1));
    if layout.has_assignments() {
        log.success(format!("Found {} assignment(s)", layout.assignments.len()));
        for a in &layout.assignments {
            log.info_indent(format!("{} (out of {})", a.name, a.total_marks_label()), 1);
        }
    } else {
        log.warning("No assignment columns found (missing max-marks row?)");
    }

    // 2. Classification
    let column_stats = classify_columns(table, &layout, mapping);
    for (a, stat) in layout.assignments.iter().zip(&column_stats) {
        let kind = if stat.is_pure_status() { "status only" } else { "graded" };
        log.info_indent(format!("{}: {}, average {:.1}", a.name, kind, stat.average_score), 1);
    }

    // 3. Dates
    let window = DateWindow::new(options.start_date, options.effective_today());
    if window.start_in_future() {
        log.warning(format!(
            "Start date {} is after today; using it for every assignment",
            options.start_date
        ));
    }
    let dates = window.assign(&layout.assignments, rng);

    // 4. Records
    let mut records = Vec::new();
    let mut student_count = 0;
    let mut unresolved_cells = 0;

    for row in student_rows(table, &layout) {
        student_count += 1;
        let student = row[0].trim();

        for ((assignment, stat), date) in layout.assignments.iter().zip(&column_stats).zip(&dates) {
            let raw = row
                .get(assignment.source_column)
                .map(|c| c.trim())
                .unwrap_or("");
            let marks = resolve_mark(raw, assignment, stat, mapping);
            if marks.is_empty() && !raw.is_empty() && raw != BLANK_MARKER {
                unresolved_cells += 1;
            }

            records.push(TargetRecord {
                student_name: student.to_string(),
                assignment_name: assignment.name.clone(),
                assignment_date: *date,
                category: options.category.clone(),
                marks,
                total_marks_possible: assignment.total_marks_label(),
            });
        }
    }

    if unresolved_cells > 0 {
        log.warning(format!(
            "{} cell(s) could not be resolved and were left blank (check the grade mapping)",
            unresolved_cells
        ));
    }
    if records.is_empty() {
        log.error("No valid data found");
    } else {
        log.success(format!(
            "Generated {} records for {} students",
            records.len(),
            student_count
        ));
    }

    ConversionResult {
        records,
        assignments: layout.assignments,
        column_stats,
        student_count,
        start_date_in_future: window.start_in_future(),
        unresolved_cells,
        log,
    }
}
