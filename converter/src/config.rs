//! Conversion constants.
//!
//! Centralized values shared by the parser, the layout heuristics and the
//! emitter. None of these are meant to be user-tunable; the only runtime
//! settings are the start date and the grade mapping.

/// Number of leading rows searched for the header row.
pub const HEADER_SCAN_LIMIT: usize = 20;

/// Labels that identify the student-name header cell.
///
/// Matched by substring against the trimmed first cell.
pub const HEADER_MARKERS: [&str; 3] = ["学生姓名", "Student Name", "Name"];

/// Rows whose first cell starts with this are separators, not students.
pub const STUDENT_SEPARATOR_PREFIX: &str = "---";

/// Explicit "no data" marker in an export cell.
pub const BLANK_MARKER: &str = "-";

/// Category written on every output record.
pub const DEFAULT_CATEGORY: &str = "Coursework";

/// Share of total marks awarded for a late submission in a status-only column.
pub const LATE_SUBMISSION_RATIO: f64 = 0.6;

/// Header row of the emitted table.
pub const OUTPUT_HEADERS: [&str; 6] = [
    "Student Name",
    "Assignment Name",
    "Assignment Date",
    "Category",
    "Marks",
    "Total Marks Possible",
];

/// Output date format (dd/mm/yyyy).
pub const OUTPUT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Input start date format.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Percentage assigned to newly discovered status tokens.
pub const DISCOVERED_DEFAULT_PERCENTAGE: &str = "0";

/// Starting percentages for the standard letter grades.
pub const DEFAULT_GRADE_PERCENTAGES: [(&str, &str); 9] = [
    ("A*", "100"),
    ("A", "90"),
    ("B", "80"),
    ("C", "70"),
    ("D", "60"),
    ("E", "50"),
    ("F", "40"),
    ("G", "30"),
    ("U", "0"),
];

/// Environment variable naming the default mapping file for the CLI.
pub const MAPPING_ENV_VAR: &str = "CLASSIN_MAPPING";
