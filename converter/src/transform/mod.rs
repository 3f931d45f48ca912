//! Transformation module.
//!
//! This module turns a parsed export into normalized records:
//! - Layout: header row and assignment column detection
//! - Classifier: per-column status/graded classification
//! - Resolver: per-cell mark rules
//! - Dates: working-day assignment dates
//! - Discovery: unmapped status tokens for the mapping editor
//! - Pipeline: main conversion entry points

pub mod classifier;
pub mod dates;
pub mod discovery;
pub mod layout;
pub mod pipeline;
pub mod resolver;

pub use classifier::{classify_column, classify_columns};
pub use dates::{is_working_day, parse_start_date, DateWindow};
pub use discovery::{discover_in_table, discover_statuses, propose_additions};
pub use layout::{detect_layout, extract_assignments, locate_header_row, student_rows, SheetLayout};
pub use pipeline::*;
pub use resolver::{resolve_mark, resolve_score};
