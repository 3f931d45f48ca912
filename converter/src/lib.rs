//! # classin-convert - ClassIn gradebook export normalization
//!
//! Converts a ClassIn gradebook export (a loosely structured CSV with title
//! rows, a max-marks row and a category row above the students) into flat
//! per-student, per-assignment records ready for gradebook import.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ Export text │────▶│   Parser    │────▶│  Transform   │────▶│  Records /  │
//! │ (UTF-8/GBK) │     │ (tolerant)  │     │ (classify +  │     │  CSV text   │
//! └─────────────┘     └─────────────┘     │  resolve)    │     └─────────────┘
//!                                         └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use classin_convert::{convert, records_to_csv, ConvertOptions, GradeMapping};
//!
//! let content = std::fs::read_to_string("gradebook.csv")?;
//! let options = ConvertOptions::from_start_str("2026-09-01")?;
//! let result = convert(&content, &GradeMapping::with_defaults(), &options);
//! std::fs::write("import.csv", records_to_csv(&result.records))?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types for caller-side failures
//! - [`config`] - Fixed markers, labels and defaults
//! - [`models`] - Domain models (Assignment, ColumnStat, GradeMapping, TargetRecord)
//! - [`parser`] - Tolerant CSV parsing with encoding detection
//! - [`transform`] - Layout, classification, resolution, dates, pipeline
//! - [`export`] - Text and JSON output
//! - [`logs`] - Conversion log entries

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Output
pub mod export;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConvertError, ConvertResult, DateError, MappingError, MappingResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    format_mark,
    is_standard_grade,
    parse_number,
    Assignment,
    ColumnKind,
    ColumnStat,
    GradeMapping,
    TargetRecord,
    STANDARD_GRADES,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_encoding,
    parse_bytes_auto,
    parse_file_auto,
    parse_line,
    parse_table,
    ParseResult,
    RawTable,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    classify_columns,
    detect_layout,
    discover_statuses,
    propose_additions,
    resolve_mark,
    DateWindow,
    SheetLayout,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    convert,
    convert_bytes,
    convert_table,
    convert_with_rng,
    ConversionResult,
    ConvertOptions,
};

// =============================================================================
// Re-exports - Export
// =============================================================================

pub use export::{record_line, records_to_csv, records_to_json};

pub use logs::{ConversionLog, LogEntry, LogLevel};
