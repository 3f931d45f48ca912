//! Error types for the conversion tool.
//!
//! The transformation core never fails on malformed exports: bad cells,
//! missing rows and unknown statuses all degrade to empty results. The
//! errors here cover what the *caller* can get wrong:
//!
//! - [`DateError`] - Unparsable start date
//! - [`MappingError`] - Grade mapping file problems
//! - [`ConvertError`] - Top-level errors for the CLI and embedding apps
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Date Errors
// =============================================================================

/// Errors while reading a start date.
#[derive(Debug, Error, PartialEq)]
pub enum DateError {
    /// Not a `yyyy-mm-dd` calendar date.
    #[error("Invalid start date '{0}', expected yyyy-mm-dd")]
    InvalidFormat(String),
}

// =============================================================================
// Mapping Errors
// =============================================================================

/// Errors from loading or saving a grade mapping.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Failed to read or write the mapping file.
    #[error("Mapping IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The mapping is not a JSON object of strings.
    #[error("Mapping JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A percentage that does not parse as a number.
    #[error("Percentage for '{token}' is not a number: '{value}'")]
    InvalidPercentage { token: String, value: String },
}

// =============================================================================
// Conversion Errors (top-level)
// =============================================================================

/// Top-level conversion errors.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Start date error.
    #[error("Date error: {0}")]
    Date(#[from] DateError),

    /// Grade mapping error.
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Reading the export or writing the output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The export produced no student/assignment records.
    #[error("No valid data found: {0}")]
    NoValidData(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for mapping operations.
pub type MappingResult<T> = Result<T, MappingError>;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let date_err = DateError::InvalidFormat("18/10/2026".into());
        let convert_err: ConvertError = date_err.into();
        assert!(convert_err.to_string().contains("18/10/2026"));

        let mapping_err = MappingError::InvalidPercentage {
            token: "需订正".into(),
            value: "abc".into(),
        };
        let convert_err: ConvertError = mapping_err.into();
        assert!(convert_err.to_string().contains("需订正"));
    }

    #[test]
    fn test_no_valid_data_format() {
        let err = ConvertError::NoValidData("no assignment columns".into());
        let msg = err.to_string();
        assert!(msg.contains("No valid data"));
        assert!(msg.contains("no assignment columns"));
    }
}
