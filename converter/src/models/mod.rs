//! Domain models for the gradebook conversion.
//!
//! This module contains the data structures shared by every pipeline stage:
//!
//! - [`Assignment`] - A detected assignment column with its maximum marks
//! - [`ColumnKind`] / [`ColumnStat`] - Per-column classification
//! - [`GradeMapping`] - Caller-owned status token to percentage table
//! - [`TargetRecord`] - One normalized output row
//!
//! Numeric fields are kept as numbers internally and rendered with one
//! decimal place only at the boundary ([`format_mark`]).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::{DEFAULT_GRADE_PERCENTAGES, OUTPUT_DATE_FORMAT};
use crate::error::{MappingError, MappingResult};

// =============================================================================
// Numeric helpers
// =============================================================================

/// Standard letter grades recognized in any column.
pub const STANDARD_GRADES: [&str; 9] = ["A*", "A", "B", "C", "D", "E", "F", "G", "U"];

/// Check whether a token (any case) is a standard letter grade.
pub fn is_standard_grade(token: &str) -> bool {
    let upper = token.trim().to_uppercase();
    STANDARD_GRADES.contains(&upper.as_str())
}

/// Parse a cell as a finite number.
///
/// `"inf"` and `"NaN"` are rejected even though `f64::from_str` accepts them.
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Render a mark with exactly one decimal place.
///
/// Exact halves round away from zero (`72.25` → `"72.3"`), as a spreadsheet
/// shows them; plain `{:.1}` would round them to even.
pub fn format_mark(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

// =============================================================================
// Assignment
// =============================================================================

/// A valid assignment column of the export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Header cell text.
    pub name: String,
    /// Maximum marks, always positive.
    pub total_marks: f64,
    /// Column index in the raw table.
    pub source_column: usize,
}

impl Assignment {
    pub fn new(name: impl Into<String>, total_marks: f64, source_column: usize) -> Self {
        Self {
            name: name.into(),
            total_marks,
            source_column,
        }
    }

    /// Total marks as written in the output (`"100.0"`).
    pub fn total_marks_label(&self) -> String {
        format_mark(self.total_marks)
    }

    /// Convert a percentage of this assignment's total into marks.
    pub fn marks_for_percentage(&self, percentage: f64) -> f64 {
        (percentage / 100.0) * self.total_marks
    }
}

// =============================================================================
// Column classification
// =============================================================================

/// How an assignment column behaves across all students.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ColumnKind {
    /// Only free-text statuses, no numeric or letter-grade evidence.
    PureStatus,
    /// At least one number or standard letter grade.
    Mixed,
}

/// Classification plus the representative score of a column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStat {
    pub kind: ColumnKind,
    /// Mean of every numeric-equivalent value seen, 0 when none.
    pub average_score: f64,
}

impl ColumnStat {
    pub fn new(kind: ColumnKind, average_score: f64) -> Self {
        Self {
            kind,
            average_score,
        }
    }

    pub fn is_pure_status(&self) -> bool {
        self.kind == ColumnKind::PureStatus
    }
}

// =============================================================================
// Grade Mapping
// =============================================================================

/// Status token to percentage table, edited by the user.
///
/// Keys are stored uppercase so lookups match `token.to_uppercase()`.
/// Values stay strings because the editor may hold anything; only values
/// that parse as numbers take part in resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct GradeMapping {
    entries: BTreeMap<String, String>,
}

impl GradeMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping pre-filled with the standard letter grade percentages.
    pub fn with_defaults() -> Self {
        DEFAULT_GRADE_PERCENTAGES
            .iter()
            .map(|(token, pct)| (token.to_string(), pct.to_string()))
            .collect()
    }

    /// Insert or replace an entry. The token is uppercased.
    pub fn insert(&mut self, token: impl AsRef<str>, percentage: impl Into<String>) {
        self.entries
            .insert(token.as_ref().trim().to_uppercase(), percentage.into());
    }

    /// Raw value for a token (any case).
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .get(&token.trim().to_uppercase())
            .map(String::as_str)
    }

    pub fn contains_key(&self, token: &str) -> bool {
        self.get(token).is_some()
    }

    /// Numeric percentage for a token, if present and parsable.
    pub fn percentage(&self, token: &str) -> Option<f64> {
        self.get(token).and_then(parse_number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge proposed entries without overwriting existing keys.
    ///
    /// Returns the number of entries actually added.
    pub fn merge_proposals<I, K, V>(&mut self, proposals: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut added = 0;
        for (token, pct) in proposals {
            let key = token.as_ref().trim().to_uppercase();
            if key.is_empty() || self.entries.contains_key(&key) {
                continue;
            }
            self.entries.insert(key, pct.into());
            added += 1;
        }
        added
    }

    /// Entries whose value is not a number.
    ///
    /// These never produce a mark; the editor should point them out.
    pub fn validate(&self) -> Vec<MappingError> {
        self.entries
            .iter()
            .filter(|(_, v)| parse_number(v).is_none())
            .map(|(k, v)| MappingError::InvalidPercentage {
                token: k.clone(),
                value: v.clone(),
            })
            .collect()
    }

    /// Parse a mapping from a JSON object.
    pub fn from_json(json: &str) -> MappingResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> MappingResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a mapping file.
    pub fn load(path: impl AsRef<Path>) -> MappingResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save the mapping as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> MappingResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for GradeMapping {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut mapping = GradeMapping::new();
        for (token, pct) in iter {
            mapping.insert(token, pct);
        }
        mapping
    }
}

impl From<BTreeMap<String, String>> for GradeMapping {
    fn from(raw: BTreeMap<String, String>) -> Self {
        raw.into_iter().collect()
    }
}

impl From<GradeMapping> for BTreeMap<String, String> {
    fn from(mapping: GradeMapping) -> Self {
        mapping.entries
    }
}

// =============================================================================
// Target Record
// =============================================================================

/// One normalized row for the destination gradebook.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetRecord {
    pub student_name: String,
    pub assignment_name: String,
    #[serde(serialize_with = "serialize_output_date")]
    pub assignment_date: NaiveDate,
    pub category: String,
    /// Empty when no mark could be resolved.
    pub marks: String,
    pub total_marks_possible: String,
}

impl TargetRecord {
    /// Assignment date as `dd/mm/yyyy`.
    pub fn date_label(&self) -> String {
        self.assignment_date.format(OUTPUT_DATE_FORMAT).to_string()
    }

    pub fn has_mark(&self) -> bool {
        !self.marks.is_empty()
    }
}

fn serialize_output_date<S: Serializer>(
    date: &NaiveDate,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.format(OUTPUT_DATE_FORMAT).to_string())
}
