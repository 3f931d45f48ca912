//! Output serialization.
//!
//! Writes [`TargetRecord`]s as delimited text for the destination
//! gradebook's importer, or as JSON for tooling.
//!
//! # Text layout
//!
//! ```text
//! Student Name,Assignment Name,Assignment Date,Category,Marks,Total Marks Possible
//! "张三","Quiz 1",09/03/2026,"Coursework","80.0","100.0"
//! "王五","Quiz 1",09/03/2026,"Coursework",,"100.0"
//! ```
//!
//! The date stays unquoted so spreadsheet applications read it as a date.

use crate::config::OUTPUT_HEADERS;
use crate::models::TargetRecord;

/// Quote a field, doubling embedded quotes.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Serialize one record as a line (without terminator).
pub fn record_line(record: &TargetRecord) -> String {
    let marks = if record.marks.is_empty() {
        String::new()
    } else {
        quote(&record.marks)
    };

    [
        quote(&record.student_name),
        quote(&record.assignment_name),
        record.date_label(),
        quote(&record.category),
        marks,
        quote(&record.total_marks_possible),
    ]
    .join(",")
}

/// Serialize records with the fixed header row, one line per record.
pub fn records_to_csv(records: &[TargetRecord]) -> String {
    let mut out = OUTPUT_HEADERS.join(",");
    out.push('\n');
    for record in records {
        out.push_str(&record_line(record));
        out.push('\n');
    }
    out
}

/// Serialize records as a pretty JSON array.
pub fn records_to_json(records: &[TargetRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_table;
    use chrono::NaiveDate;

    fn record(student: &str, marks: &str) -> TargetRecord {
        TargetRecord {
            student_name: student.to_string(),
            assignment_name: "Quiz 1".to_string(),
            assignment_date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            category: "Coursework".to_string(),
            marks: marks.to_string(),
            total_marks_possible: "100.0".to_string(),
        }
    }

    #[test]
    fn test_header_and_row_count() {
        let csv = records_to_csv(&[record("Li", "80.0"), record("Wang", "")]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Student Name,Assignment Name,Assignment Date,Category,Marks,Total Marks Possible"
        );
    }

    #[test]
    fn test_date_unquoted_and_empty_mark() {
        let line = record_line(&record("Wang", ""));
        assert_eq!(line, r#""Wang","Quiz 1",09/03/2026,"Coursework",,"100.0""#);
    }

    #[test]
    fn test_quotes_doubled() {
        let line = record_line(&record(r#"Li "Leo" Wei"#, "80.0"));
        assert!(line.starts_with(r#""Li ""Leo"" Wei","#));
    }

    #[test]
    fn test_comma_in_name_reparses() {
        let csv = records_to_csv(&[record("Li, Wei", "80.0")]);
        let table = parse_table(&csv);

        assert_eq!(table.cell(1, 0), "Li, Wei");
        assert_eq!(table.cell(1, 2), "09/03/2026");
        assert_eq!(table.cell(1, 4), "80.0");
    }

    #[test]
    fn test_standard_csv_reader_accepts_output() {
        let csv = records_to_csv(&[record("Li, Wei", "80.0"), record(r#"Wang "W""#, "")]);
        let mut reader = csv::Reader::from_reader(csv.as_bytes());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "Li, Wei");
        assert_eq!(&rows[1][0], r#"Wang "W""#);
        assert_eq!(&rows[1][4], "");
        assert_eq!(reader.headers().unwrap().len(), 6);
    }

    #[test]
    fn test_json_export() {
        let json = records_to_json(&[record("Li", "80.0")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["assignmentDate"], "09/03/2026");
        assert_eq!(value[0]["marks"], "80.0");
    }
}
