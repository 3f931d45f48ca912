//! Status discovery for the mapping editor.
//!
//! Collects the free-text tokens used in assignment columns so the caller
//! can offer them for mapping. Discovery never touches the mapping itself;
//! [`propose_additions`] returns the entries to merge.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{BLANK_MARKER, DISCOVERED_DEFAULT_PERCENTAGE};
use crate::models::{is_standard_grade, parse_number, GradeMapping};
use crate::parser::{parse_table, RawTable};

use super::layout::{detect_layout, student_rows};

/// Distinct uppercase status tokens found in the assignment columns of `content`.
///
/// Numbers, standard letter grades, blanks and header echoes are excluded.
pub fn discover_statuses(content: &str) -> BTreeSet<String> {
    discover_in_table(&parse_table(content))
}

/// Same as [`discover_statuses`] for an already parsed table.
pub fn discover_in_table(table: &RawTable) -> BTreeSet<String> {
    let layout = detect_layout(table);
    let mut tokens = BTreeSet::new();

    for row in student_rows(table, &layout) {
        for assignment in &layout.assignments {
            let cell = row
                .get(assignment.source_column)
                .map(|c| c.trim())
                .unwrap_or("");
            if cell.is_empty()
                || cell == BLANK_MARKER
                || cell == assignment.name.trim()
                || parse_number(cell).is_some()
                || is_standard_grade(cell)
            {
                continue;
            }
            tokens.insert(cell.to_uppercase());
        }
    }

    tokens
}

/// Entries to add for tokens the mapping does not know yet.
///
/// Every proposal carries the default percentage `"0"`; existing keys are
/// never proposed.
pub fn propose_additions<'a, I>(tokens: I, mapping: &GradeMapping) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = &'a String>,
{
    tokens
        .into_iter()
        .filter(|token| !mapping.contains_key(token))
        .map(|token| (token.clone(), DISCOVERED_DEFAULT_PERCENTAGE.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
班级成绩导出,,,
学生姓名,作业1,测验,备注
满分,10,100,
类别,作业,测验,
张三,已提交,85,late
李四,需订正,A,
王五,excused,-,
赵六,作业1,b,
";

    #[test]
    fn test_discovers_free_text_only() {
        let tokens = discover_statuses(EXPORT);
        let expected: BTreeSet<String> = ["已提交", "需订正", "EXCUSED"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_non_assignment_columns_ignored() {
        // "late" sits in the remarks column, which has no max marks.
        let tokens = discover_statuses(EXPORT);
        assert!(!tokens.contains("LATE"));
    }

    #[test]
    fn test_proposals_skip_existing_keys() {
        let tokens = discover_statuses(EXPORT);
        let mapping: GradeMapping = [("需订正", "50")].into_iter().collect();

        let proposals = propose_additions(&tokens, &mapping);
        assert_eq!(proposals.len(), 2);
        assert_eq!(proposals.get("已提交").map(String::as_str), Some("0"));
        assert!(!proposals.contains_key("需订正"));
    }

    #[test]
    fn test_second_pass_proposes_nothing() {
        let mut mapping = GradeMapping::new();

        let first = propose_additions(&discover_statuses(EXPORT), &mapping);
        assert_eq!(mapping.merge_proposals(first), 3);

        let second = propose_additions(&discover_statuses(EXPORT), &mapping);
        assert!(second.is_empty());
    }

    #[test]
    fn test_columns_past_first_row_ignored() {
        let content = "\
成绩导出
学生姓名,作业1
满分,10
类别,作业
张三,excused
";
        assert!(discover_statuses(content).is_empty());
    }

    #[test]
    fn test_empty_content() {
        assert!(discover_statuses("").is_empty());
    }
}
