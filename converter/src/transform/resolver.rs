//! Mark resolution for a single student/assignment cell.
//!
//! Rules apply in strict order; the first that matches wins:
//!
//! 1. `"-"` → no mark
//! 2. Pure-status column: 已提交 → full marks, 未提交 → 0, 已补交 → 60%
//! 3. Mixed column: 未提交 → 0, 已提交 → column average
//! 4. A number → that number
//! 5. Mapping lookup of the uppercase token → percentage of total marks
//! 6. Anything else → no mark
//!
//! Letter grades get no special case here; their value always comes from
//! the mapping in step 5.

use crate::config::{BLANK_MARKER, LATE_SUBMISSION_RATIO};
use crate::models::{format_mark, parse_number, Assignment, ColumnKind, ColumnStat, GradeMapping};

/// Submitted, no grade given.
pub const STATUS_SUBMITTED: &str = "已提交";
/// Not submitted.
pub const STATUS_NOT_SUBMITTED: &str = "未提交";
/// Submitted late.
pub const STATUS_LATE_SUBMITTED: &str = "已补交";

/// Resolve a cell to a numeric score, `None` meaning "no mark recorded".
pub fn resolve_score(
    raw: &str,
    assignment: &Assignment,
    stat: &ColumnStat,
    mapping: &GradeMapping,
) -> Option<f64> {
    let raw = raw.trim();
    if raw == BLANK_MARKER {
        return None;
    }

    let status_score = match (stat.kind, raw) {
        (ColumnKind::PureStatus, STATUS_SUBMITTED) => Some(assignment.total_marks),
        (ColumnKind::PureStatus, STATUS_NOT_SUBMITTED) => Some(0.0),
        // Fixed ratio, the mapping's own entry for this status is not consulted.
        (ColumnKind::PureStatus, STATUS_LATE_SUBMITTED) => {
            Some(assignment.total_marks * LATE_SUBMISSION_RATIO)
        }
        (ColumnKind::Mixed, STATUS_NOT_SUBMITTED) => Some(0.0),
        (ColumnKind::Mixed, STATUS_SUBMITTED) => Some(stat.average_score),
        _ => None,
    };
    if status_score.is_some() {
        return status_score;
    }

    if let Some(score) = parse_number(raw) {
        return Some(score);
    }

    mapping
        .percentage(raw)
        .map(|pct| assignment.marks_for_percentage(pct))
}

/// Resolve a cell to the output mark string (`""` when unresolved).
pub fn resolve_mark(
    raw: &str,
    assignment: &Assignment,
    stat: &ColumnStat,
    mapping: &GradeMapping,
) -> String {
    resolve_score(raw, assignment, stat, mapping)
        .map(format_mark)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed(average: f64) -> ColumnStat {
        ColumnStat::new(ColumnKind::Mixed, average)
    }

    fn pure() -> ColumnStat {
        ColumnStat::new(ColumnKind::PureStatus, 0.0)
    }

    #[test]
    fn test_letter_grade_via_mapping() {
        let quiz = Assignment::new("Quiz", 100.0, 1);
        let mapping: GradeMapping = [("A", "90")].into_iter().collect();

        assert_eq!(resolve_mark("A", &quiz, &mixed(0.0), &mapping), "90.0");
        assert_eq!(resolve_mark("a", &quiz, &mixed(0.0), &mapping), "90.0");
    }

    #[test]
    fn test_mapped_mark_half_rounds_up() {
        let quiz = Assignment::new("Quiz", 85.0, 1);
        let mapping: GradeMapping = [("B", "85")].into_iter().collect();

        assert_eq!(resolve_mark("B", &quiz, &mixed(0.0), &mapping), "72.3");
    }

    #[test]
    fn test_pure_status_submitted_is_full_marks() {
        let essay = Assignment::new("Essay", 50.0, 2);
        assert_eq!(resolve_mark("已提交", &essay, &pure(), &GradeMapping::new()), "50.0");
    }

    #[test]
    fn test_pure_status_not_submitted_is_zero() {
        let essay = Assignment::new("Essay", 50.0, 2);
        assert_eq!(resolve_mark("未提交", &essay, &pure(), &GradeMapping::new()), "0.0");
    }

    #[test]
    fn test_pure_status_late_ignores_mapping() {
        let essay = Assignment::new("Essay", 50.0, 2);
        let mapping: GradeMapping = [("已补交", "100")].into_iter().collect();

        assert_eq!(resolve_mark("已补交", &essay, &pure(), &mapping), "30.0");
    }

    #[test]
    fn test_mixed_submitted_uses_average() {
        let quiz = Assignment::new("Quiz", 100.0, 1);
        assert_eq!(resolve_mark("已提交", &quiz, &mixed(72.3), &GradeMapping::new()), "72.3");
    }

    #[test]
    fn test_mixed_not_submitted_is_zero() {
        let quiz = Assignment::new("Quiz", 100.0, 1);
        let mapping: GradeMapping = [("未提交", "50")].into_iter().collect();
        assert_eq!(resolve_mark("未提交", &quiz, &mixed(72.3), &mapping), "0.0");
    }

    #[test]
    fn test_mixed_late_falls_through_to_mapping() {
        let quiz = Assignment::new("Quiz", 20.0, 1);
        let mapping: GradeMapping = [("已补交", "75")].into_iter().collect();

        assert_eq!(resolve_mark("已补交", &quiz, &mixed(10.0), &mapping), "15.0");
        assert_eq!(resolve_mark("已补交", &quiz, &mixed(10.0), &GradeMapping::new()), "");
    }

    #[test]
    fn test_blank_marker_always_empty() {
        let quiz = Assignment::new("Quiz", 100.0, 1);
        let mapping: GradeMapping = [("-", "100")].into_iter().collect();

        assert_eq!(resolve_mark("-", &quiz, &mixed(50.0), &mapping), "");
        assert_eq!(resolve_mark("-", &quiz, &pure(), &mapping), "");
    }

    #[test]
    fn test_numeric_literal() {
        let quiz = Assignment::new("Quiz", 100.0, 1);
        assert_eq!(resolve_mark("87", &quiz, &mixed(0.0), &GradeMapping::new()), "87.0");
        assert_eq!(resolve_mark("66.66", &quiz, &pure(), &GradeMapping::new()), "66.7");
    }

    #[test]
    fn test_unknown_or_non_numeric_mapping_is_empty() {
        let quiz = Assignment::new("Quiz", 100.0, 1);
        let mapping: GradeMapping = [("需订正", "tbd")].into_iter().collect();

        assert_eq!(resolve_mark("需订正", &quiz, &pure(), &mapping), "");
        assert_eq!(resolve_mark("缺考", &quiz, &pure(), &mapping), "");
    }

    #[test]
    fn test_empty_cell_is_empty_mark() {
        let quiz = Assignment::new("Quiz", 100.0, 1);
        assert_eq!(resolve_mark("", &quiz, &mixed(40.0), &GradeMapping::new()), "");
    }
}
