use serde::Serialize;

use crate::model::{CategoryRecord, Track};
use crate::structure::CourseStructure;

/// Running totals for one grading track.
///
/// `total_weight` is the weight graded so far: ungraded categories are
/// excluded from both the numerator and the weight, so `student_total` is an
/// "as graded so far" figure, not a share of all possible weight. Totals are
/// deliberately not clamped to 100: a track exceeding it signals misreported
/// upstream weights and should stay visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackTotal {
    pub student_total: f64,
    pub class_total: f64,
    pub delta: f64,
    pub total_weight: f64,
}

/// The engine's sole output artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub overall: TrackTotal,
    pub lecture: TrackTotal,
    pub lab: TrackTotal,
    pub structure: CourseStructure,
    /// Non-fatal anomalies, e.g. a structurally expected track with no
    /// graded categories. A partially graded course is the normal case.
    pub warnings: Vec<String>,
}

fn track_total(records: &[CategoryRecord], track: Track) -> TrackTotal {
    let mut student_total = 0.0;
    let mut class_total = 0.0;
    let mut total_weight = 0.0;

    for rec in records.iter().filter(|r| r.track == track) {
        if !rec.has_data() {
            continue;
        }
        student_total += rec.contribution();
        total_weight += rec.weight;
        // A category can have a student score before the cohort average is
        // published; it then counts toward the student side only.
        if let Some(class_pct) = rec.class_average_percent {
            class_total += (class_pct / 100.0) * rec.weight;
        }
    }

    TrackTotal {
        student_total,
        class_total,
        delta: student_total - class_total,
        total_weight,
    }
}

/// Combine validated records and a resolved structure into course totals.
///
/// Pure and re-entrant: every call receives its complete input and the new
/// record set is authoritative, never merged with prior results. Identical
/// inputs yield bit-identical output.
pub fn aggregate(records: &[CategoryRecord], structure: &CourseStructure) -> Totals {
    let lecture = track_total(records, Track::Lecture);
    let lab = track_total(records, Track::Lab);

    let lecture_share = structure.lecture_weight_pct / 100.0;
    let lab_share = structure.lab_weight_pct / 100.0;

    let overall_student = lecture.student_total * lecture_share + lab.student_total * lab_share;
    let overall_class = lecture.class_total * lecture_share + lab.class_total * lab_share;
    let overall = TrackTotal {
        student_total: overall_student,
        class_total: overall_class,
        delta: overall_student - overall_class,
        total_weight: lecture.total_weight * lecture_share + lab.total_weight * lab_share,
    };

    let mut warnings = Vec::new();
    if structure.has_lecture && lecture.total_weight == 0.0 {
        warnings.push("lecture track has no graded categories".to_string());
    }
    if structure.has_lab && lab.total_weight == 0.0 {
        warnings.push("lab track has no graded categories".to_string());
    }

    Totals {
        overall,
        lecture,
        lab,
        structure: *structure,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{build_category, SubItem};
    use crate::structure::{resolve_structure, TrackSignals};

    fn cat(name: &str, weight: f64, top: f64, track: Track) -> CategoryRecord {
        build_category(name, weight, top, &[], track).expect("valid category")
    }

    fn both_tracks() -> TrackSignals {
        TrackSignals {
            has_lecture: true,
            has_lab: true,
        }
    }

    fn lecture_only() -> TrackSignals {
        TrackSignals {
            has_lecture: true,
            has_lab: false,
        }
    }

    #[test]
    fn end_to_end_credit_split_scenario() {
        let records = vec![
            cat("Midterm", 20.0, 80.0, Track::Lecture),
            cat("Lab Reports", 10.0, 90.0, Track::Lab),
        ];
        let structure = resolve_structure(both_tracks(), Some(4.0));
        let totals = aggregate(&records, &structure);

        assert_eq!(totals.lecture.student_total, 16.0);
        assert_eq!(totals.lab.student_total, 9.0);
        // 16 * 0.75 + 9 * 0.25
        assert!((totals.overall.student_total - 14.25).abs() < 1e-9);
    }

    #[test]
    fn ungraded_categories_are_excluded_from_weight_and_total() {
        let records = vec![
            cat("Quiz 1", 10.0, 70.0, Track::Lecture),
            cat("Final Exam", 40.0, 0.0, Track::Lecture),
        ];
        let totals = aggregate(&records, &resolve_structure(lecture_only(), None));

        assert_eq!(totals.lecture.total_weight, 10.0);
        assert_eq!(totals.lecture.student_total, 7.0);
    }

    #[test]
    fn class_total_only_counts_published_averages() {
        let with_avg = build_category(
            "Quizzes",
            20.0,
            0.0,
            &[SubItem {
                max_mark: 10.0,
                student_mark: 9.0,
                class_average_mark: 7.0,
            }],
            Track::Lecture,
        )
        .expect("valid");
        let without_avg = cat("Midterm", 30.0, 60.0, Track::Lecture);

        let totals = aggregate(
            &[with_avg, without_avg],
            &resolve_structure(lecture_only(), None),
        );

        // Student side counts both categories; class side only the one with
        // a published average.
        assert!((totals.lecture.student_total - 36.0).abs() < 1e-9);
        assert!((totals.lecture.class_total - 14.0).abs() < 1e-9);
        assert!((totals.lecture.delta - 22.0).abs() < 1e-9);
    }

    #[test]
    fn overall_is_the_structure_weighted_combination() {
        let records = vec![
            cat("Theory", 50.0, 80.0, Track::Lecture),
            cat("Practical", 50.0, 60.0, Track::Lab),
        ];
        for hours in [None, Some(3.0), Some(4.0), Some(5.0)] {
            let structure = resolve_structure(both_tracks(), hours);
            let totals = aggregate(&records, &structure);
            let expected = totals.lecture.student_total * structure.lecture_weight_pct / 100.0
                + totals.lab.student_total * (100.0 - structure.lecture_weight_pct) / 100.0;
            assert!((totals.overall.student_total - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn aggregation_is_idempotent() {
        let records = vec![
            cat("Quiz 1", 10.0, 85.0, Track::Lecture),
            cat("Lab 1", 5.0, 95.0, Track::Lab),
        ];
        let structure = resolve_structure(both_tracks(), None);
        let first = aggregate(&records, &structure);
        let second = aggregate(&records, &structure);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_record_set_is_zero_totals_zero_graded() {
        let totals = aggregate(&[], &resolve_structure(lecture_only(), None));
        assert_eq!(totals.overall.student_total, 0.0);
        assert_eq!(totals.lecture.total_weight, 0.0);
        assert_eq!(totals.lab, TrackTotal::default());
    }

    #[test]
    fn expected_track_with_no_graded_data_is_warned_not_fatal() {
        let records = vec![cat("Quiz 1", 10.0, 70.0, Track::Lecture)];
        let structure = resolve_structure(both_tracks(), Some(4.0));
        let totals = aggregate(&records, &structure);

        assert_eq!(totals.lab.total_weight, 0.0);
        assert!(totals
            .warnings
            .iter()
            .any(|w| w.contains("lab track has no graded categories")));
    }

    #[test]
    fn changed_record_set_replaces_rather_than_merges() {
        let structure = resolve_structure(lecture_only(), None);
        let first = aggregate(&[cat("Quiz 1", 10.0, 70.0, Track::Lecture)], &structure);
        assert_eq!(first.lecture.total_weight, 10.0);

        // A later pass with different visible categories stands alone.
        let second = aggregate(&[cat("Midterm", 25.0, 60.0, Track::Lecture)], &structure);
        assert_eq!(second.lecture.total_weight, 25.0);
        assert_eq!(second.lecture.student_total, 15.0);
    }

    #[test]
    fn misreported_weights_are_not_clamped() {
        let records = vec![
            cat("Part A", 80.0, 100.0, Track::Lecture),
            cat("Part B", 80.0, 100.0, Track::Lecture),
        ];
        let totals = aggregate(&records, &resolve_structure(lecture_only(), None));
        // Surfaces the upstream data error instead of hiding it.
        assert!(totals.lecture.student_total > 100.0);
    }
}
