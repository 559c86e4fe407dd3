use serde::{Deserialize, Serialize};

/// Lab components are worth one credit hour regardless of total course
/// credits (institutional policy).
const LAB_CREDIT_HOURS: f64 = 1.0;

/// Standard split when both tracks exist but credit hours are unknown.
/// Approximates the common 2-lecture + 1-lab credit pattern; a guess, not a
/// derived fact, so it lives here as a named constant.
pub const STANDARD_LECTURE_PCT: f64 = 66.67;
pub const STANDARD_LAB_PCT: f64 = 33.33;

/// Externally observed track evidence (category naming / tab structure).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSignals {
    #[serde(default)]
    pub has_lecture: bool,
    #[serde(default)]
    pub has_lab: bool,
}

/// Resolved course shape: which tracks exist and what share of the overall
/// grade each carries. Shares sum to 100 whenever both tracks exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStructure {
    pub has_lecture: bool,
    pub has_lab: bool,
    pub lecture_weight_pct: f64,
    pub lab_weight_pct: f64,
}

/// Rule 1: both tracks observed and usable credit hours known. Lab is fixed
/// at one credit; lecture takes the rest.
fn credit_hour_split(signals: TrackSignals, credit_hours: Option<f64>) -> Option<CourseStructure> {
    if !(signals.has_lecture && signals.has_lab) {
        return None;
    }
    // Credit hours below the fixed lab credit cannot split a grade; treat as
    // unknown.
    let hours = credit_hours.filter(|h| h.is_finite() && *h >= LAB_CREDIT_HOURS)?;
    let lab_pct = (LAB_CREDIT_HOURS / hours) * 100.0;
    Some(CourseStructure {
        has_lecture: true,
        has_lab: true,
        lecture_weight_pct: 100.0 - lab_pct,
        lab_weight_pct: lab_pct,
    })
}

/// Rule 2: both tracks observed, credit hours unknown. Standard split.
fn standard_split(signals: TrackSignals, _credit_hours: Option<f64>) -> Option<CourseStructure> {
    if !(signals.has_lecture && signals.has_lab) {
        return None;
    }
    Some(CourseStructure {
        has_lecture: true,
        has_lab: true,
        lecture_weight_pct: STANDARD_LECTURE_PCT,
        lab_weight_pct: STANDARD_LAB_PCT,
    })
}

/// Rule 3: a single observed track takes the whole grade. Courses with no
/// track evidence at all are treated as lecture-only.
fn single_track(signals: TrackSignals, _credit_hours: Option<f64>) -> Option<CourseStructure> {
    if signals.has_lab && !signals.has_lecture {
        return Some(CourseStructure {
            has_lecture: false,
            has_lab: true,
            lecture_weight_pct: 0.0,
            lab_weight_pct: 100.0,
        });
    }
    Some(CourseStructure {
        has_lecture: true,
        has_lab: false,
        lecture_weight_pct: 100.0,
        lab_weight_pct: 0.0,
    })
}

/// Resolve the course structure. Rules are evaluated top-down; the first that
/// applies wins, and the chain always terminates in a result. There is no
/// unresolvable state.
pub fn resolve_structure(signals: TrackSignals, credit_hours: Option<f64>) -> CourseStructure {
    const RULES: [fn(TrackSignals, Option<f64>) -> Option<CourseStructure>; 3] =
        [credit_hour_split, standard_split, single_track];

    for rule in RULES {
        if let Some(structure) = rule(signals, credit_hours) {
            return structure;
        }
    }
    unreachable!("single_track always resolves");
}
