use serde::Serialize;

/// Portal-wide minimum attendance requirement.
pub const DEFAULT_REQUIRED_PERCENT: f64 = 75.0;

/// Width of the band under the requirement that still reads as a warning
/// rather than at-risk.
const WARNING_BAND: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AttendanceStatus {
    Safe,
    Warning,
    AtRisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceProjection {
    pub conducted: u32,
    pub attended: u32,
    pub absences: u32,
    pub attendance_percent: f64,
    pub required_percent: f64,
    /// Sessions that must be attended to meet the requirement, of those
    /// conducted so far.
    pub min_required: u32,
    pub max_absences: u32,
    /// Absences still affordable; 0 when the budget is already spent.
    pub remaining_absences: u32,
    pub status: AttendanceStatus,
}

/// Ceiling-based required-attendance arithmetic over conducted/attended
/// session counts. `attended` is capped at `conducted`; zero conducted
/// sessions project a 0% rate with an empty absence budget.
pub fn project_attendance(
    conducted: u32,
    attended: u32,
    required_percent: Option<f64>,
) -> AttendanceProjection {
    let required_percent = required_percent
        .filter(|p| p.is_finite() && (0.0..=100.0).contains(p))
        .unwrap_or(DEFAULT_REQUIRED_PERCENT);

    let attended = attended.min(conducted);
    let absences = conducted - attended;
    let attendance_percent = if conducted > 0 {
        (attended as f64 / conducted as f64) * 100.0
    } else {
        0.0
    };

    let min_required = (conducted as f64 * required_percent / 100.0).ceil() as u32;
    let max_absences = conducted - min_required.min(conducted);
    let remaining_absences = max_absences.saturating_sub(absences);

    let status = if attendance_percent >= required_percent {
        AttendanceStatus::Safe
    } else if attendance_percent >= required_percent - WARNING_BAND {
        AttendanceStatus::Warning
    } else {
        AttendanceStatus::AtRisk
    };

    AttendanceProjection {
        conducted,
        attended,
        absences,
        attendance_percent,
        required_percent,
        min_required,
        max_absences,
        remaining_absences,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_required_rounds_up() {
        // 75% of 30 is 22.5, so 23 sessions are required.
        let p = project_attendance(30, 26, None);
        assert_eq!(p.min_required, 23);
        assert_eq!(p.max_absences, 7);
        assert_eq!(p.remaining_absences, 3);
        assert_eq!(p.status, AttendanceStatus::Safe);
    }

    #[test]
    fn exhausted_absence_budget_leaves_zero_remaining() {
        let p = project_attendance(20, 12, None);
        assert_eq!(p.max_absences, 5);
        assert_eq!(p.absences, 8);
        assert_eq!(p.remaining_absences, 0);
        assert_eq!(p.status, AttendanceStatus::AtRisk);
    }

    #[test]
    fn warning_band_sits_just_under_the_requirement() {
        // 29/40 = 72.5%, inside the 70..75 band.
        let p = project_attendance(40, 29, None);
        assert_eq!(p.status, AttendanceStatus::Warning);
    }

    #[test]
    fn zero_conducted_sessions_is_a_valid_empty_projection() {
        let p = project_attendance(0, 0, None);
        assert_eq!(p.attendance_percent, 0.0);
        assert_eq!(p.min_required, 0);
        assert_eq!(p.remaining_absences, 0);
    }

    #[test]
    fn attended_is_capped_at_conducted() {
        let p = project_attendance(10, 14, None);
        assert_eq!(p.attended, 10);
        assert_eq!(p.attendance_percent, 100.0);
    }

    #[test]
    fn out_of_range_requirement_falls_back_to_default() {
        let p = project_attendance(20, 20, Some(140.0));
        assert_eq!(p.required_percent, DEFAULT_REQUIRED_PERCENT);

        let p = project_attendance(20, 16, Some(80.0));
        assert_eq!(p.required_percent, 80.0);
        assert_eq!(p.min_required, 16);
        assert_eq!(p.status, AttendanceStatus::Safe);
    }
}
