use serde::{Deserialize, Serialize};

/// Which grading track a category belongs to. Lab-tracked courses carry both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Track {
    Lecture,
    Lab,
}

/// One graded instance under a category (e.g. a single quiz attempt).
///
/// The portal renders an all-zero row for sub-items whose marks have not been
/// entered yet; such rows are placeholders, not zero scores, and are skipped
/// before any averaging.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubItem {
    pub max_mark: f64,
    pub student_mark: f64,
    #[serde(default)]
    pub class_average_mark: f64,
}

impl SubItem {
    pub fn is_placeholder(&self) -> bool {
        self.max_mark == 0.0 && self.student_mark == 0.0 && self.class_average_mark == 0.0
    }
}

/// A category record that failed validation. The record is excluded from
/// totals; the pass as a whole continues.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordIssue {
    pub name: String,
    pub reason: String,
}

impl RecordIssue {
    fn new(name: &str, reason: impl Into<String>) -> Self {
        Self {
            name: name.trim().to_string(),
            reason: reason.into(),
        }
    }
}

/// One validated assessment category.
///
/// Percentages are `Option` rather than zero-as-missing: the page renders 0
/// both for "scored zero" and "no number yet", and the distinction is made
/// once, here, at the ingestion boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRecord {
    pub name: String,
    /// Percentage points this category contributes to its track. 0..=100.
    pub weight: f64,
    pub student_percent: Option<f64>,
    pub class_average_percent: Option<f64>,
    pub track: Track,
}

impl CategoryRecord {
    /// A category with neither a student signal nor a cohort signal is
    /// ungraded, not zero-scoring, and must be excluded from totals.
    pub fn has_data(&self) -> bool {
        self.student_percent.is_some() || self.class_average_percent.is_some()
    }

    /// Weighted share of the track total: `(student% / 100) * weight`.
    pub fn contribution(&self) -> f64 {
        match self.student_percent {
            Some(p) => (p / 100.0) * self.weight,
            None => 0.0,
        }
    }

    /// Student minus cohort, only when a cohort average is published.
    pub fn delta(&self) -> Option<f64> {
        match (self.student_percent, self.class_average_percent) {
            (Some(s), Some(c)) => Some(s - c),
            _ => None,
        }
    }
}

/// Treat a page-sourced percentage as a signal only when it is positive.
fn percent_signal(value: f64) -> Option<f64> {
    if value > 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Mark-weighted percentages derived from sub-items: `Σmark / Σmax * 100`
/// over non-placeholder rows with a positive max. Mark-scale data is exact
/// where the category row's percentage may be rounded or stale.
fn sub_item_percentages(sub_items: &[SubItem]) -> (Option<f64>, Option<f64>) {
    let mut max_sum = 0.0;
    let mut student_sum = 0.0;
    let mut class_sum = 0.0;

    for item in sub_items {
        if item.is_placeholder() || item.max_mark <= 0.0 {
            continue;
        }
        max_sum += item.max_mark;
        student_sum += item.student_mark;
        class_sum += item.class_average_mark;
    }

    if max_sum <= 0.0 {
        return (None, None);
    }
    (
        percent_signal((student_sum / max_sum) * 100.0),
        percent_signal((class_sum / max_sum) * 100.0),
    )
}

/// Normalize one raw category into a validated record.
///
/// Precedence: the top-level percentage wins when present and non-zero (it
/// may already encode adjustments such as bonus marks that sub-items do not
/// show); a sub-item-derived value fills in only when the top level gave no
/// number. The cohort average is only ever derivable from sub-items.
pub fn build_category(
    name: &str,
    weight: f64,
    top_percentage: f64,
    sub_items: &[SubItem],
    track: Track,
) -> Result<CategoryRecord, RecordIssue> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RecordIssue::new(name, "category name is empty"));
    }
    if !weight.is_finite() || weight < 0.0 || weight > 100.0 {
        return Err(RecordIssue::new(
            trimmed,
            format!("weight {} outside 0..=100", weight),
        ));
    }
    if !top_percentage.is_finite() || top_percentage < 0.0 {
        return Err(RecordIssue::new(
            trimmed,
            format!("negative percentage {}", top_percentage),
        ));
    }
    for item in sub_items {
        if item.max_mark < 0.0 || item.student_mark < 0.0 || item.class_average_mark < 0.0 {
            return Err(RecordIssue::new(trimmed, "negative sub-item mark"));
        }
    }

    let (derived_student, derived_class) = sub_item_percentages(sub_items);

    let student_percent = percent_signal(top_percentage).or(derived_student);

    Ok(CategoryRecord {
        name: trimmed.to_string(),
        weight,
        student_percent,
        class_average_percent: derived_class,
        track,
    })
}
