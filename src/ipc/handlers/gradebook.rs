use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::calc::aggregate;
use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::model::{build_category, CategoryRecord, RecordIssue, SubItem, Track};
use crate::structure::{resolve_structure, TrackSignals};

/// One raw category as the page extractor hands it over. Numbers arrive
/// zero-filled where the page showed nothing; the model layer turns that
/// into explicit absence.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryParams {
    #[serde(alias = "trackId")]
    track: Track,
    name: String,
    #[serde(default)]
    weight: f64,
    #[serde(default)]
    top_percentage: f64,
    #[serde(default)]
    sub_items: Vec<SubItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalsParams {
    #[serde(default)]
    course_id: Option<String>,
    #[serde(default)]
    credit_hours: Option<f64>,
    #[serde(default)]
    track_signals: TrackSignals,
    #[serde(default)]
    categories: Vec<CategoryParams>,
}

/// Per-category figures for inline display next to the page's own rows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryMetrics {
    name: String,
    track: Track,
    weight: f64,
    student_percent: Option<f64>,
    class_average_percent: Option<f64>,
    contribution: f64,
    delta: Option<f64>,
    has_data: bool,
}

impl CategoryMetrics {
    fn from_record(rec: &CategoryRecord) -> Self {
        Self {
            name: rec.name.clone(),
            track: rec.track,
            weight: rec.weight,
            student_percent: rec.student_percent,
            class_average_percent: rec.class_average_percent,
            contribution: rec.contribution(),
            delta: rec.delta(),
            has_data: rec.has_data(),
        }
    }
}

/// Credit-hour resolution priority: explicit request value, then the
/// workspace cache, then unknown. The cache is best effort; a lookup failure
/// degrades to the structure fallback, never to an error response.
fn resolve_credit_hours(state: &AppState, params: &TotalsParams) -> Option<f64> {
    if let Some(hours) = params.credit_hours.filter(|h| h.is_finite() && *h > 0.0) {
        return Some(hours);
    }
    let course_id = params.course_id.as_deref()?;
    let conn = state.db.as_ref()?;
    match db::get_credit_hours(conn, course_id) {
        Ok(hours) => hours,
        Err(e) => {
            warn!("credit hours lookup failed for course {}: {}", course_id, e);
            None
        }
    }
}

fn handle_totals(state: &mut AppState, req: &Request) -> serde_json::Value {
    let params: TotalsParams = match serde_json::from_value(req.params.clone()) {
        Ok(p) => p,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };

    let mut records: Vec<CategoryRecord> = Vec::with_capacity(params.categories.len());
    let mut rejected: Vec<RecordIssue> = Vec::new();
    for c in &params.categories {
        match build_category(&c.name, c.weight, c.top_percentage, &c.sub_items, c.track) {
            Ok(rec) => records.push(rec),
            Err(issue) => {
                warn!("rejected category '{}': {}", issue.name, issue.reason);
                rejected.push(issue);
            }
        }
    }

    let credit_hours = resolve_credit_hours(state, &params);
    let structure = resolve_structure(params.track_signals, credit_hours);
    let totals = aggregate(&records, &structure);

    let per_category: Vec<CategoryMetrics> =
        records.iter().map(CategoryMetrics::from_record).collect();

    ok(
        &req.id,
        json!({
            "totals": totals,
            "perCategory": per_category,
            "rejected": rejected,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "gradebook.totals" => Some(handle_totals(state, req)),
        _ => None,
    }
}
