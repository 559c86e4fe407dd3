use serde_json::json;

use crate::attendance::project_attendance;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};

fn get_count(params: &serde_json::Value, key: &str) -> Result<u32, String> {
    let v = params
        .get(key)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| format!("missing or non-integer {}", key))?;
    u32::try_from(v).map_err(|_| format!("{} out of range", key))
}

fn handle_projection(req: &Request) -> serde_json::Value {
    let conducted = match get_count(&req.params, "conducted") {
        Ok(v) => v,
        Err(m) => return err(&req.id, "bad_params", m, None),
    };
    let attended = match get_count(&req.params, "attended") {
        Ok(v) => v,
        Err(m) => return err(&req.id, "bad_params", m, None),
    };
    let required_percent = req.params.get("requiredPercent").and_then(|v| v.as_f64());

    let projection = project_attendance(conducted, attended, required_percent);
    ok(&req.id, json!(projection))
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.projection" => Some(handle_projection(req)),
        _ => None,
    }
}
