use serde_json::json;

use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};

struct HandlerErr {
    code: &'static str,
    message: String,
}

impl HandlerErr {
    fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, None)
    }
}

fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr {
            code: "bad_params",
            message: format!("missing {}", key),
        })
}

fn require_db<'a>(state: &'a AppState) -> Result<&'a rusqlite::Connection, HandlerErr> {
    state.db.as_ref().ok_or_else(|| HandlerErr {
        code: "no_workspace",
        message: "no workspace selected".to_string(),
    })
}

fn handle_put(state: &mut AppState, req: &Request) -> serde_json::Value {
    let inner = |state: &mut AppState| -> Result<serde_json::Value, HandlerErr> {
        let course_id = get_required_str(&req.params, "courseId")?;
        let hours = req
            .params
            .get("creditHours")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| HandlerErr {
                code: "bad_params",
                message: "missing creditHours".to_string(),
            })?;
        if !hours.is_finite() || hours <= 0.0 {
            return Err(HandlerErr {
                code: "bad_params",
                message: format!("creditHours must be positive, got {}", hours),
            });
        }
        let conn = require_db(state)?;
        db::put_credit_hours(conn, &course_id, hours).map_err(|e| HandlerErr {
            code: "db_query_failed",
            message: e.to_string(),
        })?;
        Ok(json!({ "courseId": course_id, "creditHours": hours }))
    };
    match inner(state) {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    }
}

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let inner = |state: &mut AppState| -> Result<serde_json::Value, HandlerErr> {
        let course_id = get_required_str(&req.params, "courseId")?;
        let conn = require_db(state)?;
        let hours = db::get_credit_hours(conn, &course_id).map_err(|e| HandlerErr {
            code: "db_query_failed",
            message: e.to_string(),
        })?;
        Ok(json!({ "courseId": course_id, "creditHours": hours }))
    };
    match inner(state) {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "credits.put" => Some(handle_put(state, req)),
        "credits.get" => Some(handle_get(state, req)),
        _ => None,
    }
}
