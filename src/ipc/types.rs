use std::path::PathBuf;

use rusqlite::Connection;
use serde::Deserialize;

/// One line of the stdin protocol.
#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// The daemon's only mutable state. The engine modules themselves are pure;
/// everything here belongs to the credit-hours cache.
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
}
