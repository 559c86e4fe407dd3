use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

/// Open (or create) the workspace cache database.
///
/// The only persisted state anywhere in the system: a best-effort
/// `courseId -> creditHours` mapping. It is rebuildable from page data at any
/// time and never authoritative over extracted category data.
pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join("gradebookd.sqlite3");
    let conn = Connection::open(db_path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS credit_hours(
            course_id TEXT PRIMARY KEY,
            hours REAL NOT NULL,
            updated_at TEXT
        )",
        [],
    )?;

    Ok(conn)
}

/// Look up cached credit hours. Entries that cannot split a grade
/// (`hours <= 0`) read as absent, so a bad cache row only degrades structure
/// resolution to its fallback.
pub fn get_credit_hours(conn: &Connection, course_id: &str) -> anyhow::Result<Option<f64>> {
    let hours: Option<f64> = conn
        .query_row(
            "SELECT hours FROM credit_hours WHERE course_id = ?",
            [course_id],
            |r| r.get(0),
        )
        .optional()?;
    Ok(hours.filter(|h| h.is_finite() && *h > 0.0))
}

/// Record newly observed credit hours for a course, replacing any prior
/// observation.
pub fn put_credit_hours(conn: &Connection, course_id: &str, hours: f64) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO credit_hours(course_id, hours, updated_at)
         VALUES(?, ?, ?)
         ON CONFLICT(course_id) DO UPDATE SET hours = excluded.hours, updated_at = excluded.updated_at",
        (course_id, hours, chrono::Utc::now().to_rfc3339()),
    )?;
    Ok(())
}
