use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

/// Records are stored as JSON bodies keyed by their derived slug. Jobs keep
/// an insertion sequence so the first of several jobs sharing a legacy slug
/// is stable.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS characters (
            slug        TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            body        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS prompts (
            slug        TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            body        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS jobs (
            seq         INTEGER PRIMARY KEY AUTOINCREMENT,
            id          TEXT UNIQUE,
            legacy_slug TEXT NOT NULL,
            body        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_jobs_legacy_slug
            ON jobs(legacy_slug, seq);

        CREATE TABLE IF NOT EXISTS chats (
            slug        TEXT PRIMARY KEY,
            character   TEXT NOT NULL,
            messages    TEXT NOT NULL DEFAULT '[]',
            updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
