use rusqlite::Connection;

use crate::errors::PrefGraphError;

pub fn ensure_schema(conn: &Connection) -> Result<(), PrefGraphError> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS entities (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            kind      TEXT NOT NULL,
            public_id TEXT NOT NULL,
            data      TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS knows_edges (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            ranker_id INTEGER NOT NULL,
            item_id   INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS preference_edges (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            ranker_id       INTEGER NOT NULL,
            preferred_id    INTEGER NOT NULL,
            nonpreferred_id INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_entities_kind_public ON entities(kind, public_id);
        CREATE INDEX IF NOT EXISTS idx_knows_ranker_item ON knows_edges(ranker_id, item_id);
        CREATE INDEX IF NOT EXISTS idx_prefs_ranker_preferred ON preference_edges(ranker_id, preferred_id);
        CREATE INDEX IF NOT EXISTS idx_prefs_ranker_nonpreferred ON preference_edges(ranker_id, nonpreferred_id);
        "#,
    )
    .map_err(|e| PrefGraphError::schema(e.to_string()))?;
    Ok(())
}
