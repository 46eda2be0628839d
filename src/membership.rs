use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    errors::PrefGraphError,
    store::{PreferenceStore, entity_row_exists},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOutcome {
    Created,
    AlreadyExists,
}

/// The "knows" relation: which items a ranker may express preferences over.
/// Independent of the preference edges (removing membership never touches
/// preferences, and preferences never require membership).
impl PreferenceStore {
    pub fn knows(&self, ranker: i64, item: i64) -> Result<bool, PrefGraphError> {
        let conn = self.connection();
        knows_row_exists(&conn, ranker, item)
    }

    pub fn add_membership(
        &self,
        ranker: i64,
        item: i64,
    ) -> Result<MembershipOutcome, PrefGraphError> {
        let ranker_lock = self.ranker_locks().for_ranker(ranker);
        let _serialized = ranker_lock.lock();
        let conn = self.connection();
        if !entity_row_exists(&conn, ranker)? || !entity_row_exists(&conn, item)? {
            return Err(PrefGraphError::not_found(
                "membership endpoints must reference registered entities",
            ));
        }
        if knows_row_exists(&conn, ranker, item)? {
            return Ok(MembershipOutcome::AlreadyExists);
        }
        conn.execute(
            "INSERT INTO knows_edges(ranker_id, item_id) VALUES(?1, ?2)",
            params![ranker, item],
        )
        .map_err(|e| PrefGraphError::query(e.to_string()))?;
        Ok(MembershipOutcome::Created)
    }

    /// Removing an absent edge is a no-op, not an error.
    pub fn remove_membership(&self, ranker: i64, item: i64) -> Result<(), PrefGraphError> {
        let ranker_lock = self.ranker_locks().for_ranker(ranker);
        let _serialized = ranker_lock.lock();
        self.connection()
            .execute(
                "DELETE FROM knows_edges WHERE ranker_id=?1 AND item_id=?2",
                params![ranker, item],
            )
            .map_err(|e| PrefGraphError::query(e.to_string()))?;
        Ok(())
    }
}

pub(crate) fn knows_row_exists(
    conn: &Connection,
    ranker: i64,
    item: i64,
) -> Result<bool, PrefGraphError> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM knows_edges WHERE ranker_id=?1 AND item_id=?2",
            params![ranker, item],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| PrefGraphError::query(e.to_string()))?;
    Ok(exists.is_some())
}
