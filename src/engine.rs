use std::fmt;

use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    errors::PrefGraphError,
    reach,
    store::{PreferenceStore, entity_row_exists},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The edge was added and the graph is still acyclic.
    Created,
    /// The exact direct edge was already present; nothing changed.
    Exists,
    /// Adding the edge would create a cycle; nothing changed.
    Invalid(CycleConflict),
}

/// The contradiction behind a rejected insert: the ranker already prefers
/// `nonpreferred_id` over `preferred_id`, directly or through a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleConflict {
    pub ranker_id: i64,
    pub preferred_id: i64,
    pub nonpreferred_id: i64,
}

impl fmt::Display for CycleConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.preferred_id == self.nonpreferred_id {
            write!(
                f,
                "ranker {} cannot prefer item {} over itself",
                self.ranker_id, self.preferred_id
            )
        } else {
            write!(
                f,
                "ranker {} already prefers item {} over item {}, cycles not allowed",
                self.ranker_id, self.nonpreferred_id, self.preferred_id
            )
        }
    }
}

impl PreferenceStore {
    /// True iff the direct edge (preferred, nonpreferred) exists. Transitive
    /// preferences do not count.
    pub fn preference_exists(
        &self,
        ranker: i64,
        preferred: i64,
        nonpreferred: i64,
    ) -> Result<bool, PrefGraphError> {
        let conn = self.connection();
        preference_row_exists(&conn, ranker, preferred, nonpreferred)
    }

    /// All direct edges for a ranker as (preferred, nonpreferred) pairs,
    /// ordered by insertion rowid.
    pub fn list_preferences(&self, ranker: i64) -> Result<Vec<(i64, i64)>, PrefGraphError> {
        let conn = self.connection();
        let mut stmt = conn
            .prepare(
                "SELECT preferred_id, nonpreferred_id FROM preference_edges
                 WHERE ranker_id=?1 ORDER BY id",
            )
            .map_err(|e| PrefGraphError::query(e.to_string()))?;
        let rows = stmt
            .query_map(params![ranker], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(|e| PrefGraphError::query(e.to_string()))?;
        let mut pairs = Vec::new();
        for pair in rows {
            pairs.push(pair.map_err(|e| PrefGraphError::query(e.to_string()))?);
        }
        Ok(pairs)
    }

    /// Adds the direct edge "ranker prefers `preferred` over `nonpreferred`"
    /// unless it would make the ranker's graph cyclic.
    ///
    /// The ranker lock and the connection are both held from the existence
    /// check through the insert, so concurrent inserts for one ranker cannot
    /// jointly commit a contradiction. A rejected insert mutates nothing.
    pub fn insert_preference(
        &self,
        ranker: i64,
        preferred: i64,
        nonpreferred: i64,
    ) -> Result<InsertOutcome, PrefGraphError> {
        let conflict = CycleConflict {
            ranker_id: ranker,
            preferred_id: preferred,
            nonpreferred_id: nonpreferred,
        };
        if preferred == nonpreferred {
            return Ok(InsertOutcome::Invalid(conflict));
        }
        let ranker_lock = self.ranker_locks().for_ranker(ranker);
        let _serialized = ranker_lock.lock();
        let conn = self.connection();
        if !entity_row_exists(&conn, ranker)?
            || !entity_row_exists(&conn, preferred)?
            || !entity_row_exists(&conn, nonpreferred)?
        {
            return Err(PrefGraphError::not_found(
                "preference endpoints must reference registered entities",
            ));
        }
        if preference_row_exists(&conn, ranker, preferred, nonpreferred)? {
            return Ok(InsertOutcome::Exists);
        }
        if reach::reaches(&conn, ranker, nonpreferred, preferred)? {
            return Ok(InsertOutcome::Invalid(conflict));
        }
        conn.execute(
            "INSERT INTO preference_edges(ranker_id, preferred_id, nonpreferred_id)
             VALUES(?1, ?2, ?3)",
            params![ranker, preferred, nonpreferred],
        )
        .map_err(|e| PrefGraphError::query(e.to_string()))?;
        Ok(InsertOutcome::Created)
    }

    /// Removes the direct edge only. Idempotent; transitive implications are
    /// never repaired, and removal cannot violate acyclicity.
    pub fn delete_preference(
        &self,
        ranker: i64,
        preferred: i64,
        nonpreferred: i64,
    ) -> Result<(), PrefGraphError> {
        let ranker_lock = self.ranker_locks().for_ranker(ranker);
        let _serialized = ranker_lock.lock();
        self.connection()
            .execute(
                "DELETE FROM preference_edges
                 WHERE ranker_id=?1 AND preferred_id=?2 AND nonpreferred_id=?3",
                params![ranker, preferred, nonpreferred],
            )
            .map_err(|e| PrefGraphError::query(e.to_string()))?;
        Ok(())
    }

    /// Removes the ranker together with all of its membership and preference
    /// edges in one transaction. Items are never deleted by this cascade.
    pub fn delete_ranker(&self, ranker: i64) -> Result<(), PrefGraphError> {
        let ranker_lock = self.ranker_locks().for_ranker(ranker);
        let _serialized = ranker_lock.lock();
        let conn = self.connection();
        conn.execute("BEGIN IMMEDIATE", [])
            .map_err(|e| PrefGraphError::query(e.to_string()))?;
        let result = (|| {
            conn.execute(
                "DELETE FROM knows_edges WHERE ranker_id=?1",
                params![ranker],
            )
            .map_err(|e| PrefGraphError::query(e.to_string()))?;
            conn.execute(
                "DELETE FROM preference_edges WHERE ranker_id=?1",
                params![ranker],
            )
            .map_err(|e| PrefGraphError::query(e.to_string()))?;
            let affected = conn
                .execute(
                    "DELETE FROM entities WHERE id=?1 AND kind='ranker'",
                    params![ranker],
                )
                .map_err(|e| PrefGraphError::query(e.to_string()))?;
            if affected == 0 {
                return Err(PrefGraphError::not_found(format!("ranker {ranker}")));
            }
            Ok(())
        })();
        match result {
            Ok(()) => {
                conn.execute("COMMIT", [])
                    .map_err(|e| PrefGraphError::query(e.to_string()))?;
                drop(conn);
                self.ranker_locks().remove(ranker);
                Ok(())
            }
            Err(err) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(err)
            }
        }
    }
}

pub(crate) fn preference_row_exists(
    conn: &Connection,
    ranker: i64,
    preferred: i64,
    nonpreferred: i64,
) -> Result<bool, PrefGraphError> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM preference_edges
             WHERE ranker_id=?1 AND preferred_id=?2 AND nonpreferred_id=?3",
            params![ranker, preferred, nonpreferred],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| PrefGraphError::query(e.to_string()))?;
    Ok(exists.is_some())
}
