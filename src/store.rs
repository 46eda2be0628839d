use std::path::Path;

use parking_lot::{Mutex, MutexGuard};
use rusqlite::{Connection, OptionalExtension, params};

use crate::{errors::PrefGraphError, locks::RankerLocks, schema::ensure_schema};

/// Shared handle over one SQLite connection. The connection sits behind a
/// mutex so the store is `Send + Sync`; per-ranker serialization is layered
/// on top via the ranker lock table. Acquisition order is always ranker lock
/// first, then connection.
pub struct PreferenceStore {
    conn: Mutex<Connection>,
    ranker_locks: RankerLocks,
}

impl PreferenceStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PrefGraphError> {
        let conn =
            Connection::open(path).map_err(|e| PrefGraphError::connection(e.to_string()))?;
        ensure_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, PrefGraphError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| PrefGraphError::connection(e.to_string()))?;
        ensure_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    pub(crate) fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    pub(crate) fn ranker_locks(&self) -> &RankerLocks {
        &self.ranker_locks
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            ranker_locks: RankerLocks::new(),
        }
    }
}

pub(crate) fn entity_row_exists(conn: &Connection, id: i64) -> Result<bool, PrefGraphError> {
    let exists: Option<i64> = conn
        .query_row("SELECT 1 FROM entities WHERE id=?1", params![id], |row| {
            row.get(0)
        })
        .optional()
        .map_err(|e| PrefGraphError::query(e.to_string()))?;
    Ok(exists.is_some())
}
