use std::collections::VecDeque;

use ahash::AHashSet;
use rusqlite::{Connection, params};

use crate::errors::PrefGraphError;

/// True iff `to` is reachable from `from` through one ranker's preference
/// edges by a path of length >= 1. `from == to` only returns true if the
/// graph already contains a cycle back to `from`.
pub(crate) fn reaches(
    conn: &Connection,
    ranker: i64,
    from: i64,
    to: i64,
) -> Result<bool, PrefGraphError> {
    let mut seen = AHashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(from);
    queue.push_back(from);
    while let Some(node) = queue.pop_front() {
        for next in less_preferred_than(conn, ranker, node)? {
            if next == to {
                return Ok(true);
            }
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    Ok(false)
}

/// Direct successors of `item` in the ranker's graph: everything the ranker
/// explicitly prefers `item` over.
pub(crate) fn less_preferred_than(
    conn: &Connection,
    ranker: i64,
    item: i64,
) -> Result<Vec<i64>, PrefGraphError> {
    let mut stmt = conn
        .prepare(
            "SELECT nonpreferred_id FROM preference_edges
             WHERE ranker_id=?1 AND preferred_id=?2 ORDER BY nonpreferred_id, id",
        )
        .map_err(|e| PrefGraphError::query(e.to_string()))?;
    let rows = stmt
        .query_map(params![ranker, item], |row| row.get(0))
        .map_err(|e| PrefGraphError::query(e.to_string()))?;
    let mut result = Vec::new();
    for entry in rows {
        result.push(entry.map_err(|e| PrefGraphError::query(e.to_string()))?);
    }
    Ok(result)
}
