use rusqlite::{OptionalExtension, params};
use serde::{Deserialize, Serialize};

use crate::{errors::PrefGraphError, store::PreferenceStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Item,
    Ranker,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Item => "item",
            EntityKind::Ranker => "ranker",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "item" => Some(EntityKind::Item),
            "ranker" => Some(EntityKind::Ranker),
            _ => None,
        }
    }
}

/// A registered item or ranker. `public_id` is the externally assigned
/// identifier; `data` is an opaque attribute blob passed through unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    pub id: i64,
    pub kind: EntityKind,
    pub public_id: String,
    pub data: serde_json::Value,
}

impl PreferenceStore {
    /// Inserts a new entity row and returns it with its assigned rowid.
    ///
    /// No duplicate check: registering the same public id twice creates a
    /// second row. Lookups return the first match by rowid, so duplicates are
    /// a data-quality hazard for callers that skip their own pre-check, not a
    /// failure here.
    pub fn register(
        &self,
        kind: EntityKind,
        public_id: &str,
        data: serde_json::Value,
    ) -> Result<Entity, PrefGraphError> {
        validate_public_id(public_id)?;
        let payload = serde_json::to_string(&data)
            .map_err(|e| PrefGraphError::invalid_input(e.to_string()))?;
        let conn = self.connection();
        conn.execute(
            "INSERT INTO entities(kind, public_id, data) VALUES(?1, ?2, ?3)",
            params![kind.as_str(), public_id, payload],
        )
        .map_err(|e| PrefGraphError::query(e.to_string()))?;
        Ok(Entity {
            id: conn.last_insert_rowid(),
            kind,
            public_id: public_id.to_string(),
            data,
        })
    }

    pub fn lookup(
        &self,
        kind: EntityKind,
        public_id: &str,
    ) -> Result<Option<Entity>, PrefGraphError> {
        self.connection()
            .query_row(
                "SELECT id, kind, public_id, data FROM entities
                 WHERE kind=?1 AND public_id=?2 ORDER BY id LIMIT 1",
                params![kind.as_str(), public_id],
                row_to_entity,
            )
            .optional()
            .map_err(|e| PrefGraphError::query(e.to_string()))
    }

    /// `lookup` that turns absence into `NotFound`. Callers run this before
    /// handing internal ids to the membership or preference operations.
    pub fn resolve(&self, kind: EntityKind, public_id: &str) -> Result<Entity, PrefGraphError> {
        self.lookup(kind, public_id)?.ok_or_else(|| {
            PrefGraphError::not_found(format!("{} {public_id}", kind.as_str()))
        })
    }

    pub fn get_entity(&self, id: i64) -> Result<Entity, PrefGraphError> {
        self.connection()
            .query_row(
                "SELECT id, kind, public_id, data FROM entities WHERE id=?1",
                params![id],
                row_to_entity,
            )
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => {
                    PrefGraphError::not_found(format!("entity {id}"))
                }
                other => PrefGraphError::query(other.to_string()),
            })
    }

    /// All entities of one kind, ordered by rowid.
    pub fn list(&self, kind: EntityKind) -> Result<Vec<Entity>, PrefGraphError> {
        let conn = self.connection();
        let mut stmt = conn
            .prepare("SELECT id, kind, public_id, data FROM entities WHERE kind=?1 ORDER BY id")
            .map_err(|e| PrefGraphError::query(e.to_string()))?;
        let rows = stmt
            .query_map(params![kind.as_str()], row_to_entity)
            .map_err(|e| PrefGraphError::query(e.to_string()))?;
        let mut entities = Vec::new();
        for entity in rows {
            entities.push(entity.map_err(|e| PrefGraphError::query(e.to_string()))?);
        }
        Ok(entities)
    }
}

pub(crate) fn row_to_entity(row: &rusqlite::Row<'_>) -> Result<Entity, rusqlite::Error> {
    let kind_text: String = row.get(1)?;
    let kind = EntityKind::parse(&kind_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            kind_text.len(),
            rusqlite::types::Type::Text,
            Box::new(PrefGraphError::invalid_input(format!(
                "unknown entity kind {kind_text}"
            ))),
        )
    })?;
    let data: String = row.get(3)?;
    let value: serde_json::Value = serde_json::from_str(&data).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            data.len(),
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })?;
    Ok(Entity {
        id: row.get(0)?,
        kind,
        public_id: row.get(2)?,
        data: value,
    })
}

fn validate_public_id(public_id: &str) -> Result<(), PrefGraphError> {
    if public_id.trim().is_empty() {
        return Err(PrefGraphError::invalid_input("entity public id must be set"));
    }
    Ok(())
}
