//! SQLite-backed store for per-ranker pairwise preferences.
//! Every ranker's "prefers X over Y" edges are kept acyclic at each commit
//! point, including under concurrent writers.

pub mod engine;
pub mod errors;
mod locks;
pub mod membership;
pub mod query;
mod reach;
pub mod registry;
pub mod schema;
pub mod store;

pub use crate::engine::{CycleConflict, InsertOutcome};
pub use crate::errors::PrefGraphError;
pub use crate::membership::MembershipOutcome;
pub use crate::query::PreferenceQuery;
pub use crate::registry::{Entity, EntityKind};
pub use crate::store::PreferenceStore;
