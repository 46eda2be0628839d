use crate::{
    errors::PrefGraphError,
    registry::{Entity, EntityKind},
    store::PreferenceStore,
};

/// Read facade over public string identifiers. Resolves identities first and
/// surfaces `NotFound` for unknown ids, then delegates to the store; no state
/// of its own.
pub struct PreferenceQuery<'a> {
    store: &'a PreferenceStore,
}

impl<'a> PreferenceQuery<'a> {
    pub fn new(store: &'a PreferenceStore) -> Self {
        Self { store }
    }

    pub fn ranker_knows_item(
        &self,
        ranker_id: &str,
        item_id: &str,
    ) -> Result<bool, PrefGraphError> {
        let ranker = self.store.resolve(EntityKind::Ranker, ranker_id)?;
        let item = self.store.resolve(EntityKind::Item, item_id)?;
        self.store.knows(ranker.id, item.id)
    }

    /// Direct edges for a ranker with both endpoints materialized, in
    /// (preferred, nonpreferred) order.
    pub fn direct_preferences(
        &self,
        ranker_id: &str,
    ) -> Result<Vec<(Entity, Entity)>, PrefGraphError> {
        let ranker = self.store.resolve(EntityKind::Ranker, ranker_id)?;
        let mut pairs = Vec::new();
        for (preferred, nonpreferred) in self.store.list_preferences(ranker.id)? {
            pairs.push((
                self.store.get_entity(preferred)?,
                self.store.get_entity(nonpreferred)?,
            ));
        }
        Ok(pairs)
    }

    /// Direction-sensitive check for one direct edge.
    pub fn preference_between(
        &self,
        ranker_id: &str,
        preferred_id: &str,
        nonpreferred_id: &str,
    ) -> Result<bool, PrefGraphError> {
        let ranker = self.store.resolve(EntityKind::Ranker, ranker_id)?;
        let preferred = self.store.resolve(EntityKind::Item, preferred_id)?;
        let nonpreferred = self.store.resolve(EntityKind::Item, nonpreferred_id)?;
        self.store
            .preference_exists(ranker.id, preferred.id, nonpreferred.id)
    }
}

impl PreferenceStore {
    pub fn query(&self) -> PreferenceQuery<'_> {
        PreferenceQuery::new(self)
    }
}
