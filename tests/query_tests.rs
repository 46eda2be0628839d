use prefgraph::{EntityKind, PrefGraphError, PreferenceStore};
use serde_json::json;

fn prepared_store() -> PreferenceStore {
    let store = PreferenceStore::open_in_memory().expect("store");
    store
        .register(EntityKind::Ranker, "alice", json!({}))
        .expect("ranker");
    for name in ["apple", "banana", "cherry"] {
        store
            .register(EntityKind::Item, name, json!({ "name": name }))
            .expect("item");
    }
    store
}

#[test]
fn test_ranker_knows_item_is_a_real_predicate() {
    let store = prepared_store();
    let query = store.query();
    // Absent edge must read false, present edge true; an always-true
    // short-circuit here is a regression.
    assert!(!query.ranker_knows_item("alice", "apple").expect("knows"));
    let ranker = store.resolve(EntityKind::Ranker, "alice").expect("ranker");
    let item = store.resolve(EntityKind::Item, "apple").expect("item");
    store.add_membership(ranker.id, item.id).expect("add");
    assert!(query.ranker_knows_item("alice", "apple").expect("knows"));
    store.remove_membership(ranker.id, item.id).expect("remove");
    assert!(!query.ranker_knows_item("alice", "apple").expect("knows"));
}

#[test]
fn test_unknown_identifiers_surface_not_found() {
    let store = prepared_store();
    let query = store.query();
    let err = query
        .ranker_knows_item("nobody", "apple")
        .expect_err("unknown ranker");
    assert!(matches!(err, PrefGraphError::NotFound(_)));
    let err = query
        .ranker_knows_item("alice", "durian")
        .expect_err("unknown item");
    assert!(matches!(err, PrefGraphError::NotFound(_)));
    let err = query
        .direct_preferences("nobody")
        .expect_err("unknown ranker");
    assert!(matches!(err, PrefGraphError::NotFound(_)));
}

#[test]
fn test_direct_preferences_materializes_pairs_in_order() {
    let store = prepared_store();
    let ranker = store.resolve(EntityKind::Ranker, "alice").expect("ranker");
    let apple = store.resolve(EntityKind::Item, "apple").expect("apple");
    let banana = store.resolve(EntityKind::Item, "banana").expect("banana");
    let cherry = store.resolve(EntityKind::Item, "cherry").expect("cherry");
    store
        .insert_preference(ranker.id, apple.id, banana.id)
        .expect("insert");
    store
        .insert_preference(ranker.id, banana.id, cherry.id)
        .expect("insert");
    let pairs = store.query().direct_preferences("alice").expect("pairs");
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].0.public_id, "apple");
    assert_eq!(pairs[0].1.public_id, "banana");
    assert_eq!(pairs[1].0.public_id, "banana");
    assert_eq!(pairs[1].1.public_id, "cherry");
    assert_eq!(pairs[0].0.data, json!({ "name": "apple" }));
}

#[test]
fn test_preference_between_is_direction_sensitive() {
    let store = prepared_store();
    let ranker = store.resolve(EntityKind::Ranker, "alice").expect("ranker");
    let apple = store.resolve(EntityKind::Item, "apple").expect("apple");
    let banana = store.resolve(EntityKind::Item, "banana").expect("banana");
    store
        .insert_preference(ranker.id, apple.id, banana.id)
        .expect("insert");
    let query = store.query();
    assert!(
        query
            .preference_between("alice", "apple", "banana")
            .expect("forward")
    );
    assert!(
        !query
            .preference_between("alice", "banana", "apple")
            .expect("reverse")
    );
}

#[test]
fn test_preference_between_ignores_transitive_edges() {
    let store = prepared_store();
    let ranker = store.resolve(EntityKind::Ranker, "alice").expect("ranker");
    let apple = store.resolve(EntityKind::Item, "apple").expect("apple");
    let banana = store.resolve(EntityKind::Item, "banana").expect("banana");
    let cherry = store.resolve(EntityKind::Item, "cherry").expect("cherry");
    store
        .insert_preference(ranker.id, apple.id, banana.id)
        .expect("insert");
    store
        .insert_preference(ranker.id, banana.id, cherry.id)
        .expect("insert");
    // apple > cherry holds transitively but is not a direct edge.
    assert!(
        !store
            .query()
            .preference_between("alice", "apple", "cherry")
            .expect("transitive")
    );
}
