use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use prefgraph::{EntityKind, InsertOutcome, PreferenceStore};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde_json::json;

const SEED: u64 = 0x51EF;
const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_millis(300);
const MEASURE: Duration = Duration::from_millis(500);

/// Random (i, j) pairs with i < j: inserting along increasing indexes can
/// never form a cycle, so every accepted edge exercises the full reachability
/// check without triggering rejections.
fn forward_pairs(items: usize, edges: usize, seed: u64) -> Vec<(usize, usize)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..edges)
        .map(|_| {
            let a = rng.gen_range(0..items - 1);
            let b = rng.gen_range(a + 1..items);
            (a, b)
        })
        .collect()
}

fn bench_insert_preferences(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_preferences");
    group
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASURE);
    for &items in &[100usize, 500] {
        let pairs = forward_pairs(items, items * 4, SEED + items as u64);
        group.bench_with_input(BenchmarkId::from_parameter(items), &pairs, |b, pairs| {
            b.iter(|| {
                let store = PreferenceStore::open_in_memory().expect("store");
                let ranker = store
                    .register(EntityKind::Ranker, "bench", json!({}))
                    .expect("ranker")
                    .id;
                let ids: Vec<i64> = (0..items)
                    .map(|idx| {
                        store
                            .register(EntityKind::Item, &format!("item_{idx}"), json!({}))
                            .expect("item")
                            .id
                    })
                    .collect();
                for &(from, to) in pairs {
                    let outcome = store
                        .insert_preference(ranker, ids[from], ids[to])
                        .expect("insert");
                    assert!(!matches!(outcome, InsertOutcome::Invalid(_)));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert_preferences);
criterion_main!(benches);
