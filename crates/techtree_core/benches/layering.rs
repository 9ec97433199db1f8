//! Layer application benchmarks for techtree_core.
//!
//! Run with: `cargo bench -p techtree_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use techtree_core::prelude::*;
use techtree_test_utils::fixtures::{zerg_layers, zerg_stable_ids};
use techtree_test_utils::strategies::parent_chain;

/// Benchmarks layer application and the derivation passes after it.
pub fn layering_benchmark(c: &mut Criterion) {
    let layers = zerg_layers();
    let ids = zerg_stable_ids();

    c.bench_function("apply_fixture_layers", |b| {
        b.iter(|| {
            let mut store = CatalogStore::new();
            store.apply_layers(black_box(&layers)).map(|reports| reports.len())
        })
    });

    // reversed chain: every pass resolves exactly one link
    let mut chain = parent_chain(10, 100, false);
    chain.reverse();
    let chain_layer = Layer::new("chain").with_units(chain);
    c.bench_function("apply_reversed_parent_chain", |b| {
        b.iter(|| {
            let mut store = CatalogStore::new();
            store.apply_layer(black_box(&chain_layer)).map(|report| report.units.passes)
        })
    });

    let mut store = CatalogStore::new();
    if store.apply_layers(&layers).is_ok() {
        c.bench_function("derive_and_export_tech_tree", |b| {
            b.iter(|| {
                let tree = TechTreeDeriver::new(&store).derive(Race::Zerg);
                Exporter::new(&store, &ids).tech_trees(black_box(&[tree]))
            })
        });
    }
}

criterion_group!(benches, layering_benchmark);
criterion_main!(benches);
