//! Benchmarks for building and verifying content trees.
#![allow(missing_docs)]
#![allow(unused_crate_dependencies)]

// stupid linter issue
use criterion as _;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use strata_content_merkle::{ByteContent, ContentMerkleTree, MerkleTreeBuilder, Sha256Strategy};

/// Generates `count` distinct items from sequential indices.
fn generate_items(count: usize) -> Vec<ByteContent> {
    (0..count)
        .map(|i| ByteContent::new(i.to_le_bytes().to_vec()))
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for size in [16, 256, 4096] {
        let items = generate_items(size);
        group.bench_with_input(BenchmarkId::new("keccak256", size), &items, |b, items| {
            b.iter(|| black_box(ContentMerkleTree::new(items.clone()).expect("build failed")));
        });
        group.bench_with_input(BenchmarkId::new("sha256", size), &items, |b, items| {
            b.iter(|| {
                black_box(
                    MerkleTreeBuilder::new()
                        .with_strategy(Sha256Strategy::new())
                        .build(items.clone())
                        .expect("build failed"),
                )
            });
        });
    }
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify");
    for size in [256, 4096] {
        let items = generate_items(size);
        let tree = ContentMerkleTree::new(items.clone()).expect("build failed");
        let probe = items[size / 2].clone();

        group.bench_with_input(BenchmarkId::new("content", size), &probe, |b, probe| {
            b.iter(|| black_box(tree.verify_content(probe).expect("verify failed")));
        });
        group.bench_with_input(BenchmarkId::new("path", size), &probe, |b, probe| {
            b.iter(|| black_box(tree.get_path(probe).expect("path failed")));
        });
        group.bench_function(BenchmarkId::new("tree", size), |b| {
            b.iter(|| black_box(tree.verify_tree().expect("verify failed")));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_verify);
criterion_main!(benches);
