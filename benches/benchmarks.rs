//! Benchmarks for cuckooset
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use cuckooset::{BitStore, CuckooFilter, WordArray};

// ============================================================================
// Cuckoo Filter Benchmarks
// ============================================================================

fn bench_cuckoo(c: &mut Criterion) {
    let mut group = c.benchmark_group("cuckoo_filter");
    group.throughput(Throughput::Elements(1));

    group.bench_function("add", |b| {
        let mut filter = CuckooFilter::new(10_000_000, 0.01);
        let mut i = 0u64;
        b.iter(|| {
            filter.add(&i.to_le_bytes());
            i = i.wrapping_add(1);
        });
    });

    // Steady-state churn: one insert and one delete per iteration keeps
    // occupancy constant.
    group.bench_function("add_delete", |b| {
        let mut filter = CuckooFilter::new(100_000, 0.01);
        for i in 0..50_000u64 {
            filter.add(&i.to_le_bytes());
        }
        let mut i = 50_000u64;
        b.iter(|| {
            filter.add(&i.to_le_bytes());
            let _ = filter.delete(&(i - 50_000).to_le_bytes());
            i = i.wrapping_add(1);
        });
    });

    group.bench_function("contains_hit", |b| {
        let mut filter = CuckooFilter::new(100_000, 0.01);
        for i in 0..100_000u64 {
            filter.add(&i.to_le_bytes());
        }
        let mut i = 0u64;
        b.iter(|| {
            let result = filter.contains(&(i % 100_000).to_le_bytes());
            i = i.wrapping_add(1);
            black_box(result)
        });
    });

    group.bench_function("contains_miss", |b| {
        let mut filter = CuckooFilter::new(100_000, 0.01);
        for i in 0..100_000u64 {
            filter.add(&i.to_le_bytes());
        }
        let mut i = 1_000_000u64;
        b.iter(|| {
            let result = filter.contains(&i.to_le_bytes());
            i = i.wrapping_add(1);
            black_box(result)
        });
    });

    for fingerprint_bits in [8, 12, 15] {
        group.bench_function(format!("contains_f{}", fingerprint_bits), |b| {
            let mut filter = CuckooFilter::with_params(fingerprint_bits, 4, 1 << 15).unwrap();
            for i in 0..100_000u64 {
                filter.add(&i.to_le_bytes());
            }
            let mut i = 0u64;
            b.iter(|| {
                let result = filter.contains(&(i % 100_000).to_le_bytes());
                i = i.wrapping_add(1);
                black_box(result)
            });
        });
    }

    group.finish();
}

// ============================================================================
// Word Array Benchmarks
// ============================================================================

fn bench_word_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("word_array");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set", |b| {
        let mut store = WordArray::new(1 << 16, 12);
        let mut i = 0u64;
        b.iter(|| {
            store.set((i as usize) % (1 << 16), i & 0xFFF);
            i = i.wrapping_add(1);
        });
    });

    group.bench_function("get", |b| {
        let mut store = WordArray::new(1 << 16, 12);
        for i in 0..(1u64 << 16) {
            store.set(i as usize, i & 0xFFF);
        }
        let mut i = 0u64;
        b.iter(|| {
            let word = store.get((i as usize) % (1 << 16));
            i = i.wrapping_add(1);
            black_box(word)
        });
    });

    group.finish();
}

// ============================================================================
// Main
// ============================================================================

criterion_group!(benches, bench_cuckoo, bench_word_array);

criterion_main!(benches);
