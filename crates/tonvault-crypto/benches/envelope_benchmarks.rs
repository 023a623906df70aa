//! TonVault envelope benchmarks
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench -p tonvault-crypto
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tonvault_crypto::{decrypt, derive_key, encrypt};

// ============================================================================
// Key Derivation Benchmarks
// ============================================================================

fn bench_key_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Key Derivation");
    group.sample_size(10);

    group.bench_function("derive_key_100k", |b| {
        b.iter(|| derive_key(black_box("benchmark password"), black_box(&[7u8; 16])))
    });

    group.finish();
}

// ============================================================================
// Envelope Benchmarks
// ============================================================================

fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("Envelope");
    group.sample_size(10);

    for size in [64usize, 4096, 65536] {
        let plaintext = vec![0x42u8; size];
        let blob = encrypt(&plaintext, "benchmark password").unwrap();

        group.bench_with_input(BenchmarkId::new("encrypt", size), &plaintext, |b, data| {
            b.iter(|| encrypt(black_box(data), "benchmark password"))
        });
        group.bench_with_input(BenchmarkId::new("decrypt", size), &blob, |b, blob| {
            b.iter(|| decrypt(black_box(blob), "benchmark password"))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_key_derivation, bench_envelope);
criterion_main!(benches);
