//! Cost of unlocking: Argon2id production profile vs. the test profile.
//!
//! The production profile (64 MiB, 3 passes, 4 lanes) dominates unlock
//! latency; everything after key derivation is microseconds.
//!
//! Run with: `cargo bench --bench kdf_comparison_benchmark`

use criterion::{black_box, criterion_group, criterion_main, Criterion, SamplingMode};
use zkvault::{kdf, master, KdfParams, Session};

fn bench_kdf_profiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_kek");
    group.sampling_mode(SamplingMode::Flat);
    group.sample_size(10); // Production profile is deliberately slow

    let salt = kdf::generate_salt().unwrap();

    group.bench_function("production_profile", |b| {
        let params = KdfParams::default();
        b.iter(|| kdf::derive_kek(black_box("correct-horse-battery"), &salt, &params).unwrap());
    });

    group.bench_function("insecure_fast_profile", |b| {
        let params = KdfParams::insecure_fast();
        b.iter(|| kdf::derive_kek(black_box("correct-horse-battery"), &salt, &params).unwrap());
    });

    group.finish();
}

fn bench_unlock(c: &mut Criterion) {
    let params = KdfParams::insecure_fast();
    let salt = kdf::generate_salt().unwrap();
    let kek = kdf::derive_kek("pw", &salt, &params).unwrap();
    let wrapped = master::wrap_master_key(&master::generate_master_key().unwrap(), &kek).unwrap();

    c.bench_function("unlock_fast_profile", |b| {
        b.iter(|| {
            let mut session = Session::new();
            master::unlock(&mut session, black_box("pw"), &salt, &wrapped, &params).unwrap();
            session
        });
    });
}

criterion_group!(benches, bench_kdf_profiles, bench_unlock);
criterion_main!(benches);
