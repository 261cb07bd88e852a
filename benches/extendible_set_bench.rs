use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use extendible_set::ExtendibleSet;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("extendible_set_insert_10k", |b| {
        b.iter_batched(
            ExtendibleSet::<u64>::new,
            |mut set| {
                for x in lcg(1).take(10_000) {
                    set.insert(x);
                }
                black_box(set)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_contains_hit(c: &mut Criterion) {
    c.bench_function("extendible_set_contains_hit", |b| {
        let keys: Vec<u64> = lcg(7).take(20_000).collect();
        let set: ExtendibleSet<u64> = keys.iter().copied().collect();
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(set.contains(k));
        })
    });
}

fn bench_contains_miss(c: &mut Criterion) {
    c.bench_function("extendible_set_contains_miss", |b| {
        let set: ExtendibleSet<u64> = lcg(11).take(10_000).collect();
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            // keys unlikely to be in the set
            let k = miss.next().unwrap();
            black_box(set.contains(&k));
        })
    });
}

fn bench_iterate(c: &mut Criterion) {
    c.bench_function("extendible_set_iterate_10k", |b| {
        let set: ExtendibleSet<u64> = lcg(23).take(10_000).collect();
        b.iter(|| {
            let mut sum = 0u64;
            for k in &set {
                sum = sum.wrapping_add(*k);
            }
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .warm_up_time(Duration::from_millis(300))
        .measurement_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_contains_hit, bench_contains_miss, bench_iterate
}
criterion_main!(benches);
