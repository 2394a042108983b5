use aries_replan_core::collections::heap::IndexedPriorityQueue;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::SliceRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn fill(n: u32, rng: &mut StdRng) -> Vec<u32> {
    let mut order: Vec<u32> = (0..n).collect();
    order.shuffle(rng);
    order
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(88371);

    let order = fill(5_000, &mut rng);
    c.bench_function("ipq-add-then-poll-all", |b| {
        b.iter(|| {
            let mut q = IndexedPriorityQueue::new();
            for &v in &order {
                q.add(v, v as i64);
            }
            let mut last = -1;
            while let Some(v) = q.poll() {
                last = black_box(v as i64);
            }
            last
        })
    });

    let order = fill(5_000, &mut rng);
    c.bench_function("ipq-random-update-churn", |b| {
        b.iter(|| {
            let mut q = IndexedPriorityQueue::new();
            for &v in &order {
                q.add(v, v as i64);
            }
            for _ in 0..1_000 {
                let v = order[rng.gen_range(0..order.len())];
                q.update(&v, rng.gen_range(0..order.len() as i64));
            }
            black_box(q.size())
        })
    });

    let order = fill(5_000, &mut rng);
    c.bench_function("ipq-remove-half", |b| {
        b.iter(|| {
            let mut q = IndexedPriorityQueue::new();
            for &v in &order {
                q.add(v, v as i64);
            }
            for &v in order.iter().step_by(2) {
                q.remove(&v);
            }
            black_box(q.size())
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
