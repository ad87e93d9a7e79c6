use std::sync::mpsc;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use poolkit::ExecutorFactory;

const JOBS: usize = 100;

fn dispatch_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    group.bench_function("cached", |b| {
        b.iter_batched(
            || ExecutorFactory::instance().new_cached_thread_pool().unwrap(),
            |pool| {
                let (tx, rx) = mpsc::channel();
                for _ in 0..JOBS {
                    let tx = tx.clone();
                    pool.spawn(move || tx.send(()).unwrap());
                }
                drop(tx);
                rx.iter().take(JOBS).count()
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("single_thread", |b| {
        b.iter_batched(
            || {
                ExecutorFactory::instance()
                    .new_single_thread_executor()
                    .unwrap()
            },
            |executor| {
                let (tx, rx) = mpsc::channel();
                for _ in 0..JOBS {
                    let tx = tx.clone();
                    executor.spawn(move || tx.send(()).unwrap());
                }
                drop(tx);
                rx.iter().take(JOBS).count()
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("scheduled", |b| {
        b.iter_batched(
            || {
                ExecutorFactory::instance()
                    .new_scheduled_thread_pool(4)
                    .unwrap()
            },
            |pool| {
                let (tx, rx) = mpsc::channel();
                for _ in 0..JOBS {
                    let tx = tx.clone();
                    pool.schedule(Duration::ZERO, move || tx.send(()).unwrap());
                }
                drop(tx);
                rx.iter().take(JOBS).count()
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, dispatch_bench);
criterion_main!(benches);
