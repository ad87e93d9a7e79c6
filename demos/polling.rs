//! Fixed-rate polling with the scheduled pool.
//!
//! Run with `cargo run --example polling`.

use std::time::{Duration, Instant};

use poolkit::ExecutorFactory;

fn main() {
    env_logger::init();

    let pool = ExecutorFactory::instance()
        .new_scheduled_thread_pool(1)
        .expect("failed to create scheduled pool");

    let start = Instant::now();
    let handle = pool.schedule_at_fixed_rate(
        Duration::ZERO,
        Duration::from_secs(1),
        move || {
            // Stand-in for a real poll, e.g. querying a server for status.
            println!(
                "[{:>4.1}s] polling on {:?}",
                start.elapsed().as_secs_f32(),
                std::thread::current().name().unwrap_or("<unnamed>")
            );
        },
    );

    std::thread::sleep(Duration::from_secs(5));
    handle.cancel();
    pool.shutdown();
}
