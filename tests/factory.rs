use std::sync::mpsc;
use std::time::Duration;

use poolkit::ExecutorFactory;

#[test]
fn instance_returns_same_reference() {
    let a = ExecutorFactory::instance();
    let b = ExecutorFactory::instance();
    assert!(std::ptr::eq(a, b));
}

#[test]
fn instance_is_shared_across_concurrent_first_access() {
    let mut refs: Vec<&'static ExecutorFactory> = Vec::new();

    crossbeam_utils::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|_| ExecutorFactory::instance()))
            .collect();
        for handle in handles {
            refs.push(handle.join().unwrap());
        }
    })
    .unwrap();

    let first = refs[0];
    assert!(refs.iter().all(|&r| std::ptr::eq(r, first)));
}

// The naming counter starts at 1 and is incremented before first use, so a
// fresh pool's first worker is named with suffix "2", never "1". This is
// inherited behavior, kept for compatibility rather than by design.
#[test]
fn first_worker_name_has_suffix_two() {
    let pool = ExecutorFactory::instance()
        .new_cached_thread_pool()
        .unwrap();

    let (tx, rx) = mpsc::channel();
    pool.spawn(move || {
        tx.send(std::thread::current().name().unwrap().to_string())
            .unwrap();
    });

    let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(name, "ExecutorFactory2");
}

#[test]
fn namer_counts_up_per_pool() {
    use poolkit::ThreadNamer;

    let namer = ThreadNamer::new();
    assert_eq!(namer.next_name(), "ExecutorFactory2");
    assert_eq!(namer.next_name(), "ExecutorFactory3");
    assert_eq!(namer.next_name(), "ExecutorFactory4");

    // A fresh namer restarts its own counter; pools never share one.
    let other = ThreadNamer::new();
    assert_eq!(other.next_name(), "ExecutorFactory2");
}
