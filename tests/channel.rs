//! Bounded-channel properties (§4.1, §8): FIFO ordering, no lost values, and
//! bounded capacity actually blocks a producer that gets ahead of consumers.

use proptest::prelude::*;
use std::sync::Arc;
use std::thread;
use suretree::channel::Channel;

#[test]
fn single_thread_fifo() {
    let ch: Channel<i32> = Channel::new(4);
    ch.push(1);
    ch.push(2);
    ch.push(3);
    assert_eq!(ch.pop(), 1);
    assert_eq!(ch.pop(), 2);
    ch.push(4);
    assert_eq!(ch.pop(), 3);
    assert_eq!(ch.pop(), 4);
}

#[test]
fn push_blocks_at_capacity_until_popped() {
    let ch: Arc<Channel<i32>> = Arc::new(Channel::new(1));
    ch.push(1);
    assert_eq!(ch.len(), 1);

    let ch2 = Arc::clone(&ch);
    let handle = thread::spawn(move || {
        // This push must block until the main thread pops the first value.
        ch2.push(2);
    });

    // Give the spawned thread a moment to actually block on push, then drain.
    thread::sleep(std::time::Duration::from_millis(50));
    assert_eq!(ch.len(), 1, "push should still be blocked at capacity");
    assert_eq!(ch.pop(), 1);
    handle.join().unwrap();
    assert_eq!(ch.pop(), 2);
}

#[test]
fn one_producer_n_consumers_preserve_multiset() {
    let ch: Arc<Channel<Option<u32>>> = Arc::new(Channel::new(8));
    const N: u32 = 500;
    const WORKERS: u32 = 6;

    let producer = {
        let ch = Arc::clone(&ch);
        thread::spawn(move || {
            for i in 0..N {
                ch.push(Some(i));
            }
            for _ in 0..WORKERS {
                ch.push(None);
            }
        })
    };

    let consumers: Vec<_> = (0..WORKERS)
        .map(|_| {
            let ch = Arc::clone(&ch);
            thread::spawn(move || {
                let mut seen = Vec::new();
                loop {
                    match ch.pop() {
                        None => break,
                        Some(v) => seen.push(v),
                    }
                }
                seen
            })
        })
        .collect();

    producer.join().unwrap();
    let mut all: Vec<u32> = consumers
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    all.sort_unstable();
    let expected: Vec<u32> = (0..N).collect();
    assert_eq!(all, expected, "multiset of popped values must equal pushed values");
}

proptest! {
    /// For any interleaving of N pushes from a single producer thread and
    /// pops from a single consumer thread, the consumer sees the values in
    /// the order they were pushed (single-producer/single-consumer FIFO).
    #[test]
    fn spsc_preserves_producer_order(values in prop::collection::vec(any::<i32>(), 0..200)) {
        let ch: Arc<Channel<i32>> = Arc::new(Channel::new(7.max(values.len().min(32))));
        let n = values.len();

        let producer = {
            let ch = Arc::clone(&ch);
            let values = values.clone();
            thread::spawn(move || {
                for v in values {
                    ch.push(v);
                }
            })
        };

        let mut popped = Vec::with_capacity(n);
        for _ in 0..n {
            popped.push(ch.pop());
        }
        producer.join().unwrap();

        prop_assert_eq!(popped, values);
    }
}
