//! Throughput of depot-buffer against crossbeam-channel's bounded channel.
//!
//! Run with: cargo bench -p depot-buffer --bench buffer_comparison
//!
//! Both sides use the same capacity and the same producer/consumer layout.

use std::sync::Arc;
use std::thread;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use depot_buffer::BoundedBuffer;

const MESSAGES: u64 = 100_000;
const CAPACITY: usize = 64;

// ============================================================================
// depot-buffer
// ============================================================================

fn run_depot(consumers: usize) {
    let buffer = Arc::new(BoundedBuffer::<u64>::new(CAPACITY).unwrap());

    let handles: Vec<_> = (0..consumers)
        .map(|_| {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                let mut sum = 0u64;
                while let Ok(v) = buffer.remove() {
                    sum = sum.wrapping_add(v);
                }
                sum
            })
        })
        .collect();

    for i in 0..MESSAGES {
        buffer.insert(i).unwrap();
    }
    buffer.close();

    let sum: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    black_box(sum);
}

// ============================================================================
// crossbeam-channel
// ============================================================================

fn run_crossbeam(consumers: usize) {
    let (tx, rx) = crossbeam_channel::bounded::<u64>(CAPACITY);

    let handles: Vec<_> = (0..consumers)
        .map(|_| {
            let rx = rx.clone();
            thread::spawn(move || {
                let mut sum = 0u64;
                while let Ok(v) = rx.recv() {
                    sum = sum.wrapping_add(v);
                }
                sum
            })
        })
        .collect();
    drop(rx);

    for i in 0..MESSAGES {
        tx.send(i).unwrap();
    }
    drop(tx);

    let sum: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    black_box(sum);
}

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("one_producer_n_consumers");
    group.throughput(Throughput::Elements(MESSAGES));
    group.sample_size(20);

    for consumers in [1, 2, 4] {
        group.bench_with_input(
            BenchmarkId::new("depot-buffer", consumers),
            &consumers,
            |b, &n| b.iter(|| run_depot(n)),
        );
        group.bench_with_input(
            BenchmarkId::new("crossbeam-channel", consumers),
            &consumers,
            |b, &n| b.iter(|| run_crossbeam(n)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_throughput);
criterion_main!(benches);
