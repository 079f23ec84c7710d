//! Exhaustive interleaving tests for the bounded buffer.
//!
//! Run with:
//! RUSTFLAGS="--cfg loom" cargo test -p depot-buffer --test loom --release

#![cfg(loom)]

use loom::sync::Arc;
use loom::thread;

use depot_buffer::{BoundedBuffer, InsertError, RemoveError};

#[test]
fn capacity_one_handoff_preserves_order() {
    loom::model(|| {
        let buffer = Arc::new(BoundedBuffer::new(1).unwrap());

        let producer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                buffer.insert(1).unwrap();
                buffer.insert(2).unwrap();
            })
        };

        assert_eq!(buffer.remove().unwrap(), 1);
        assert_eq!(buffer.remove().unwrap(), 2);

        producer.join().unwrap();
        assert!(buffer.is_empty());
    });
}

#[test]
fn two_removers_one_item() {
    loom::model(|| {
        let buffer = Arc::new(BoundedBuffer::new(2).unwrap());

        let removers: Vec<_> = (0..2)
            .map(|_| {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || buffer.remove().ok())
            })
            .collect();

        buffer.insert(7u32).unwrap();
        buffer.close();

        let got: Vec<_> = removers
            .into_iter()
            .filter_map(|r| r.join().unwrap())
            .collect();
        assert_eq!(got, vec![7]);
    });
}

#[test]
fn close_releases_blocked_remover() {
    loom::model(|| {
        let buffer = Arc::new(BoundedBuffer::<u32>::new(1).unwrap());

        let remover = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || buffer.remove())
        };

        buffer.close();
        assert_eq!(remover.join().unwrap(), Err(RemoveError));
    });
}

#[test]
fn close_returns_item_to_blocked_inserter() {
    loom::model(|| {
        let buffer = Arc::new(BoundedBuffer::new(1).unwrap());
        buffer.insert(1u32).unwrap();

        let inserter = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || buffer.insert(2))
        };

        buffer.close();
        assert_eq!(inserter.join().unwrap(), Err(InsertError(2)));
        assert_eq!(buffer.remove(), Ok(1));
    });
}
