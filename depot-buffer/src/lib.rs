//! # depot-buffer
//!
//! A bounded, blocking FIFO buffer for pipelines with one producer and many
//! consumers.
//!
//! ## Features
//!
//! - **Blocking put/take**: [`BoundedBuffer::insert`] waits while the buffer is
//!   full, [`BoundedBuffer::remove`] waits while it is empty. Waiting threads
//!   sleep on a condition variable; nothing spins.
//! - **Exact capacity**: the buffer holds exactly the number of items asked
//!   for, no power-of-two rounding.
//! - **Strict FIFO**: items leave in the order they arrived, whichever consumer
//!   takes them.
//! - **Shutdown path**: [`BoundedBuffer::close`] wakes every blocked caller with
//!   an error that tells it to stop. Queued items stay drainable.
//! - **Ownership handoff**: items move in on insert and move out on remove. A
//!   refused item is always handed back inside the error.
//!
//! ## Why a Lock
//!
//! With several consumers racing for the same slot, a lock-free design needs
//! per-slot sequence numbers and a CAS loop on the read side. A single mutex
//! with two condition variables is simpler and gives blocking for free:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │ Mutex<State>                                          │
//! │   ring: [slot 0][slot 1] ... [slot capacity-1]        │
//! │   head, tail, len, closed                             │
//! ├───────────────────────────────────────────────────────┤
//! │ not_full:  Condvar   <- inserters park here when full │
//! │ not_empty: Condvar   <- removers park here when empty │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Consumers process items after `remove` returns, outside the lock, so a slow
//! consumer never holds up the others.
//!
//! ## Example
//!
//! ```
//! use depot_buffer::{BoundedBuffer, RemoveError};
//! use std::thread;
//!
//! let buffer = BoundedBuffer::new(8).unwrap();
//!
//! thread::scope(|s| {
//!     for _ in 0..2 {
//!         s.spawn(|| {
//!             while let Ok(item) = buffer.remove() {
//!                 assert!(item < 20);
//!             }
//!         });
//!     }
//!
//!     for i in 0..20u32 {
//!         buffer.insert(i).unwrap();
//!     }
//!     buffer.close();
//! });
//!
//! assert_eq!(buffer.remove(), Err(RemoveError));
//! ```
//!
//! ## Testing with loom
//!
//! The lock and condition variables come from `loom` under `--cfg loom`:
//!
//! ```bash
//! RUSTFLAGS="--cfg loom" cargo test -p depot-buffer --test loom --release
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod buffer;
mod error;
mod ring;
mod sync;
mod trace;

pub use buffer::BoundedBuffer;
pub use error::{
    CapacityError, InsertError, InsertTimeoutError, RemoveError, RemoveTimeoutError,
    TryInsertError, TryRemoveError,
};
