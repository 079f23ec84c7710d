//! Where consumed items end up.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Processes one item handed over by a consumer.
///
/// A sink is shared by every consumer, so implementations serialize any
/// output they produce. The buffer is never locked while a sink runs.
pub trait Sink<T> {
    /// Takes ownership of `item`, removed by consumer number `consumer`.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if the item could not be processed. The item has
    /// already left the buffer either way.
    fn process(&self, consumer: usize, item: T) -> Result<(), SinkError>;
}

/// A sink failed to process an item.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing the record failed.
    #[error("failed to write record: {0}")]
    Io(#[from] io::Error),

    /// The sink refused the item.
    #[error("item rejected: {0}")]
    Rejected(String),
}

/// Writes each item as a dealer record, one locked write per item.
///
/// ```text
///
/// ====== Dealer 2: ======
/// ID: 1001
/// Model: SAAB
/// Type: Car
/// Max Passengers: 4
/// ```
#[derive(Debug)]
pub struct ConsoleSink<W> {
    out: Mutex<W>,
}

impl ConsoleSink<io::Stdout> {
    /// A sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    /// A sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: fmt::Display, W: Write> Sink<T> for ConsoleSink<W> {
    fn process(&self, consumer: usize, item: T) -> Result<(), SinkError> {
        // Format before locking so the lock only covers the write itself.
        let record = format!("\n====== Dealer {consumer}: ======\n{item}\n");

        // A writer poisoned mid-record at worst leaves a torn line behind.
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(record.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Keeps every item, tagged with the consumer that took it, in arrival order.
#[derive(Debug)]
pub struct CollectSink<T> {
    items: Mutex<Vec<(usize, T)>>,
}

impl<T> CollectSink<T> {
    /// An empty collector.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Number of items collected so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns the collected `(consumer, item)` pairs.
    pub fn into_items(self) -> Vec<(usize, T)> {
        self.items.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(usize, T)>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for CollectSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Sink<T> for CollectSink<T> {
    fn process(&self, consumer: usize, item: T) -> Result<(), SinkError> {
        self.lock().push((consumer, item));
        Ok(())
    }
}
