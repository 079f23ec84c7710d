//! The consuming unit.

use std::time::Duration;

use depot_buffer::BoundedBuffer;
use tracing::{debug, info, warn};

use crate::shutdown::ShutdownSignal;
use crate::sink::Sink;

/// What a consumer did before it stopped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerReport {
    /// Consumer number, starting at 1.
    pub consumer: usize,
    /// Items removed from the buffer.
    pub consumed: u64,
    /// Items the sink failed to process. Counted in `consumed` as well.
    pub failed: u64,
}

/// Loop: remove an item (blocking while empty), hand it to the sink, pause.
///
/// A consumer stops only when the buffer is closed and drained. The shutdown
/// signal cuts its pauses short so the drain finishes quickly, but never
/// makes it abandon queued items.
pub struct Consumer<'a, T, S: ?Sized> {
    id: usize,
    buffer: &'a BoundedBuffer<T>,
    sink: &'a S,
    shutdown: ShutdownSignal,
    interval: Duration,
}

impl<'a, T, S: Sink<T> + ?Sized> Consumer<'a, T, S> {
    /// Creates consumer number `id` with no pause.
    pub fn new(
        id: usize,
        buffer: &'a BoundedBuffer<T>,
        sink: &'a S,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            id,
            buffer,
            sink,
            shutdown,
            interval: Duration::ZERO,
        }
    }

    /// Pause after each item.
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Runs until the buffer is closed and empty.
    pub fn run(self) -> ConsumerReport {
        let mut report = ConsumerReport {
            consumer: self.id,
            ..ConsumerReport::default()
        };
        info!(consumer = self.id, "consumer started");

        while let Ok(item) = self.buffer.remove() {
            report.consumed += 1;

            if let Err(err) = self.sink.process(self.id, item) {
                report.failed += 1;
                warn!(consumer = self.id, error = %err, "failed to process item");
            }

            // Skip the pause once shutdown is under way, but keep draining.
            if !self.shutdown.is_triggered() && self.shutdown.wait(self.interval) {
                debug!(consumer = self.id, "shutdown seen, draining");
            }
        }

        info!(
            consumer = self.id,
            consumed = report.consumed,
            failed = report.failed,
            "consumer stopped"
        );
        report
    }
}
