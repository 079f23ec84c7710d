//! The producing unit.

use std::time::Duration;

use depot_buffer::{BoundedBuffer, InsertError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::shutdown::ShutdownSignal;
use crate::vehicle::Vehicle;

/// Builds the next payload.
pub trait Factory<T> {
    /// Returns a freshly built item.
    fn make(&mut self) -> T;
}

impl<T, F: FnMut() -> T> Factory<T> for F {
    #[inline]
    fn make(&mut self) -> T {
        self()
    }
}

/// Builds cars and trucks with sequential serial numbers, choosing between
/// them with a fair coin.
#[derive(Debug, Clone)]
pub struct VehicleFactory {
    next_id: u32,
    rng: StdRng,
}

impl VehicleFactory {
    /// Seeds the coin from the OS.
    pub fn new(start_id: u32) -> Self {
        Self {
            next_id: start_id,
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeds the coin explicitly, making the car/truck sequence reproducible.
    pub fn seeded(start_id: u32, seed: u64) -> Self {
        Self {
            next_id: start_id,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Factory<Vehicle> for VehicleFactory {
    fn make(&mut self) -> Vehicle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        if self.rng.gen_bool(0.5) {
            Vehicle::car(id)
        } else {
            Vehicle::truck(id)
        }
    }
}

/// What a producer did before it stopped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProducerReport {
    /// Items that made it into the buffer.
    pub produced: u64,
    /// Items built but refused because the buffer was closed.
    pub rejected: u64,
}

/// Loop: build an item, insert it (blocking while full), pause.
///
/// Stops when the item limit is reached, the shutdown signal fires, or the
/// buffer is closed under it.
pub struct Producer<'a, T, F> {
    buffer: &'a BoundedBuffer<T>,
    factory: F,
    shutdown: ShutdownSignal,
    interval: Duration,
    limit: Option<u64>,
}

impl<'a, T, F: Factory<T>> Producer<'a, T, F> {
    /// Creates a producer with no pause and no item limit.
    pub fn new(buffer: &'a BoundedBuffer<T>, factory: F, shutdown: ShutdownSignal) -> Self {
        Self {
            buffer,
            factory,
            shutdown,
            interval: Duration::ZERO,
            limit: None,
        }
    }

    /// Pause after each insert.
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Stop after this many successful inserts.
    #[must_use]
    pub fn limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    /// Runs until a stop condition is met.
    pub fn run(mut self) -> ProducerReport {
        let mut report = ProducerReport::default();
        info!(limit = ?self.limit, interval = ?self.interval, "producer started");

        loop {
            if self.limit.is_some_and(|limit| report.produced >= limit) {
                debug!(produced = report.produced, "item limit reached");
                break;
            }
            if self.shutdown.is_triggered() {
                break;
            }

            let item = self.factory.make();
            match self.buffer.insert(item) {
                Ok(()) => {
                    report.produced += 1;
                    trace!(produced = report.produced, "item queued");
                }
                Err(InsertError(_refused)) => {
                    // The buffer only refuses once it is closed; the item is
                    // dropped here, never half-queued.
                    report.rejected += 1;
                    debug!("buffer closed, producer stopping");
                    break;
                }
            }

            if self.shutdown.wait(self.interval) {
                break;
            }
        }

        info!(
            produced = report.produced,
            rejected = report.rejected,
            "producer stopped"
        );
        report
    }
}
