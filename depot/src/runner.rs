//! Wires one producer and N consumers to a shared buffer and supervises them.
//!
//! ```text
//!                      ┌────────────────────┐      ┌──────────────────┐
//!                  ┌──>│ depot-consumer-1   │─────>│                  │
//! ┌──────────────┐ │   └────────────────────┘      │                  │
//! │depot-producer│─┤   ┌────────────────────┐      │      Sink        │
//! │  (Factory)   │ ├──>│ depot-consumer-2   │─────>│                  │
//! └──────────────┘ │   └────────────────────┘      │                  │
//!        │         └──>        ...          ─────> │                  │
//!        v                                         └──────────────────┘
//!   BoundedBuffer (borrowed by every unit, owned by the runner)
//! ```
//!
//! All units run in a `crossbeam-utils` scope, so the buffer cannot be dropped
//! while any of them still holds a reference to it.
//!
//! Shutdown order:
//! 1. The producer stops (item limit, shutdown signal, or closed buffer).
//! 2. The producer's guard closes the buffer.
//! 3. Consumers drain what is left, see the buffer closed and empty, and stop.
//! 4. The scope joins every unit.

use std::io;

use crossbeam_channel::select;
use crossbeam_utils::thread::{self, Scope, ScopedJoinHandle};
use depot_buffer::BoundedBuffer;
use thiserror::Error;
use tracing::{error, info};

use crate::config::{Config, ConfigError};
use crate::consumer::{Consumer, ConsumerReport};
use crate::producer::{Factory, Producer, ProducerReport, VehicleFactory};
use crate::shutdown::Shutdown;
use crate::sink::{ConsoleSink, Sink};

/// Runs the pipeline described by a validated [`Config`].
#[derive(Debug, Clone)]
pub struct Runner {
    config: Config,
}

/// Totals from a finished run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Items inserted by the producer.
    pub produced: u64,
    /// Items the producer built but could not insert.
    pub rejected: u64,
    /// One report per consumer, in consumer order.
    pub consumers: Vec<ConsumerReport>,
    /// Items still queued when every unit had stopped.
    pub left_in_buffer: usize,
}

impl RunReport {
    /// Items removed across all consumers.
    pub fn consumed(&self) -> u64 {
        self.consumers.iter().map(|c| c.consumed).sum()
    }

    /// Items a sink failed to process, across all consumers.
    pub fn failed(&self) -> u64 {
        self.consumers.iter().map(|c| c.failed).sum()
    }
}

/// Why a run could not complete.
#[derive(Debug, Error)]
pub enum RunError {
    /// The configuration was refused.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The OS refused to start a unit thread.
    #[error("failed to spawn {unit} thread")]
    Spawn {
        /// Thread name.
        unit: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A unit thread panicked.
    #[error("{unit} thread panicked")]
    UnitPanicked {
        /// Thread name.
        unit: String,
    },
}

const PRODUCER_THREAD: &str = "depot-producer";
const TIMER_THREAD: &str = "depot-timer";

impl Runner {
    /// Validates `config` and prepares a runner.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration breaks the depot's policy.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this runner was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the vehicle depot, printing each vehicle to standard output.
    ///
    /// # Errors
    ///
    /// See [`run_with`](Runner::run_with).
    pub fn run(&self, shutdown: &Shutdown) -> Result<RunReport, RunError> {
        let factory = match self.config.seed {
            Some(seed) => VehicleFactory::seeded(self.config.start_id, seed),
            None => VehicleFactory::new(self.config.start_id),
        };
        self.run_with(factory, &ConsoleSink::stdout(), shutdown)
    }

    /// Runs one producer fed by `factory` and the configured number of
    /// consumers feeding `sink`, until the producer stops and the buffer is
    /// drained.
    ///
    /// Triggering `shutdown` stops the producer and cuts every pause short;
    /// consumers then drain the buffer and exit.
    ///
    /// # Errors
    ///
    /// - [`RunError::Spawn`] if a unit thread could not be started
    /// - [`RunError::UnitPanicked`] if a unit thread panicked
    pub fn run_with<T, F, S>(
        &self,
        factory: F,
        sink: &S,
        shutdown: &Shutdown,
    ) -> Result<RunReport, RunError>
    where
        T: Send,
        F: Factory<T> + Send,
        S: Sink<T> + Sync + ?Sized,
    {
        let config = &self.config;
        let buffer = BoundedBuffer::new(config.capacity).map_err(ConfigError::from)?;

        info!(
            capacity = config.capacity,
            consumers = config.consumers,
            limit = ?config.limit,
            duration = ?config.duration,
            "depot starting"
        );

        let outcome = thread::scope(|s| -> Result<RunReport, RunError> {
            let buffer = &buffer;
            // Dropped when this closure returns, releasing the timer.
            let (_done_tx, done_rx) = crossbeam_channel::bounded::<()>(0);

            if let Some(duration) = config.duration {
                spawn_unit(s, TIMER_THREAD.to_string(), move |_| {
                    select! {
                        recv(done_rx) -> _ => {},
                        recv(crossbeam_channel::after(duration)) -> _ => {
                            info!(?duration, "run duration elapsed");
                            shutdown.trigger();
                        },
                    }
                })?;
            }

            let signal = shutdown.signal();
            let producer = spawn_unit(s, PRODUCER_THREAD.to_string(), move |_| {
                let _close = CloseGuard::always(buffer);
                Producer::new(buffer, factory, signal)
                    .interval(config.produce_interval)
                    .limit(config.limit)
                    .run()
            })?;

            let mut consumers = Vec::with_capacity(config.consumers);
            for id in 1..=config.consumers {
                let signal = shutdown.signal();
                let spawned = spawn_unit(s, format!("depot-consumer-{id}"), move |_| {
                    let _close = CloseGuard::on_panic(buffer);
                    Consumer::new(id, buffer, sink, signal)
                        .interval(config.consume_interval)
                        .run()
                });

                match spawned {
                    Ok(handle) => consumers.push((id, handle)),
                    Err(err) => {
                        // Stop the units already running and join them, so
                        // their panics are still attributed by name.
                        buffer.close();
                        let _ = collect(producer, consumers);
                        return Err(err);
                    }
                }
            }

            collect(producer, consumers)
        });

        let mut report = match outcome {
            Ok(result) => result?,
            // Every other unit is joined explicitly inside the scope.
            Err(_) => {
                error!(unit = TIMER_THREAD, "unit panicked");
                return Err(RunError::UnitPanicked {
                    unit: TIMER_THREAD.to_string(),
                });
            }
        };
        report.left_in_buffer = buffer.len();

        info!(
            produced = report.produced,
            rejected = report.rejected,
            consumed = report.consumed(),
            failed = report.failed(),
            left_in_buffer = report.left_in_buffer,
            "depot stopped"
        );
        Ok(report)
    }
}

/// Joins every unit and folds their reports, surfacing the first panic.
fn collect(
    producer: ScopedJoinHandle<'_, ProducerReport>,
    consumers: Vec<(usize, ScopedJoinHandle<'_, ConsumerReport>)>,
) -> Result<RunReport, RunError> {
    let mut panicked = None;
    let mut report = RunReport::default();

    match producer.join() {
        Ok(p) => {
            report.produced = p.produced;
            report.rejected = p.rejected;
        }
        Err(_) => {
            error!(unit = PRODUCER_THREAD, "unit panicked");
            panicked.get_or_insert_with(|| PRODUCER_THREAD.to_string());
        }
    }

    for (id, handle) in consumers {
        match handle.join() {
            Ok(c) => report.consumers.push(c),
            Err(_) => {
                let unit = format!("depot-consumer-{id}");
                error!(%unit, "unit panicked");
                panicked.get_or_insert(unit);
            }
        }
    }

    match panicked {
        Some(unit) => Err(RunError::UnitPanicked { unit }),
        None => Ok(report),
    }
}

fn spawn_unit<'scope, 'env, R, F>(
    s: &'scope Scope<'env>,
    name: String,
    f: F,
) -> Result<ScopedJoinHandle<'scope, R>, RunError>
where
    F: FnOnce(&Scope<'env>) -> R + Send + 'env,
    R: Send + 'env,
{
    s.builder()
        .name(name.clone())
        .spawn(f)
        .map_err(|source| RunError::Spawn { unit: name, source })
}

/// Closes the buffer when dropped, either always or only while unwinding.
///
/// The producer always closes on exit so consumers can finish. A consumer
/// closes only if it panics, so the producer cannot block forever on a buffer
/// nobody drains.
struct CloseGuard<'a, T> {
    buffer: &'a BoundedBuffer<T>,
    only_on_panic: bool,
}

impl<'a, T> CloseGuard<'a, T> {
    fn always(buffer: &'a BoundedBuffer<T>) -> Self {
        Self {
            buffer,
            only_on_panic: false,
        }
    }

    fn on_panic(buffer: &'a BoundedBuffer<T>) -> Self {
        Self {
            buffer,
            only_on_panic: true,
        }
    }
}

impl<T> Drop for CloseGuard<'_, T> {
    fn drop(&mut self) {
        if !self.only_on_panic || std::thread::panicking() {
            self.buffer.close();
        }
    }
}
