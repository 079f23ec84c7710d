//! # depot
//!
//! A vehicle depot built on [`depot_buffer::BoundedBuffer`]: one factory
//! thread builds cars and trucks, a fixed-size yard holds them, and several
//! dealer threads take them away.
//!
//! ```text
//! producer ──insert──> [ bounded buffer ] ──remove──> consumer 1 ──> sink
//!                                          ──remove──> consumer 2 ──> sink
//!                                          ──remove──> consumer N ──> sink
//! ```
//!
//! The producer blocks when the yard is full, dealers block when it is
//! empty. Shutting down closes the yard: the producer stops, dealers drain
//! whatever is left, and every thread is joined before the yard is dropped.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//!
//! use depot::{CollectSink, Config, Runner, Shutdown};
//!
//! let config = Config {
//!     produce_interval: Duration::ZERO,
//!     consume_interval: Duration::ZERO,
//!     limit: Some(20),
//!     ..Config::default()
//! };
//!
//! let runner = Runner::new(config).unwrap();
//! let sink = CollectSink::new();
//! let mut next = 0;
//!
//! let report = runner
//!     .run_with(|| { next += 1; next }, &sink, &Shutdown::new())
//!     .unwrap();
//!
//! assert_eq!(report.produced, 20);
//! assert_eq!(report.consumed(), 20);
//! assert_eq!(sink.len(), 20);
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod consumer;
pub mod producer;
pub mod runner;
pub mod shutdown;
pub mod sink;
pub mod trace;
pub mod vehicle;

pub use cli::Cli;
pub use config::{Config, ConfigError};
pub use consumer::{Consumer, ConsumerReport};
pub use producer::{Factory, Producer, ProducerReport, VehicleFactory};
pub use runner::{RunError, RunReport, Runner};
pub use shutdown::{Shutdown, ShutdownSignal, trigger_on_interrupt};
pub use sink::{CollectSink, ConsoleSink, Sink, SinkError};
pub use vehicle::{Vehicle, VehicleKind};
