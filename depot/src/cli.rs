//! Command-line flags for the `depot` binary.

use std::time::Duration;

use clap::Parser;

use crate::config::{Config, DEFAULT_CAPACITY, DEFAULT_CONSUMERS, DEFAULT_START_ID};

/// Run a vehicle depot: one factory, a bounded yard, several dealers.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "depot", version)]
#[command(about = "One producer, many consumers, one bounded buffer")]
pub struct Cli {
    /// Slots in the shared buffer (must be greater than 7).
    #[arg(long, env = "DEPOT_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Number of consumer threads (at least 2).
    #[arg(long, env = "DEPOT_CONSUMERS", default_value_t = DEFAULT_CONSUMERS)]
    pub consumers: usize,

    /// Pause after each vehicle produced, in milliseconds.
    #[arg(long, default_value_t = 700)]
    pub produce_interval_ms: u64,

    /// Pause after each vehicle consumed, in milliseconds.
    #[arg(long, default_value_t = 700)]
    pub consume_interval_ms: u64,

    /// Serial number of the first vehicle.
    #[arg(long, default_value_t = DEFAULT_START_ID)]
    pub start_id: u32,

    /// Stop after producing this many vehicles.
    #[arg(long)]
    pub items: Option<u64>,

    /// Shut down after this many seconds.
    #[arg(long)]
    pub duration_secs: Option<u64>,

    /// Seed for the car/truck coin flip.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    /// Converts parsed flags into a [`Config`]. Validation happens later, in
    /// [`Runner::new`](crate::Runner::new).
    pub fn into_config(self) -> Config {
        Config {
            capacity: self.capacity,
            consumers: self.consumers,
            produce_interval: Duration::from_millis(self.produce_interval_ms),
            consume_interval: Duration::from_millis(self.consume_interval_ms),
            start_id: self.start_id,
            limit: self.items,
            duration: self.duration_secs.map(Duration::from_secs),
            seed: self.seed,
        }
    }
}
