//! Run configuration and its validation policy.
//!
//! The buffer itself only refuses a zero capacity. The depot is stricter: it
//! wants more than seven slots and at least two consumers.

use std::time::Duration;

use depot_buffer::CapacityError;
use thiserror::Error;

/// Smallest buffer capacity the depot accepts.
pub const MIN_CAPACITY: usize = 8;
/// Smallest number of consumers the depot accepts.
pub const MIN_CONSUMERS: usize = 2;

/// Buffer capacity used when none is given.
pub const DEFAULT_CAPACITY: usize = 10;
/// Number of consumers used when none is given.
pub const DEFAULT_CONSUMERS: usize = 4;
/// Pause between productions, and between consumptions, when none is given.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(700);
/// Serial number of the first vehicle.
pub const DEFAULT_START_ID: u32 = 1001;

/// Everything a [`Runner`](crate::Runner) needs to know before it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Slots in the shared buffer.
    pub capacity: usize,
    /// Number of consumer threads.
    pub consumers: usize,
    /// Pause after each production.
    pub produce_interval: Duration,
    /// Pause after each consumption.
    pub consume_interval: Duration,
    /// Serial number of the first vehicle.
    pub start_id: u32,
    /// Stop producing after this many items. `None` runs until shutdown.
    pub limit: Option<u64>,
    /// Trigger shutdown after this long. `None` runs until shutdown.
    pub duration: Option<Duration>,
    /// Seed for the vehicle generator. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            consumers: DEFAULT_CONSUMERS,
            produce_interval: DEFAULT_INTERVAL,
            consume_interval: DEFAULT_INTERVAL,
            start_id: DEFAULT_START_ID,
            limit: None,
            duration: None,
            seed: None,
        }
    }
}

impl Config {
    /// Checks the configuration against the depot's policy.
    ///
    /// # Errors
    ///
    /// Returns the first rule the configuration breaks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity < MIN_CAPACITY {
            return Err(ConfigError::Capacity(self.capacity));
        }
        if self.consumers < MIN_CONSUMERS {
            return Err(ConfigError::Consumers(self.consumers));
        }
        if self.limit == Some(0) {
            return Err(ConfigError::ZeroLimit);
        }
        if self.duration == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroDuration);
        }
        Ok(())
    }
}

/// A configuration the depot refuses to run with.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Buffer capacity below [`MIN_CAPACITY`].
    #[error("buffer capacity must be greater than {max}, got {0}", max = MIN_CAPACITY - 1)]
    Capacity(usize),

    /// Fewer consumers than [`MIN_CONSUMERS`].
    #[error("at least {min} consumers are required, got {0}", min = MIN_CONSUMERS)]
    Consumers(usize),

    /// An item limit of zero would produce nothing.
    #[error("item limit must be at least 1")]
    ZeroLimit,

    /// A run duration of zero would stop before starting.
    #[error("run duration must be non-zero")]
    ZeroDuration,

    /// The buffer refused its capacity.
    #[error(transparent)]
    Buffer(#[from] CapacityError),
}
