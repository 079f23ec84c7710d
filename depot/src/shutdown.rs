//! Cooperative shutdown.
//!
//! The signal is a `crossbeam-channel` that never carries a message: once
//! [`Shutdown::trigger`] drops the only sender, every receiver sees the
//! channel disconnect. A unit pacing itself with
//! [`ShutdownSignal::wait`] wakes at that moment instead of sleeping out its
//! full interval.
//!
//! [`trigger_on_interrupt`] routes Ctrl-C to the same signal, so an
//! interrupted run drains the buffer like a timed one.

use std::process;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

/// Owner side of the shutdown signal.
///
/// Dropping it also triggers shutdown.
#[derive(Debug)]
pub struct Shutdown {
    sender: Mutex<Option<Sender<()>>>,
    receiver: Receiver<()>,
}

/// Observer side of the shutdown signal. Cheap to clone, one per unit.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    receiver: Receiver<()>,
}

impl Shutdown {
    /// Creates an untriggered shutdown signal.
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(0);
        Self {
            sender: Mutex::new(Some(sender)),
            receiver,
        }
    }

    /// Returns a new observer.
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            receiver: self.receiver.clone(),
        }
    }

    /// Fires the signal. Later calls do nothing.
    ///
    /// Returns `true` if this call fired it.
    pub fn trigger(&self) -> bool {
        // Only an `Option::take` happens under this lock, so a poisoned lock
        // still holds a consistent value.
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let fired = sender.is_some();
        if fired {
            tracing::info!("shutdown triggered");
        }
        fired
    }

    /// Returns `true` once [`trigger`](Shutdown::trigger) has been called.
    pub fn is_triggered(&self) -> bool {
        self.signal().is_triggered()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Triggers `shutdown` on Ctrl-C, and on `SIGTERM` where the platform has it.
///
/// The first interrupt starts a graceful stop. A second one exits the
/// process at once with status 130.
///
/// # Errors
///
/// Fails if the handler cannot be registered, or if one is already
/// installed in this process.
pub fn trigger_on_interrupt(shutdown: Arc<Shutdown>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        if !shutdown.trigger() {
            tracing::warn!("interrupted again, exiting without draining");
            process::exit(130);
        }
    })
}

impl ShutdownSignal {
    /// Returns `true` if shutdown has been triggered.
    pub fn is_triggered(&self) -> bool {
        matches!(self.receiver.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Sleeps for `timeout`, waking early if shutdown is triggered.
    ///
    /// Returns `true` if shutdown was triggered, `false` if the full interval
    /// elapsed.
    pub fn wait(&self, timeout: Duration) -> bool {
        matches!(
            self.receiver.recv_timeout(timeout),
            Err(RecvTimeoutError::Disconnected)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn wait_times_out_when_untriggered() {
        let shutdown = Shutdown::new();
        let signal = shutdown.signal();
        let start = Instant::now();

        assert!(!signal.wait(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert!(!signal.is_triggered());
    }

    #[test]
    fn trigger_wakes_waiter_early() {
        let shutdown = Shutdown::new();
        let signal = shutdown.signal();
        let start = Instant::now();

        let handle = thread::spawn(move || signal.wait(Duration::from_secs(10)));

        thread::sleep(Duration::from_millis(20));
        shutdown.trigger();

        assert!(handle.join().unwrap());
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn trigger_is_idempotent() {
        let shutdown = Shutdown::new();

        assert!(shutdown.trigger());
        assert!(!shutdown.trigger());

        assert!(shutdown.is_triggered());
        assert!(shutdown.signal().wait(Duration::from_secs(10)));
    }

    #[test]
    fn dropping_owner_triggers() {
        let shutdown = Shutdown::new();
        let signal = shutdown.signal();

        drop(shutdown);

        assert!(signal.is_triggered());
    }

    #[test]
    fn zero_wait_does_not_block() {
        let shutdown = Shutdown::new();
        assert!(!shutdown.signal().wait(Duration::ZERO));
    }

    #[test]
    fn interrupt_handler_installs_once() {
        let shutdown = Arc::new(Shutdown::new());

        trigger_on_interrupt(Arc::clone(&shutdown)).unwrap();
        assert!(!shutdown.is_triggered());

        assert!(matches!(
            trigger_on_interrupt(shutdown),
            Err(ctrlc::Error::MultipleHandlers)
        ));
    }
}
