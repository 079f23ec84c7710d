//! The blocking bounded buffer.
//!
//! A classic monitor: one mutex guards the ring and the `closed` flag, and two
//! condition variables gate the blocking paths.
//!
//! ```text
//! insert(item)                        remove()
//! ─────────────────────────           ─────────────────────────
//! lock                                lock
//! while full && !closed:              while empty && !closed:
//!     wait(not_full)                      wait(not_empty)
//! closed? -> Err(item)                empty && closed? -> Err
//! ring.push(item)                     item = ring.pop()
//! unlock                              unlock
//! notify_all(not_empty)               notify_all(not_full)
//! ```
//!
//! Every wake re-checks the predicate under the lock, so when one item lands
//! and several removers wake, exactly one of them gets it and the rest go
//! back to sleep.

use std::fmt;
#[cfg(not(loom))]
use std::time::{Duration, Instant};

use crate::error::{CapacityError, InsertError, RemoveError, TryInsertError, TryRemoveError};
#[cfg(not(loom))]
use crate::error::{InsertTimeoutError, RemoveTimeoutError};
use crate::ring::Ring;
use crate::sync::{Condvar, Mutex, MutexGuard};
use crate::trace::{debug, trace};

/// State guarded by the buffer's mutex.
struct State<T> {
    ring: Ring<T>,
    closed: bool,
}

/// A fixed-capacity FIFO shared between one producer and any number of consumers.
///
/// [`insert`](BoundedBuffer::insert) blocks while the buffer is full and
/// [`remove`](BoundedBuffer::remove) blocks while it is empty. Neither spins:
/// blocked callers sleep on a condition variable until the other side makes
/// progress or the buffer is [closed](BoundedBuffer::close).
///
/// The buffer is not `Clone`. Share it by reference (scoped threads) or
/// through an `Arc`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use depot_buffer::BoundedBuffer;
///
/// let buffer = Arc::new(BoundedBuffer::new(8).unwrap());
///
/// let consumer = {
///     let buffer = Arc::clone(&buffer);
///     thread::spawn(move || {
///         let mut received = Vec::new();
///         while let Ok(item) = buffer.remove() {
///             received.push(item);
///         }
///         received
///     })
/// };
///
/// for i in 0..100 {
///     buffer.insert(i).unwrap();
/// }
/// buffer.close();
///
/// assert_eq!(consumer.join().unwrap(), (0..100).collect::<Vec<_>>());
/// ```
pub struct BoundedBuffer<T> {
    state: Mutex<State<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl<T> BoundedBuffer<T> {
    /// Creates an empty buffer holding at most `capacity` items.
    ///
    /// Unlike power-of-two ring buffers, the capacity is exact.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use depot_buffer::BoundedBuffer;
    ///
    /// let buffer = BoundedBuffer::<u32>::new(10).unwrap();
    /// assert_eq!(buffer.capacity(), 10);
    ///
    /// assert!(BoundedBuffer::<u32>::new(0).is_err());
    /// ```
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        if capacity == 0 {
            return Err(CapacityError {
                requested: capacity,
            });
        }

        trace!(capacity, "bounded buffer created");

        Ok(Self {
            state: Mutex::new(State {
                ring: Ring::new(capacity),
                closed: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        })
    }

    /// Inserts an item, blocking while the buffer is full.
    ///
    /// On return the item is queued and visible to the next
    /// [`remove`](BoundedBuffer::remove).
    ///
    /// # Errors
    ///
    /// Returns [`InsertError`] carrying the item back if the buffer is closed,
    /// either before the call or while it was waiting for a free slot.
    pub fn insert(&self, item: T) -> Result<(), InsertError<T>> {
        let mut state = self.lock();
        let mut item = item;

        loop {
            if state.closed {
                return Err(InsertError(item));
            }

            match state.ring.push(item) {
                Ok(()) => break,
                Err(rejected) => {
                    item = rejected;
                    state = self.wait(&self.not_full, state);
                }
            }
        }

        drop(state);
        self.not_empty.notify_all();
        Ok(())
    }

    /// Attempts to insert an item without blocking.
    ///
    /// # Errors
    ///
    /// - [`TryInsertError::Full`] if every slot is occupied
    /// - [`TryInsertError::Closed`] if the buffer is closed
    ///
    /// # Example
    ///
    /// ```
    /// use depot_buffer::{BoundedBuffer, TryInsertError};
    ///
    /// let buffer = BoundedBuffer::new(1).unwrap();
    ///
    /// assert!(buffer.try_insert(1).is_ok());
    /// assert_eq!(buffer.try_insert(2), Err(TryInsertError::Full(2)));
    ///
    /// buffer.close();
    /// assert_eq!(buffer.try_insert(3), Err(TryInsertError::Closed(3)));
    /// ```
    pub fn try_insert(&self, item: T) -> Result<(), TryInsertError<T>> {
        let mut state = self.lock();

        if state.closed {
            return Err(TryInsertError::Closed(item));
        }

        state.ring.push(item).map_err(TryInsertError::Full)?;

        drop(state);
        self.not_empty.notify_all();
        Ok(())
    }

    /// Inserts an item, waiting at most `timeout` for a free slot.
    ///
    /// # Errors
    ///
    /// - [`InsertTimeoutError::Timeout`] if the buffer stayed full until the deadline
    /// - [`InsertTimeoutError::Closed`] if the buffer is closed
    #[cfg(not(loom))]
    pub fn insert_timeout(&self, item: T, timeout: Duration) -> Result<(), InsertTimeoutError<T>> {
        // A deadline past what `Instant` can represent never arrives.
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.lock();
        let mut item = item;

        loop {
            if state.closed {
                return Err(InsertTimeoutError::Closed(item));
            }

            match state.ring.push(item) {
                Ok(()) => break,
                Err(rejected) => item = rejected,
            }

            state = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(InsertTimeoutError::Timeout(item));
                    }
                    self.wait_timeout(&self.not_full, state, deadline - now)
                }
                None => self.wait(&self.not_full, state),
            };
        }

        drop(state);
        self.not_empty.notify_all();
        Ok(())
    }

    /// Removes the oldest item, blocking while the buffer is empty.
    ///
    /// Items come out in exactly the order they went in. After
    /// [`close`](BoundedBuffer::close), queued items can still be drained.
    ///
    /// # Errors
    ///
    /// Returns [`RemoveError`] once the buffer is closed and empty.
    pub fn remove(&self) -> Result<T, RemoveError> {
        let mut state = self.lock();

        let item = loop {
            if let Some(item) = state.ring.pop() {
                break item;
            }
            if state.closed {
                return Err(RemoveError);
            }
            state = self.wait(&self.not_empty, state);
        };

        drop(state);
        self.not_full.notify_all();
        Ok(item)
    }

    /// Attempts to remove the oldest item without blocking.
    ///
    /// # Errors
    ///
    /// - [`TryRemoveError::Empty`] if nothing is queued
    /// - [`TryRemoveError::Closed`] if the buffer is closed and empty
    ///
    /// # Example
    ///
    /// ```
    /// use depot_buffer::{BoundedBuffer, TryRemoveError};
    ///
    /// let buffer = BoundedBuffer::new(4).unwrap();
    /// assert_eq!(buffer.try_remove(), Err(TryRemoveError::Empty));
    ///
    /// buffer.insert("car").unwrap();
    /// buffer.close();
    ///
    /// assert_eq!(buffer.try_remove(), Ok("car"));
    /// assert_eq!(buffer.try_remove(), Err(TryRemoveError::Closed));
    /// ```
    pub fn try_remove(&self) -> Result<T, TryRemoveError> {
        let mut state = self.lock();

        let Some(item) = state.ring.pop() else {
            return Err(if state.closed {
                TryRemoveError::Closed
            } else {
                TryRemoveError::Empty
            });
        };

        drop(state);
        self.not_full.notify_all();
        Ok(item)
    }

    /// Removes the oldest item, waiting at most `timeout` for one to arrive.
    ///
    /// # Errors
    ///
    /// - [`RemoveTimeoutError::Timeout`] if the buffer stayed empty until the deadline
    /// - [`RemoveTimeoutError::Closed`] if the buffer is closed and empty
    #[cfg(not(loom))]
    pub fn remove_timeout(&self, timeout: Duration) -> Result<T, RemoveTimeoutError> {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.lock();

        let item = loop {
            if let Some(item) = state.ring.pop() {
                break item;
            }
            if state.closed {
                return Err(RemoveTimeoutError::Closed);
            }

            state = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(RemoveTimeoutError::Timeout);
                    }
                    self.wait_timeout(&self.not_empty, state, deadline - now)
                }
                None => self.wait(&self.not_empty, state),
            };
        };

        drop(state);
        self.not_full.notify_all();
        Ok(item)
    }

    /// Closes the buffer and wakes every blocked caller.
    ///
    /// After closing:
    /// - `insert` and its variants fail, handing the item back
    /// - `remove` and its variants keep draining queued items, then fail
    ///
    /// Returns `true` if this call closed the buffer, `false` if it was
    /// already closed.
    pub fn close(&self) -> bool {
        let mut state = self.lock();
        if state.closed {
            return false;
        }
        state.closed = true;

        debug!(
            capacity = self.capacity,
            queued = state.ring.len(),
            "bounded buffer closed"
        );

        drop(state);
        self.not_full.notify_all();
        self.not_empty.notify_all();
        true
    }

    /// Returns the maximum number of items the buffer can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of queued items.
    ///
    /// This is a snapshot: other threads may change it before the caller
    /// looks at the result.
    pub fn len(&self) -> usize {
        self.lock().ring.len()
    }

    /// Returns `true` if nothing is queued (snapshot).
    pub fn is_empty(&self) -> bool {
        self.lock().ring.is_empty()
    }

    /// Returns `true` if every slot is occupied (snapshot).
    pub fn is_full(&self) -> bool {
        self.lock().ring.is_full()
    }

    /// Returns `true` if [`close`](BoundedBuffer::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        // A panic while the lock is held means the ring may be half-updated.
        self.state.lock().unwrap_or_else(|_| poisoned())
    }

    fn wait<'a>(
        &self,
        condvar: &Condvar,
        guard: MutexGuard<'a, State<T>>,
    ) -> MutexGuard<'a, State<T>> {
        condvar.wait(guard).unwrap_or_else(|_| poisoned())
    }

    #[cfg(not(loom))]
    fn wait_timeout<'a>(
        &self,
        condvar: &Condvar,
        guard: MutexGuard<'a, State<T>>,
        timeout: Duration,
    ) -> MutexGuard<'a, State<T>> {
        match condvar.wait_timeout(guard, timeout) {
            Ok((guard, _)) => guard,
            Err(_) => poisoned(),
        }
    }
}

#[cold]
fn poisoned() -> ! {
    panic!("bounded buffer lock poisoned: a thread panicked while holding it")
}

impl<T> fmt::Debug for BoundedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("BoundedBuffer")
            .field("capacity", &self.capacity)
            .field("len", &state.ring.len())
            .field("closed", &state.closed)
            .finish_non_exhaustive()
    }
}
