//! Error types for buffer operations.
//!
//! Every error that refuses a payload hands it back, so a closed or full
//! buffer never silently drops data.

use std::fmt;

/// The requested capacity was zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    /// The capacity that was requested.
    pub requested: usize,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer capacity must be at least 1, got {}", self.requested)
    }
}

impl std::error::Error for CapacityError {}

/// Error returned when [`BoundedBuffer::insert`] fails because the buffer is closed.
///
/// Contains the item that could not be inserted.
///
/// [`BoundedBuffer::insert`]: crate::BoundedBuffer::insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertError<T>(pub T);

impl<T> InsertError<T> {
    /// Returns the item that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer closed")
    }
}

impl<T: fmt::Debug> std::error::Error for InsertError<T> {}

/// Error returned when [`BoundedBuffer::remove`] fails.
///
/// The buffer has been closed and every queued item has been drained.
///
/// [`BoundedBuffer::remove`]: crate::BoundedBuffer::remove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveError;

impl fmt::Display for RemoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer closed and empty")
    }
}

impl std::error::Error for RemoveError {}

/// Error returned by [`BoundedBuffer::try_insert`].
///
/// [`BoundedBuffer::try_insert`]: crate::BoundedBuffer::try_insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryInsertError<T> {
    /// Every slot is occupied. The item is returned so it can be retried.
    Full(T),

    /// The buffer has been closed. The item is returned for cleanup.
    Closed(T),
}

impl<T> TryInsertError<T> {
    /// Returns the item that could not be inserted.
    pub fn into_inner(self) -> T {
        match self {
            TryInsertError::Full(v) | TryInsertError::Closed(v) => v,
        }
    }

    /// Returns `true` if this error is the `Full` variant.
    pub fn is_full(&self) -> bool {
        matches!(self, TryInsertError::Full(_))
    }

    /// Returns `true` if this error is the `Closed` variant.
    pub fn is_closed(&self) -> bool {
        matches!(self, TryInsertError::Closed(_))
    }
}

impl<T> fmt::Display for TryInsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryInsertError::Full(_) => write!(f, "buffer full"),
            TryInsertError::Closed(_) => write!(f, "buffer closed"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for TryInsertError<T> {}

/// Error returned by [`BoundedBuffer::try_remove`].
///
/// [`BoundedBuffer::try_remove`]: crate::BoundedBuffer::try_remove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryRemoveError {
    /// Nothing is queued, but an item may still arrive.
    Empty,

    /// The buffer has been closed and nothing is left to drain.
    Closed,
}

impl TryRemoveError {
    /// Returns `true` if this error is the `Empty` variant.
    pub fn is_empty(&self) -> bool {
        matches!(self, TryRemoveError::Empty)
    }

    /// Returns `true` if this error is the `Closed` variant.
    pub fn is_closed(&self) -> bool {
        matches!(self, TryRemoveError::Closed)
    }
}

impl fmt::Display for TryRemoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryRemoveError::Empty => write!(f, "buffer empty"),
            TryRemoveError::Closed => write!(f, "buffer closed and empty"),
        }
    }
}

impl std::error::Error for TryRemoveError {}

/// Error returned by [`BoundedBuffer::insert_timeout`].
///
/// [`BoundedBuffer::insert_timeout`]: crate::BoundedBuffer::insert_timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertTimeoutError<T> {
    /// No slot freed up before the deadline.
    Timeout(T),

    /// The buffer was closed before a slot freed up.
    Closed(T),
}

impl<T> InsertTimeoutError<T> {
    /// Returns the item that could not be inserted.
    pub fn into_inner(self) -> T {
        match self {
            InsertTimeoutError::Timeout(v) | InsertTimeoutError::Closed(v) => v,
        }
    }

    /// Returns `true` if this error is the `Timeout` variant.
    pub fn is_timeout(&self) -> bool {
        matches!(self, InsertTimeoutError::Timeout(_))
    }

    /// Returns `true` if this error is the `Closed` variant.
    pub fn is_closed(&self) -> bool {
        matches!(self, InsertTimeoutError::Closed(_))
    }
}

impl<T> fmt::Display for InsertTimeoutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertTimeoutError::Timeout(_) => write!(f, "timed out waiting for a free slot"),
            InsertTimeoutError::Closed(_) => write!(f, "buffer closed"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for InsertTimeoutError<T> {}

/// Error returned by [`BoundedBuffer::remove_timeout`].
///
/// [`BoundedBuffer::remove_timeout`]: crate::BoundedBuffer::remove_timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveTimeoutError {
    /// No item arrived before the deadline.
    Timeout,

    /// The buffer has been closed and nothing is left to drain.
    Closed,
}

impl RemoveTimeoutError {
    /// Returns `true` if this error is the `Timeout` variant.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RemoveTimeoutError::Timeout)
    }

    /// Returns `true` if this error is the `Closed` variant.
    pub fn is_closed(&self) -> bool {
        matches!(self, RemoveTimeoutError::Closed)
    }
}

impl fmt::Display for RemoveTimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoveTimeoutError::Timeout => write!(f, "timed out waiting for an item"),
            RemoveTimeoutError::Closed => write!(f, "buffer closed and empty"),
        }
    }
}

impl std::error::Error for RemoveTimeoutError {}
