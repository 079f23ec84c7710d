//! Fixed-capacity circular storage.
//!
//! `Ring` has no synchronization of its own. [`BoundedBuffer`] owns one
//! behind its mutex and is the only caller.
//!
//! ```text
//!            head              tail
//!             v                 v
//! ┌──────┬──────┬──────┬──────┬──────┬──────┐
//! │ None │ Some │ Some │ Some │ None │ None │   len = 3, capacity = 6
//! └──────┴──────┴──────┴──────┴──────┴──────┘
//! ```
//!
//! The occupied region runs from `head` (inclusive) to `tail` (exclusive),
//! wrapping at `capacity`. `len` disambiguates `head == tail`, which is both
//! the empty and the full position.
//!
//! [`BoundedBuffer`]: crate::BoundedBuffer

use std::fmt;

pub(crate) struct Ring<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> Ring<T> {
    /// Creates an empty ring. `capacity` must be non-zero.
    pub(crate) fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be non-zero");
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Stores `item` at `tail`, or hands it back if every slot is taken.
    pub(crate) fn push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }

        let slot = &mut self.slots[self.tail];
        assert!(
            slot.is_none(),
            "ring corrupted: slot {} occupied at tail (head={}, len={})",
            self.tail,
            self.head,
            self.len
        );
        *slot = Some(item);

        self.tail = self.advance(self.tail);
        self.len += 1;
        self.check();
        Ok(())
    }

    /// Takes the item at `head`, leaving the slot empty.
    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let Some(item) = self.slots[self.head].take() else {
            panic!(
                "ring corrupted: slot {} empty at head (tail={}, len={})",
                self.head, self.tail, self.len
            );
        };

        self.head = self.advance(self.head);
        self.len -= 1;
        self.check();
        Some(item)
    }

    #[inline]
    fn advance(&self, index: usize) -> usize {
        (index + 1) % self.capacity()
    }

    #[inline]
    fn check(&self) {
        assert!(
            self.len <= self.capacity(),
            "ring corrupted: len {} exceeds capacity {}",
            self.len,
            self.capacity()
        );
        debug_assert_eq!(
            (self.head + self.len) % self.capacity(),
            self.tail,
            "ring corrupted: head/tail disagree with len"
        );
    }
}

impl<T> fmt::Debug for Ring<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // Basic Operations
    // ============================================================================

    #[test]
    fn push_pop_fifo() {
        let mut ring = Ring::new(4);

        ring.push(1).unwrap();
        ring.push(2).unwrap();
        ring.push(3).unwrap();

        assert_eq!(ring.len(), 3);
        assert_eq!(ring.pop(), Some(1));
        assert_eq!(ring.pop(), Some(2));
        assert_eq!(ring.pop(), Some(3));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn push_when_full_returns_item() {
        let mut ring = Ring::new(2);

        ring.push("a").unwrap();
        ring.push("b").unwrap();

        assert!(ring.is_full());
        assert_eq!(ring.push("c"), Err("c"));
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn pop_clears_slot() {
        let mut ring = Ring::new(3);

        ring.push(7).unwrap();
        ring.pop().unwrap();

        assert!(ring.slots.iter().all(Option::is_none));
    }

    // ============================================================================
    // Wraparound
    // ============================================================================

    #[test]
    fn indices_wrap_at_capacity() {
        let mut ring = Ring::new(3);

        for lap in 0..10 {
            for i in 0..3 {
                ring.push(lap * 3 + i).unwrap();
            }
            assert!(ring.is_full());
            assert_eq!(ring.head, ring.tail);

            for i in 0..3 {
                assert_eq!(ring.pop(), Some(lap * 3 + i));
            }
            assert!(ring.is_empty());
            assert_eq!(ring.head, ring.tail);
        }
    }

    #[test]
    fn occupied_slots_match_len() {
        let mut ring = Ring::new(5);
        let mut next_in = 0;
        let mut next_out = 0;

        // Two in, one out: the ring fills while head and tail lap around.
        for _ in 0..4 {
            ring.push(next_in).unwrap();
            ring.push(next_in + 1).unwrap();
            next_in += 2;
            assert_eq!(ring.pop(), Some(next_out));
            next_out += 1;

            let occupied = ring.slots.iter().filter(|s| s.is_some()).count();
            assert_eq!(occupied, ring.len());
        }
        ring.push(next_in).unwrap();
        next_in += 1;
        assert!(ring.is_full());

        while let Some(v) = ring.pop() {
            assert_eq!(v, next_out);
            next_out += 1;
        }
        assert_eq!(next_out, next_in);
    }

    #[test]
    fn capacity_one() {
        let mut ring = Ring::new(1);

        for i in 0..10 {
            ring.push(i).unwrap();
            assert_eq!(ring.push(99), Err(99));
            assert_eq!(ring.pop(), Some(i));
            assert_eq!(ring.pop(), None);
        }
    }

    // ============================================================================
    // Drop Behavior
    // ============================================================================

    #[test]
    fn queued_items_dropped_with_ring() {
        use std::rc::Rc;

        let tracker = Rc::new(());
        let mut ring = Ring::new(4);

        ring.push(Rc::clone(&tracker)).unwrap();
        ring.push(Rc::clone(&tracker)).unwrap();
        assert_eq!(Rc::strong_count(&tracker), 3);

        drop(ring);
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn zero_capacity_panics() {
        let _ = Ring::<u8>::new(0);
    }
}
