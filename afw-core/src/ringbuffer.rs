//! Fixed-capacity ring buffer (circular FIFO) for bytes and UTF-16 code units.
//!
//! The buffer never grows. Producers must check [`RingBuffer::space`] before
//! enqueueing and consumers must check [`RingBuffer::len`] before dequeueing:
//! enqueue into a full buffer or dequeue from an empty one fails without
//! touching the buffer.
//!
//! # Example
//!
//! ```
//! use afw_core::ringbuffer::ByteRingBuffer;
//!
//! let mut ring = ByteRingBuffer::new(4).unwrap();
//! ring.enqueue_slice(b"abc").unwrap();
//! assert_eq!(ring.dequeue_one().unwrap(), b'a');
//! ring.enqueue_slice(b"de").unwrap(); // wraps around
//! assert!(ring.is_full());
//! assert!(ring.peek_slice(b"bcde").unwrap());
//! ```

use crate::config::DEFAULT_CAPACITY;
use crate::error::{AfwError, Result, check_range};
use std::fmt::Debug;

/// Element type a [`RingBuffer`] can hold.
///
/// Implemented for `u8` (bytes) and `u16` (UTF-16 code units).
pub trait Unit: Copy + Default + PartialEq + Debug + Send + Sync + 'static {}

impl Unit for u8 {}
impl Unit for u16 {}

/// Ring buffer of bytes.
pub type ByteRingBuffer = RingBuffer<u8>;

/// Ring buffer of UTF-16 code units.
pub type CharRingBuffer = RingBuffer<u16>;

/// A fixed-capacity FIFO using wrap-around indexing.
///
/// Invariants: `start < capacity`, `end < capacity`, `count <= capacity`
/// and `end == (start + count) % capacity`.
#[derive(Debug, Clone)]
pub struct RingBuffer<T: Unit> {
    /// Backing storage, `capacity` slots long.
    buffer: Vec<T>,
    /// Index of the oldest queued unit.
    start: usize,
    /// Index where the next unit is written.
    end: usize,
    /// Number of occupied slots.
    count: usize,
}

impl<T: Unit> RingBuffer<T> {
    /// Create a new ring buffer with the specified capacity.
    ///
    /// # Errors
    ///
    /// Returns [`AfwError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(AfwError::invalid_capacity(capacity));
        }
        Ok(Self::allocate(capacity))
    }

    /// Create a ring buffer with the default capacity (8192 units).
    pub fn with_default_capacity() -> Self {
        Self::allocate(DEFAULT_CAPACITY)
    }

    fn allocate(capacity: usize) -> Self {
        Self {
            buffer: vec![T::default(); capacity],
            start: 0,
            end: 0,
            count: 0,
        }
    }

    /// Get the capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Get the number of queued units.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Get the number of free slots.
    pub fn space(&self) -> usize {
        self.capacity() - self.count
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Check if the buffer is full.
    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Index `by` slots past `index`, wrapping. `by` never exceeds capacity.
    #[inline]
    fn advance(&self, index: usize, by: usize) -> usize {
        let next = index + by;
        if next >= self.capacity() {
            next - self.capacity()
        } else {
            next
        }
    }

    /// Remove and return the oldest unit.
    ///
    /// # Errors
    ///
    /// Returns [`AfwError::Underflow`] if the buffer is empty.
    pub fn dequeue_one(&mut self) -> Result<T> {
        if self.count == 0 {
            return Err(AfwError::Underflow);
        }
        let unit = self.buffer[self.start];
        self.start = self.advance(self.start, 1);
        self.count -= 1;
        Ok(unit)
    }

    /// Append one unit.
    ///
    /// # Errors
    ///
    /// Returns [`AfwError::Overflow`] if the buffer is full.
    pub fn enqueue_one(&mut self, unit: T) -> Result<()> {
        if self.is_full() {
            return Err(AfwError::overflow(1, 0));
        }
        self.buffer[self.end] = unit;
        self.end = self.advance(self.end, 1);
        self.count += 1;
        Ok(())
    }

    /// Append `length` units from `source[offset..]`.
    ///
    /// Either every unit is enqueued or none is.
    ///
    /// # Errors
    ///
    /// - [`AfwError::InvalidRange`] if the range does not fit `source`
    /// - [`AfwError::Overflow`] if `length` exceeds [`space`](Self::space)
    pub fn enqueue_bulk(&mut self, source: &[T], offset: usize, length: usize) -> Result<()> {
        check_range(offset, length, source.len())?;
        if length > self.space() {
            return Err(AfwError::overflow(length, self.space()));
        }
        if length == 0 {
            return Ok(());
        }

        let source = &source[offset..offset + length];
        let first = length.min(self.capacity() - self.end);
        self.buffer[self.end..self.end + first].copy_from_slice(&source[..first]);
        self.buffer[..length - first].copy_from_slice(&source[first..]);

        self.end = self.advance(self.end, length);
        self.count += length;
        Ok(())
    }

    /// Append every unit of `source`.
    pub fn enqueue_slice(&mut self, source: &[T]) -> Result<()> {
        self.enqueue_bulk(source, 0, source.len())
    }

    /// Move up to `dest.len()` of the oldest units into `dest`.
    ///
    /// Returns the number of units moved, which is zero when the buffer is empty.
    pub fn dequeue_into(&mut self, dest: &mut [T]) -> usize {
        let n = dest.len().min(self.count);
        let first = n.min(self.capacity() - self.start);
        dest[..first].copy_from_slice(&self.buffer[self.start..self.start + first]);
        dest[first..n].copy_from_slice(&self.buffer[..n - first]);

        self.start = self.advance(self.start, n);
        self.count -= n;
        n
    }

    /// Compare the next `length` queued units against `target[offset..offset + length]`
    /// without consuming them.
    ///
    /// Returns `false` when fewer than `length` units are queued; slots past
    /// the queued region are never compared.
    ///
    /// # Errors
    ///
    /// - [`AfwError::PeekTooLarge`] if `length` exceeds the capacity
    /// - [`AfwError::InvalidRange`] if the range does not fit `target`
    pub fn peek(&self, target: &[T], offset: usize, length: usize) -> Result<bool> {
        if length > self.capacity() {
            return Err(AfwError::peek_too_large(length, self.capacity()));
        }
        check_range(offset, length, target.len())?;
        if self.count < length {
            return Ok(false);
        }

        let target = &target[offset..offset + length];
        let first = length.min(self.capacity() - self.start);
        Ok(self.buffer[self.start..self.start + first] == target[..first]
            && self.buffer[..length - first] == target[first..])
    }

    /// Compare the next `target.len()` queued units against `target`.
    pub fn peek_slice(&self, target: &[T]) -> Result<bool> {
        self.peek(target, 0, target.len())
    }

    /// The queued units as two contiguous slices, oldest first.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let first = self.count.min(self.capacity() - self.start);
        (
            &self.buffer[self.start..self.start + first],
            &self.buffer[..self.count - first],
        )
    }

    /// Iterate over the queued units, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let (head, tail) = self.as_slices();
        head.iter().chain(tail.iter()).copied()
    }

    /// Reset to the empty state. Backing storage is left as is.
    pub fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
        self.count = 0;
    }
}

impl<T: Unit> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
