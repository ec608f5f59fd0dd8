//! Capability traits for sequential and peekable readers.
//!
//! [`BufferedPullStream`](crate::stream::BufferedPullStream) implements
//! [`SequentialRead`]; [`PeekablePullStream`](crate::peekable::PeekablePullStream)
//! implements both traits by wrapping a buffered stream.

use crate::error::Result;
use crate::ringbuffer::Unit;

/// A sequential reader of units with an explicit end-of-input signal.
pub trait SequentialRead {
    /// The unit type produced by this reader.
    type Unit: Unit;

    /// Read a single unit.
    ///
    /// # Returns
    ///
    /// `Ok(None)` once the input is exhausted.
    fn read_one(&mut self) -> Result<Option<Self::Unit>>;

    /// Read up to `length` units into `dest[offset..]`.
    ///
    /// May return fewer units than requested even before end of input;
    /// callers loop until `Ok(None)`.
    ///
    /// # Returns
    ///
    /// The number of units read, or `Ok(None)` once the input is exhausted.
    fn read_bulk(
        &mut self,
        dest: &mut [Self::Unit],
        offset: usize,
        length: usize,
    ) -> Result<Option<usize>>;

    /// Close the reader and release its source.
    fn close(&mut self) -> Result<()>;

    /// Read up to `dest.len()` units into `dest`.
    fn read_slice(&mut self, dest: &mut [Self::Unit]) -> Result<Option<usize>> {
        let length = dest.len();
        self.read_bulk(dest, 0, length)
    }

    /// Read every remaining unit, appending to `out`.
    ///
    /// # Returns
    ///
    /// The number of units appended.
    fn read_remaining(&mut self, out: &mut Vec<Self::Unit>) -> Result<usize> {
        let mut chunk = vec![Self::Unit::default(); 4096];
        let mut total = 0;
        while let Some(n) = self.read_slice(&mut chunk)? {
            out.extend_from_slice(&chunk[..n]);
            total += n;
        }
        Ok(total)
    }
}

/// A [`SequentialRead`] that can look ahead without consuming.
pub trait PeekRead: SequentialRead {
    /// Check whether the next `length` units equal `target[offset..offset + length]`.
    ///
    /// Nothing is consumed, whatever the answer.
    fn peek(&mut self, target: &[Self::Unit], offset: usize, length: usize) -> Result<bool>;

    /// Check whether the upcoming units start with `target`.
    fn peek_slice(&mut self, target: &[Self::Unit]) -> Result<bool> {
        self.peek(target, 0, target.len())
    }
}
