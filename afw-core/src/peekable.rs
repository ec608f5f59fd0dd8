//! Peekable pull stream: lookahead of up to one buffer's worth of units.
//!
//! # Example
//!
//! ```
//! use afw_core::peekable::PeekablePullStream;
//! use afw_core::source::MemorySource;
//!
//! let source = MemorySource::new(b"PK\x03\x04rest".to_vec());
//! let mut stream = PeekablePullStream::with_capacity(source, 16).unwrap();
//!
//! assert!(stream.peek_slice(b"PK\x03\x04").unwrap());
//! assert_eq!(stream.read_one().unwrap(), Some(b'P')); // nothing was consumed
//! ```

use crate::config::StreamConfig;
use crate::error::{AfwError, Result, check_range};
use crate::source::PullSource;
use crate::stream::{BufferedPullStream, StreamStats};
use crate::traits::{PeekRead, SequentialRead};

/// A [`BufferedPullStream`] that can compare upcoming units without consuming them.
///
/// Lookahead is bounded by the buffer capacity.
#[derive(Debug)]
pub struct PeekablePullStream<S: PullSource> {
    inner: BufferedPullStream<S>,
}

impl<S: PullSource> PeekablePullStream<S> {
    /// Create a new stream with the default capacity (8192 units).
    pub fn new(source: S) -> Result<Self> {
        Ok(Self {
            inner: BufferedPullStream::new(source)?,
        })
    }

    /// Create a new stream with the given buffer capacity.
    pub fn with_capacity(source: S, capacity: usize) -> Result<Self> {
        Ok(Self {
            inner: BufferedPullStream::with_capacity(source, capacity)?,
        })
    }

    /// Create a new stream from a [`StreamConfig`].
    pub fn with_config(source: S, config: &StreamConfig) -> Result<Self> {
        Ok(Self {
            inner: BufferedPullStream::with_config(source, config)?,
        })
    }

    /// Check whether the next `length` units equal `target[offset..offset + length]`.
    ///
    /// Refills first if fewer than `length` units are buffered. If the source
    /// ends before `length` units arrive the answer is `false`.
    ///
    /// # Errors
    ///
    /// - [`AfwError::PeekTooLarge`] if `length` exceeds the capacity
    /// - [`AfwError::InvalidRange`] if the range does not fit `target`
    /// - [`AfwError::Io`] if the source fails during refill
    pub fn peek(&mut self, target: &[S::Unit], offset: usize, length: usize) -> Result<bool> {
        if length > self.inner.capacity() {
            return Err(AfwError::peek_too_large(length, self.inner.capacity()));
        }
        check_range(offset, length, target.len())?;
        if self.inner.buffered() < length {
            self.inner.fill_buffer()?;
        }
        self.inner.ring().peek(target, offset, length)
    }

    /// Check whether the upcoming units start with `target`.
    pub fn peek_slice(&mut self, target: &[S::Unit]) -> Result<bool> {
        self.peek(target, 0, target.len())
    }

    /// Read a single unit. See [`BufferedPullStream::read_one`].
    pub fn read_one(&mut self) -> Result<Option<S::Unit>> {
        self.inner.read_one()
    }

    /// Read up to `length` units into `dest[offset..]`. See [`BufferedPullStream::read_bulk`].
    pub fn read_bulk(
        &mut self,
        dest: &mut [S::Unit],
        offset: usize,
        length: usize,
    ) -> Result<Option<usize>> {
        self.inner.read_bulk(dest, offset, length)
    }

    /// Close the stream and its source. See [`BufferedPullStream::close`].
    pub fn close(&mut self) -> Result<()> {
        self.inner.close()
    }

    /// Get the buffer capacity, which is also the peek limit.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Get the number of units buffered but not yet read.
    pub fn buffered(&self) -> usize {
        self.inner.buffered()
    }

    /// Check if the source has reported end of input (or the stream was closed).
    pub fn is_source_exhausted(&self) -> bool {
        self.inner.is_source_exhausted()
    }

    /// Check if the stream has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Get a reference to the underlying source.
    pub fn get_ref(&self) -> &S {
        self.inner.get_ref()
    }

    /// Get the refill counters.
    pub fn stats(&self) -> StreamStats {
        self.inner.stats()
    }

    /// Unwrap into the plain buffered stream, keeping buffered units.
    pub fn into_inner(self) -> BufferedPullStream<S> {
        self.inner
    }
}

impl<S: PullSource> From<BufferedPullStream<S>> for PeekablePullStream<S> {
    fn from(inner: BufferedPullStream<S>) -> Self {
        Self { inner }
    }
}

impl<S: PullSource> SequentialRead for PeekablePullStream<S> {
    type Unit = S::Unit;

    fn read_one(&mut self) -> Result<Option<S::Unit>> {
        self.inner.read_one()
    }

    fn read_bulk(
        &mut self,
        dest: &mut [S::Unit],
        offset: usize,
        length: usize,
    ) -> Result<Option<usize>> {
        self.inner.read_bulk(dest, offset, length)
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}

impl<S: PullSource> PeekRead for PeekablePullStream<S> {
    fn peek(&mut self, target: &[S::Unit], offset: usize, length: usize) -> Result<bool> {
        PeekablePullStream::peek(self, target, offset, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::source::{MemorySource, Pull};
    use std::io;

    /// Fails every pull.
    struct Unplugged;

    impl PullSource for Unplugged {
        type Unit = u8;

        fn pull(&mut self, _buf: &mut [u8]) -> io::Result<Pull> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer reset"))
        }
    }

    #[test]
    fn test_peek_before_read() {
        let source = MemorySource::new(b"ABCDEFGHIJ".to_vec());
        let mut stream = PeekablePullStream::with_capacity(source, 16).unwrap();

        assert!(stream.peek(b"ABC", 0, 3).unwrap());

        let mut out = [0u8; 10];
        assert_eq!(stream.read_bulk(&mut out, 0, 10).unwrap(), Some(10));
        assert_eq!(&out, b"ABCDEFGHIJ");
    }

    #[test]
    fn test_peek_mismatch_does_not_consume() {
        let source = MemorySource::new(b"hello".to_vec());
        let mut stream = PeekablePullStream::with_capacity(source, 8).unwrap();

        assert!(!stream.peek_slice(b"help").unwrap());
        assert_eq!(stream.buffered(), 5);
        assert_eq!(stream.read_one().unwrap(), Some(b'h'));
    }

    #[test]
    fn test_peek_refills_partially_drained_buffer() {
        let source = MemorySource::new(b"0123456789".to_vec()).with_max_chunk(3);
        let mut stream = PeekablePullStream::with_capacity(source, 4).unwrap();

        let mut out = [0u8; 3];
        assert_eq!(stream.read_bulk(&mut out, 0, 3).unwrap(), Some(3));
        assert_eq!(stream.buffered(), 1);

        // Needs "3" from the buffer plus "456" from the source, wrapping the ring.
        assert!(stream.peek_slice(b"3456").unwrap());
        assert_eq!(stream.read_one().unwrap(), Some(b'3'));
    }

    #[test]
    fn test_peek_full_capacity() {
        let source = MemorySource::new(b"abcdefgh".to_vec());
        let mut stream = PeekablePullStream::with_capacity(source, 4).unwrap();
        assert!(stream.peek_slice(b"abcd").unwrap());
    }

    #[test]
    fn test_peek_too_large() {
        let source = MemorySource::new(b"abcdefgh".to_vec());
        let mut stream = PeekablePullStream::with_capacity(source, 4).unwrap();

        let err = stream.peek_slice(b"abcde").unwrap_err();
        assert!(matches!(err, AfwError::PeekTooLarge { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("exceeds buffer size"));
        // Rejected before any refill.
        assert_eq!(stream.get_ref().pulls(), 0);
    }

    #[test]
    fn test_peek_invalid_range_rejected_before_refill() {
        let source = MemorySource::new(b"abcdefgh".to_vec());
        let mut stream = PeekablePullStream::with_capacity(source, 4).unwrap();

        let err = stream.peek(b"ab", 2, 1).unwrap_err();
        assert!(matches!(err, AfwError::InvalidRange { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(stream.get_ref().pulls(), 0);
        assert_eq!(stream.buffered(), 0);

        let mut stream = PeekablePullStream::with_capacity(Unplugged, 4).unwrap();
        let err = stream.peek(b"ab", 1, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        // A valid peek does reach the failing source.
        let err = stream.peek(b"ab", 0, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_peek_past_end_of_short_source() {
        let source = MemorySource::new(b"ab".to_vec());
        let mut stream = PeekablePullStream::with_capacity(source, 8).unwrap();

        assert!(!stream.peek_slice(b"abc").unwrap());
        assert!(stream.is_source_exhausted());
        assert!(stream.peek_slice(b"ab").unwrap());
    }

    #[test]
    fn test_peek_char_units() {
        let text: Vec<u16> = "héllo wörld".encode_utf16().collect();
        let source = MemorySource::new(text.clone());
        let mut stream = PeekablePullStream::with_capacity(source, 6).unwrap();

        let prefix: Vec<u16> = "héllo".encode_utf16().collect();
        assert!(stream.peek_slice(&prefix).unwrap());

        let mut out = Vec::new();
        stream.read_remaining(&mut out).unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn test_into_inner_keeps_buffered_units() {
        let source = MemorySource::new(b"xyz".to_vec());
        let mut stream = PeekablePullStream::with_capacity(source, 4).unwrap();
        assert!(stream.peek_slice(b"xy").unwrap());

        let mut inner = stream.into_inner();
        assert_eq!(inner.read_one().unwrap(), Some(b'x'));
    }

    #[test]
    fn test_peek_after_close() {
        let source = MemorySource::new(b"abc".to_vec());
        let mut stream = PeekablePullStream::with_capacity(source, 4).unwrap();
        stream.close().unwrap();

        assert!(!stream.peek_slice(b"a").unwrap());
        assert_eq!(stream.get_ref().pulls(), 0);
    }
}
