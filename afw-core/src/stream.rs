//! Buffered pull stream: a ring buffer refilled on demand from a [`PullSource`].
//!
//! The stream looks unbounded to the caller while holding at most
//! `capacity` units in memory. Refills are synchronous and happen inside
//! the read call that needs them.
//!
//! # Example
//!
//! ```
//! use afw_core::source::MemorySource;
//! use afw_core::stream::BufferedPullStream;
//!
//! let source = MemorySource::new(b"Hello, World!".to_vec());
//! let mut stream = BufferedPullStream::with_capacity(source, 4).unwrap();
//!
//! let mut out = [0u8; 16];
//! let mut total = 0;
//! while let Some(n) = stream.read_bulk(&mut out, total, 16 - total).unwrap() {
//!     total += n;
//! }
//! assert_eq!(&out[..total], b"Hello, World!");
//! assert_eq!(stream.read_one().unwrap(), None);
//! ```

use crate::config::{DEFAULT_CAPACITY, StreamConfig};
use crate::error::{AfwError, Result, check_range};
use crate::ringbuffer::RingBuffer;
use crate::source::{Pull, PullSource};
use crate::traits::SequentialRead;
use std::fmt;
use std::io;

/// Counters describing how a stream has consulted its source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Refill passes that consulted the source.
    pub refills: u64,
    /// Individual `pull` calls.
    pub pulls: u64,
    /// Pulls that produced nothing but did not end the input.
    pub idle_pulls: u64,
    /// Units received from the source.
    pub units_pulled: u64,
}

/// A sequential reader backed by a fixed-capacity ring buffer.
pub struct BufferedPullStream<S: PullSource> {
    /// The wrapped source; closed by [`close`](Self::close).
    source: S,
    /// Units pulled but not yet read.
    buffer: RingBuffer<S::Unit>,
    /// Reused destination for every pull.
    scratch: Vec<S::Unit>,
    /// Set once the source reports end of input; never cleared.
    source_exhausted: bool,
    closed: bool,
    stats: StreamStats,
}

impl<S: PullSource> BufferedPullStream<S> {
    /// Create a new stream with the default capacity (8192 units).
    pub fn new(source: S) -> Result<Self> {
        Self::with_capacity(source, DEFAULT_CAPACITY)
    }

    /// Create a new stream with the given buffer capacity.
    ///
    /// # Errors
    ///
    /// Returns [`AfwError::InvalidCapacity`] if `capacity` is zero.
    pub fn with_capacity(source: S, capacity: usize) -> Result<Self> {
        let buffer = RingBuffer::new(capacity)?;
        Ok(Self {
            source,
            buffer,
            scratch: vec![S::Unit::default(); capacity],
            source_exhausted: false,
            closed: false,
            stats: StreamStats::default(),
        })
    }

    /// Create a new stream from a [`StreamConfig`].
    pub fn with_config(source: S, config: &StreamConfig) -> Result<Self> {
        config.validate()?;
        Self::with_capacity(source, config.capacity)
    }

    /// Get the buffer capacity.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Get the number of units buffered but not yet read.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the source has reported end of input (or the stream was closed).
    pub fn is_source_exhausted(&self) -> bool {
        self.source_exhausted
    }

    /// Check if [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Get a reference to the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Get the refill counters.
    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub(crate) fn ring(&self) -> &RingBuffer<S::Unit> {
        &self.buffer
    }

    /// Pull from the source until the buffer is full or the source ends.
    ///
    /// Idle pulls are retried immediately. A source error is returned as is;
    /// units enqueued earlier in the same pass stay buffered.
    pub(crate) fn fill_buffer(&mut self) -> Result<()> {
        if self.source_exhausted {
            return Ok(());
        }

        let mut space = self.buffer.space();
        if space == 0 {
            return Ok(());
        }
        self.stats.refills += 1;

        while space > 0 {
            self.stats.pulls += 1;
            match self.source.pull(&mut self.scratch[..space])? {
                Pull::End => {
                    self.source_exhausted = true;
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        buffered = self.buffer.len(),
                        "pull source reached end of input"
                    );
                    break;
                }
                Pull::Idle | Pull::Data(0) => {
                    self.stats.idle_pulls += 1;
                }
                Pull::Data(n) if n > space => {
                    return Err(AfwError::Io(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("pull source reported {n} units for a {space}-unit buffer"),
                    )));
                }
                Pull::Data(n) => {
                    self.buffer.enqueue_bulk(&self.scratch, 0, n)?;
                    self.stats.units_pulled += n as u64;
                    space -= n;
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            buffered = self.buffer.len(),
            capacity = self.buffer.capacity(),
            exhausted = self.source_exhausted,
            "refilled ring buffer"
        );

        Ok(())
    }

    /// Read a single unit, refilling if the buffer is empty.
    ///
    /// # Returns
    ///
    /// `Ok(None)` at end of input.
    pub fn read_one(&mut self) -> Result<Option<S::Unit>> {
        if self.buffer.is_empty() {
            self.fill_buffer()?;
        }
        if self.buffer.is_empty() {
            return Ok(None);
        }
        self.buffer.dequeue_one().map(Some)
    }

    /// Read up to `length` units into `dest[offset..]`.
    ///
    /// Refills first when fewer than `length` units are buffered, then hands
    /// out whatever is buffered. A short count does not mean end of input.
    ///
    /// # Returns
    ///
    /// The number of units read, or `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// - [`AfwError::InvalidRange`] if the range does not fit `dest`
    /// - [`AfwError::Io`] if the source fails during refill
    pub fn read_bulk(
        &mut self,
        dest: &mut [S::Unit],
        offset: usize,
        length: usize,
    ) -> Result<Option<usize>> {
        check_range(offset, length, dest.len())?;
        if self.buffer.len() < length {
            self.fill_buffer()?;
        }
        if self.buffer.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.buffer.dequeue_into(&mut dest[offset..offset + length])))
    }

    /// Close the source, discard buffered units and mark the stream exhausted.
    ///
    /// Only the first call reaches the source; later calls return `Ok(())`.
    /// The stream is closed even if the source's own close fails.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.source_exhausted = true;
        self.buffer.clear();

        #[cfg(feature = "tracing")]
        tracing::debug!(stats = ?self.stats, "closing buffered pull stream");

        self.source.close().map_err(AfwError::from)
    }
}

impl<S: PullSource> SequentialRead for BufferedPullStream<S> {
    type Unit = S::Unit;

    fn read_one(&mut self) -> Result<Option<S::Unit>> {
        BufferedPullStream::read_one(self)
    }

    fn read_bulk(
        &mut self,
        dest: &mut [S::Unit],
        offset: usize,
        length: usize,
    ) -> Result<Option<usize>> {
        BufferedPullStream::read_bulk(self, dest, offset, length)
    }

    fn close(&mut self) -> Result<()> {
        BufferedPullStream::close(self)
    }
}

impl<S: PullSource + fmt::Debug> fmt::Debug for BufferedPullStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferedPullStream")
            .field("source", &self.source)
            .field("capacity", &self.buffer.capacity())
            .field("buffered", &self.buffer.len())
            .field("source_exhausted", &self.source_exhausted)
            .field("closed", &self.closed)
            .field("stats", &self.stats)
            .finish()
    }
}
