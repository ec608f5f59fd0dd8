//! Pull sources: blocking, sequential producers of units.
//!
//! A [`PullSource`] is what a [`BufferedPullStream`](crate::stream::BufferedPullStream)
//! refills from. Each call to [`PullSource::pull`] reports one of three
//! outcomes:
//!
//! - [`Pull::Data`]: that many units were written to the front of the buffer
//! - [`Pull::Idle`]: nothing available right now, ask again
//! - [`Pull::End`]: the source is drained and will never produce more

use crate::ringbuffer::Unit;
use std::io::{self, Read};

/// Outcome of a single [`PullSource::pull`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    /// This many units were written into the buffer.
    Data(usize),
    /// No data right now; the caller may retry.
    Idle,
    /// No more data, ever.
    End,
}

/// A blocking source of units.
pub trait PullSource {
    /// The unit type this source produces.
    type Unit: Unit;

    /// Pull up to `buf.len()` units into the front of `buf`.
    ///
    /// # Errors
    ///
    /// Any I/O error from the underlying resource. Callers propagate it as is.
    fn pull(&mut self, buf: &mut [Self::Unit]) -> io::Result<Pull>;

    /// Release the underlying resource.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: PullSource + ?Sized> PullSource for Box<S> {
    type Unit = S::Unit;

    fn pull(&mut self, buf: &mut [Self::Unit]) -> io::Result<Pull> {
        (**self).pull(buf)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// A byte source over any [`std::io::Read`].
///
/// `Ok(0)` from the reader is end of input. [`io::ErrorKind::Interrupted`]
/// is reported as [`Pull::Idle`]. Closing drops the reader.
#[derive(Debug)]
pub struct ReaderSource<R: Read> {
    reader: Option<R>,
}

impl<R: Read> ReaderSource<R> {
    /// Create a new source wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
        }
    }

    /// Get a reference to the underlying reader, if not yet closed.
    pub fn get_ref(&self) -> Option<&R> {
        self.reader.as_ref()
    }

    /// Check if the source has been closed.
    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }
}

impl<R: Read> PullSource for ReaderSource<R> {
    type Unit = u8;

    fn pull(&mut self, buf: &mut [u8]) -> io::Result<Pull> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(Pull::End);
        };
        if buf.is_empty() {
            return Ok(Pull::Idle);
        }
        match reader.read(buf) {
            Ok(0) => Ok(Pull::End),
            Ok(n) => Ok(Pull::Data(n)),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(Pull::Idle),
            Err(e) => Err(e),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        self.reader = None;
        Ok(())
    }
}

/// An in-memory source, mostly useful for tests and for feeding prepared data.
///
/// Short reads and busy sources can be simulated with
/// [`with_max_chunk`](Self::with_max_chunk) and [`with_idle_every`](Self::with_idle_every).
#[derive(Debug, Clone)]
pub struct MemorySource<T: Unit> {
    data: Vec<T>,
    position: usize,
    max_chunk: usize,
    idle_every: usize,
    pulls: usize,
    closed: bool,
}

impl<T: Unit> MemorySource<T> {
    /// Create a new source that yields `data` and then ends.
    pub fn new(data: impl Into<Vec<T>>) -> Self {
        Self {
            data: data.into(),
            position: 0,
            max_chunk: usize::MAX,
            idle_every: 0,
            pulls: 0,
            closed: false,
        }
    }

    /// Limit every pull to at most `max_chunk` units (minimum 1).
    pub fn with_max_chunk(mut self, max_chunk: usize) -> Self {
        self.max_chunk = max_chunk.max(1);
        self
    }

    /// Report [`Pull::Idle`] on every `n`-th pull (0 disables).
    pub fn with_idle_every(mut self, n: usize) -> Self {
        self.idle_every = n;
        self
    }

    /// Number of times `pull` has been called.
    pub fn pulls(&self) -> usize {
        self.pulls
    }

    /// Number of units not yet handed out.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Check if the source has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<T: Unit> PullSource for MemorySource<T> {
    type Unit = T;

    fn pull(&mut self, buf: &mut [T]) -> io::Result<Pull> {
        self.pulls += 1;
        if self.closed {
            return Err(io::Error::other("source is closed"));
        }
        if self.idle_every > 0 && self.pulls % self.idle_every == 0 {
            return Ok(Pull::Idle);
        }
        if self.position >= self.data.len() {
            return Ok(Pull::End);
        }

        let n = buf.len().min(self.max_chunk).min(self.remaining());
        buf[..n].copy_from_slice(&self.data[self.position..self.position + n]);
        self.position += n;
        Ok(Pull::Data(n))
    }

    fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::other("source already closed"));
        }
        self.closed = true;
        Ok(())
    }
}
