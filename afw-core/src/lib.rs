//! # AFW Core
//!
//! Bounded circular buffers and the stream adapters built on them.
//!
//! - [`ringbuffer`]: fixed-capacity FIFO for bytes (`u8`) or UTF-16 code units (`u16`)
//! - [`source`]: the [`PullSource`] contract plus reader and in-memory sources
//! - [`decode`]: a UTF-16 source decoding bytes with `encoding_rs`
//! - [`stream`]: [`BufferedPullStream`], sequential reads refilled from a source
//! - [`peekable`]: [`PeekablePullStream`], lookahead without consumption
//! - [`traits`]: [`SequentialRead`] and [`PeekRead`] capabilities
//! - [`config`]: stream configuration
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ PeekablePullStream   peek(target) without consuming     │
//! ├─────────────────────────────────────────────────────────┤
//! │ BufferedPullStream   read_one / read_bulk / close       │
//! ├───────────────────────────┬─────────────────────────────┤
//! │ RingBuffer<u8 | u16>      │ PullSource                  │
//! │ wrap-around FIFO          │ ReaderSource, DecodingSource│
//! └───────────────────────────┴─────────────────────────────┘
//! ```
//!
//! Everything is synchronous and single-threaded: a read blocks for as long
//! as the source's own `pull` blocks.
//!
//! ## Example
//!
//! ```rust
//! use afw_core::prelude::*;
//! use std::io::Cursor;
//!
//! let source = ReaderSource::new(Cursor::new(b"GIF89a...".to_vec()));
//! let mut stream = PeekablePullStream::with_capacity(source, 64).unwrap();
//!
//! assert!(stream.peek_slice(b"GIF8").unwrap());
//! let mut header = [0u8; 6];
//! assert_eq!(stream.read_bulk(&mut header, 0, 6).unwrap(), Some(6));
//! assert_eq!(&header, b"GIF89a");
//! ```
//!
//! ## Logging
//!
//! The library is silent by default. With the `tracing` feature, refills,
//! end of input and close are reported as `tracing` events.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod decode;
pub mod error;
pub mod io;
pub mod peekable;
pub mod ringbuffer;
pub mod source;
pub mod stream;
pub mod traits;

// Re-exports for convenience
pub use config::{DEFAULT_CAPACITY, StreamConfig};
pub use decode::DecodingSource;
pub use error::{AfwError, ErrorKind, Result};
pub use peekable::PeekablePullStream;
pub use ringbuffer::{ByteRingBuffer, CharRingBuffer, RingBuffer, Unit};
pub use source::{MemorySource, Pull, PullSource, ReaderSource};
pub use stream::{BufferedPullStream, StreamStats};
pub use traits::{PeekRead, SequentialRead};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::StreamConfig;
    pub use crate::decode::DecodingSource;
    pub use crate::error::{AfwError, Result};
    pub use crate::peekable::PeekablePullStream;
    pub use crate::ringbuffer::{ByteRingBuffer, CharRingBuffer, RingBuffer};
    pub use crate::source::{MemorySource, Pull, PullSource, ReaderSource};
    pub use crate::stream::BufferedPullStream;
    pub use crate::traits::{PeekRead, SequentialRead};
}
