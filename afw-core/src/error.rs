//! Error types for AFW buffer and stream operations.
//!
//! Errors fall into three groups, reported by [`AfwError::kind`]:
//!
//! - invalid arguments (bad capacity, bad offset/length, oversized peek)
//! - illegal state (dequeue from an empty buffer, enqueue into a full one)
//! - I/O failures raised by the underlying pull source
//!
//! End of input is not an error. Stream reads report it as `Ok(None)`.

use std::io;
use thiserror::Error;

/// Broad classification of an [`AfwError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed a value that can never be valid.
    InvalidArgument,
    /// The operation is not valid for the current buffer state.
    IllegalState,
    /// The pull source failed.
    Io,
}

/// The main error type for AFW operations.
#[derive(Debug, Error)]
pub enum AfwError {
    /// I/O error from the underlying pull source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Buffer capacity must be positive.
    #[error("Invalid capacity: {capacity} (must be greater than 0)")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },

    /// Offset/length pair does not fit the given array.
    #[error("Invalid range: offset {offset}, length {length} for array of length {array_len}")]
    InvalidRange {
        /// Requested start offset.
        offset: usize,
        /// Requested number of units.
        length: usize,
        /// Length of the array the range applies to.
        array_len: usize,
    },

    /// Peek request longer than the buffer can ever hold.
    #[error("Peek request exceeds buffer size: {requested} > {capacity}")]
    PeekTooLarge {
        /// Number of units requested.
        requested: usize,
        /// Buffer capacity.
        capacity: usize,
    },

    /// Dequeue from an empty ring buffer.
    #[error("Buffer underflow: ring buffer is empty")]
    Underflow,

    /// Enqueue into a ring buffer without enough free space.
    #[error("Buffer overflow: need {needed} free slots, have {available}")]
    Overflow {
        /// Number of slots needed.
        needed: usize,
        /// Number of slots free.
        available: usize,
    },

    /// Unrecognized character encoding label.
    #[error("Unknown encoding: {label}")]
    UnknownEncoding {
        /// The label that failed to resolve.
        label: String,
    },
}

/// Result type alias for AFW operations.
pub type Result<T> = std::result::Result<T, AfwError>;

impl AfwError {
    /// Create an invalid capacity error.
    pub fn invalid_capacity(capacity: usize) -> Self {
        Self::InvalidCapacity { capacity }
    }

    /// Create an invalid range error.
    pub fn invalid_range(offset: usize, length: usize, array_len: usize) -> Self {
        Self::InvalidRange {
            offset,
            length,
            array_len,
        }
    }

    /// Create a peek-too-large error.
    pub fn peek_too_large(requested: usize, capacity: usize) -> Self {
        Self::PeekTooLarge {
            requested,
            capacity,
        }
    }

    /// Create an overflow error.
    pub fn overflow(needed: usize, available: usize) -> Self {
        Self::Overflow { needed, available }
    }

    /// Create an unknown encoding error.
    pub fn unknown_encoding(label: impl Into<String>) -> Self {
        Self::UnknownEncoding {
            label: label.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::Underflow | Self::Overflow { .. } => ErrorKind::IllegalState,
            Self::InvalidCapacity { .. }
            | Self::InvalidRange { .. }
            | Self::PeekTooLarge { .. }
            | Self::UnknownEncoding { .. } => ErrorKind::InvalidArgument,
        }
    }
}

/// Check that `offset..offset + length` lies inside an array of `array_len` units.
///
/// A zero-length range is accepted at any offset up to `array_len`.
pub(crate) fn check_range(offset: usize, length: usize, array_len: usize) -> Result<()> {
    let fits = match offset.checked_add(length) {
        Some(end) => end <= array_len,
        None => false,
    };
    if !fits || (length > 0 && offset >= array_len) {
        return Err(AfwError::invalid_range(offset, length, array_len));
    }
    Ok(())
}
