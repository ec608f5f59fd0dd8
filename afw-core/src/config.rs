//! Stream configuration.

use crate::error::{AfwError, Result};

/// Default ring buffer capacity in units (8 KiB for byte buffers).
pub const DEFAULT_CAPACITY: usize = 8192;

/// Configuration for buffered and peekable pull streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Ring buffer capacity in units. Also the peek limit.
    pub capacity: usize,
}

impl StreamConfig {
    /// Default configuration (8192-unit buffer).
    pub const DEFAULT: Self = Self {
        capacity: DEFAULT_CAPACITY,
    };

    /// Create a configuration with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Check that the configuration can build a stream.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(AfwError::invalid_capacity(self.capacity));
        }
        Ok(())
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
