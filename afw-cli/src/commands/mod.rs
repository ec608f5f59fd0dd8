//! Command implementations for the AFW CLI.

pub mod cat;
pub mod peek;
pub mod stats;

pub use cat::{CatOptions, cmd_cat};
pub use peek::{PeekOptions, cmd_peek};
pub use stats::{StatsOptions, cmd_stats};
