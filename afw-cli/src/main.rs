//! AFW CLI - buffered and peekable stream utility
//!
//! Streams files through a fixed-capacity ring buffer: copy them, check
//! their leading bytes or characters without consuming them, and report
//! how the buffer was refilled.

mod commands;
mod utils;

use afw_core::{DEFAULT_CAPACITY, StreamConfig};
use clap::{Parser, Subcommand};
use commands::{CatOptions, PeekOptions, StatsOptions, cmd_cat, cmd_peek, cmd_stats};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "afw")]
#[command(author, version, about = "Stream files through a bounded ring buffer")]
#[command(long_about = "
afw reads files through a fixed-capacity circular buffer that is refilled
on demand. The buffer capacity also bounds how far ahead `peek` can look.

Examples:
  afw cat input.bin -o copy.bin
  afw peek archive.zip --hex 504b0304
  afw peek notes.txt '#!'
  afw peek legacy.txt 日本 --encoding shift_jis
  afw stats big.log --capacity 65536 --json
")]
struct Cli {
    /// Ring buffer capacity in units (bytes, or UTF-16 code units with --encoding)
    #[arg(
        short = 'c',
        long,
        global = true,
        env = "AFW_CAPACITY",
        default_value_t = DEFAULT_CAPACITY
    )]
    capacity: usize,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy a file through a buffered stream
    Cat {
        /// File to read
        file: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Units requested per read
        #[arg(long, default_value_t = 4096)]
        chunk: usize,

        /// Show progress bar (only when writing to a file)
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Check whether a file starts with a prefix, without consuming it
    Peek {
        /// File to inspect
        file: PathBuf,

        /// Prefix to compare (text, or hex bytes with --hex)
        prefix: String,

        /// Interpret the prefix as hex bytes, e.g. 504b0304
        #[arg(long, conflicts_with = "encoding")]
        hex: bool,

        /// Decode the file with this encoding and compare characters
        #[arg(short, long)]
        encoding: Option<String>,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Read a file to the end and report unit, line and refill counts
    Stats {
        /// File to read
        file: PathBuf,

        /// Decode the file with this encoding and count UTF-16 units
        #[arg(short, long)]
        encoding: Option<String>,

        /// Units requested per read
        #[arg(long, default_value_t = 4096)]
        chunk: usize,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose);

    let config = StreamConfig::new(cli.capacity);

    let result = match cli.command {
        Commands::Cat {
            file,
            output,
            chunk,
            progress,
        } => cmd_cat(
            &file,
            output.as_deref(),
            &config,
            &CatOptions { chunk, progress },
        ),
        Commands::Peek {
            file,
            prefix,
            hex,
            encoding,
            json,
        } => cmd_peek(
            &file,
            &prefix,
            &config,
            &PeekOptions {
                hex,
                encoding: encoding.as_deref(),
                json,
            },
        )
        .map(|matched| {
            if !matched {
                std::process::exit(2);
            }
        }),
        Commands::Stats {
            file,
            encoding,
            chunk,
            json,
        } => cmd_stats(
            &file,
            &config,
            &StatsOptions {
                encoding: encoding.as_deref(),
                chunk,
                json,
            },
        ),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
