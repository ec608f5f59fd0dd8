//! Stats command implementation.

use afw_core::{BufferedPullStream, DecodingSource, PullSource, ReaderSource, StreamConfig};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// JSON output for stream statistics.
#[derive(Debug, Serialize, Deserialize)]
struct StatsReport {
    file: String,
    mode: String,
    units: u64,
    lines: u64,
    capacity: usize,
    refills: u64,
    pulls: u64,
    idle_pulls: u64,
}

/// Options for reading a file to the end.
pub struct StatsOptions<'a> {
    pub encoding: Option<&'a str>,
    pub chunk: usize,
    pub json: bool,
}

pub fn cmd_stats(
    file: &Path,
    config: &StreamConfig,
    options: &StatsOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let f = File::open(file)?;
    let chunk = options.chunk.max(1);

    let report = match options.encoding {
        Some(label) => {
            let source = DecodingSource::for_label(f, label)?;
            let mut stream = BufferedPullStream::with_config(source, config)?;
            let mut report = drain_counting(&mut stream, chunk, u16::from(b'\n'), file)?;
            report.mode = stream.get_ref().encoding().name().to_string();
            report
        }
        None => {
            let mut stream = BufferedPullStream::with_config(ReaderSource::new(f), config)?;
            drain_counting(&mut stream, chunk, b'\n', file)?
        }
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("File: {}", report.file);
        println!("Mode: {}", report.mode);
        println!("{:>12} units", report.units);
        println!("{:>12} lines", report.lines);
        println!(
            "{:>12} refills ({} pulls, {} idle) with capacity {}",
            report.refills, report.pulls, report.idle_pulls, report.capacity
        );
    }

    Ok(())
}

/// Read `stream` to the end, counting units and `newline` occurrences, then close it.
fn drain_counting<S: PullSource>(
    stream: &mut BufferedPullStream<S>,
    chunk: usize,
    newline: S::Unit,
    file: &Path,
) -> afw_core::Result<StatsReport> {
    let mut buf = vec![S::Unit::default(); chunk];
    let mut units = 0u64;
    let mut lines = 0u64;

    while let Some(n) = stream.read_bulk(&mut buf, 0, chunk)? {
        units += n as u64;
        lines += buf[..n].iter().filter(|&&u| u == newline).count() as u64;
    }

    let stats = stream.stats();
    stream.close()?;
    tracing::debug!(units, lines, ?stats, "drained stream");

    Ok(StatsReport {
        file: file.display().to_string(),
        mode: "bytes".to_string(),
        units,
        lines,
        capacity: stream.capacity(),
        refills: stats.refills,
        pulls: stats.pulls,
        idle_pulls: stats.idle_pulls,
    })
}
