//! Peek command implementation.

use crate::utils::{describe_unit, parse_hex};
use afw_core::{DecodingSource, PeekablePullStream, PullSource, ReaderSource, StreamConfig};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// JSON output for a peek check.
#[derive(Debug, Serialize, Deserialize)]
struct PeekReport {
    file: String,
    /// "bytes", or the name of the decoding encoding.
    mode: String,
    prefix_units: usize,
    matched: bool,
    /// The first unit read after peeking, proving nothing was consumed.
    #[serde(skip_serializing_if = "Option::is_none")]
    first_unit: Option<u32>,
    capacity: usize,
}

/// Options for checking a file prefix.
pub struct PeekOptions<'a> {
    pub hex: bool,
    pub encoding: Option<&'a str>,
    pub json: bool,
}

/// Returns whether the file starts with `prefix`.
pub fn cmd_peek(
    file: &Path,
    prefix: &str,
    config: &StreamConfig,
    options: &PeekOptions,
) -> Result<bool, Box<dyn std::error::Error>> {
    let f = File::open(file)?;

    let report = match options.encoding {
        Some(label) => {
            let source = DecodingSource::for_label(f, label)?;
            let target: Vec<u16> = prefix.encode_utf16().collect();
            let mut stream = PeekablePullStream::with_config(source, config)?;
            let mut report = peek_stream(&mut stream, &target, file)?;
            report.mode = stream.get_ref().encoding().name().to_string();
            stream.close()?;
            report
        }
        None => {
            let target = if options.hex {
                parse_hex(prefix)?
            } else {
                prefix.as_bytes().to_vec()
            };
            let mut stream = PeekablePullStream::with_config(ReaderSource::new(f), config)?;
            let report = peek_stream(&mut stream, &target, file)?;
            stream.close()?;
            report
        }
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let wide = options.encoding.is_some();
        println!("File: {}", report.file);
        println!("Mode: {}", report.mode);
        println!("Prefix: {} units", report.prefix_units);
        println!("Match: {}", if report.matched { "yes" } else { "no" });
        match report.first_unit {
            Some(unit) => println!("First unit: {}", describe_unit(unit, wide)),
            None => println!("First unit: <end of input>"),
        }
    }

    Ok(report.matched)
}

fn peek_stream<S>(
    stream: &mut PeekablePullStream<S>,
    target: &[S::Unit],
    file: &Path,
) -> afw_core::Result<PeekReport>
where
    S: PullSource,
    S::Unit: Into<u32>,
{
    let matched = stream.peek_slice(target)?;
    tracing::debug!(matched, buffered = stream.buffered(), "peeked prefix");
    let first_unit = stream.read_one()?.map(<S::Unit as Into<u32>>::into);

    Ok(PeekReport {
        file: file.display().to_string(),
        mode: "bytes".to_string(),
        prefix_units: target.len(),
        matched,
        first_unit,
        capacity: stream.capacity(),
    })
}
