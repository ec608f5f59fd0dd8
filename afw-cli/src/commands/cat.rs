//! Cat command implementation.

use crate::utils::create_progress_bar;
use afw_core::{BufferedPullStream, ReaderSource, StreamConfig};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Options for copying a file through a buffered stream.
pub struct CatOptions {
    pub chunk: usize,
    pub progress: bool,
}

pub fn cmd_cat(
    file: &Path,
    output: Option<&Path>,
    config: &StreamConfig,
    options: &CatOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let f = File::open(file)?;
    let total = f.metadata()?.len();
    let mut stream = BufferedPullStream::with_config(ReaderSource::new(f), config)?;

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    let pb = create_progress_bar(total, options.progress && output.is_some());
    let chunk = options.chunk.max(1);
    let mut buf = vec![0u8; chunk];
    let mut copied = 0u64;

    while let Some(n) = stream.read_bulk(&mut buf, 0, chunk)? {
        writer.write_all(&buf[..n])?;
        copied += n as u64;
        pb.set_position(copied);
    }
    writer.flush()?;
    pb.finish_and_clear();

    let stats = stream.stats();
    stream.close()?;

    tracing::info!(
        bytes = copied,
        refills = stats.refills,
        pulls = stats.pulls,
        "copied {}",
        file.display()
    );
    if let Some(path) = output {
        eprintln!("Copied {} bytes to {}", copied, path.display());
    }

    Ok(())
}
