//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` takes precedence over the `-v` count.
pub fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Fails only if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Create a byte progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Parse a hex string such as `"504b0304"` or `"50 4B 03 04"` into bytes.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, String> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace() && *b != b':')
        .collect();
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in {:?}", text));
    }

    digits
        .chunks(2)
        .map(|pair| {
            let hi = hex_value(pair[0]);
            let lo = hex_value(pair[1]);
            match (hi, lo) {
                (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
                _ => Err(format!("invalid hex digits in {:?}", text)),
            }
        })
        .collect()
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

/// Render a unit for display: printable ASCII as is, everything else as hex.
pub fn describe_unit(unit: u32, wide: bool) -> String {
    match char::from_u32(unit) {
        Some(c) if c.is_ascii_graphic() || c == ' ' => format!("{:?}", c),
        _ if wide => format!("U+{:04X}", unit),
        _ => format!("0x{:02X}", unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("504b0304").unwrap(), vec![0x50, 0x4B, 0x03, 0x04]);
        assert_eq!(parse_hex("1F 8B").unwrap(), vec![0x1F, 0x8B]);
        assert_eq!(parse_hex("de:ad").unwrap(), vec![0xDE, 0xAD]);
        assert!(parse_hex("abc").is_err());
        assert!(parse_hex("zz").is_err());
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn test_describe_unit() {
        assert_eq!(describe_unit(u32::from(b'A'), false), "'A'");
        assert_eq!(describe_unit(0x1F, false), "0x1F");
        assert_eq!(describe_unit(0x65E5, true), "U+65E5");
    }
}
