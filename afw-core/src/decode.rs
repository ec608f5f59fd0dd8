//! Character pull source: decodes a byte reader into UTF-16 code units.
//!
//! Decoding is done by [`encoding_rs`]. A byte order mark at the start of the
//! input overrides the configured encoding, and malformed sequences are
//! replaced with U+FFFD.
//!
//! # Example
//!
//! ```
//! use afw_core::decode::DecodingSource;
//! use afw_core::stream::BufferedPullStream;
//! use afw_core::traits::SequentialRead;
//! use std::io::Cursor;
//!
//! // "日本" in Shift_JIS
//! let bytes = vec![0x93, 0xFA, 0x96, 0x7B];
//! let source = DecodingSource::for_label(Cursor::new(bytes), "shift_jis").unwrap();
//! let mut stream = BufferedPullStream::new(source).unwrap();
//!
//! let mut units = Vec::new();
//! stream.read_remaining(&mut units).unwrap();
//! assert_eq!(String::from_utf16(&units).unwrap(), "日本");
//! ```

use crate::error::{AfwError, Result};
use crate::source::{Pull, PullSource};
use encoding_rs::{CoderResult, Decoder, Encoding, UTF_8};
use std::fmt;
use std::io::{self, Read};

/// Size of the raw byte chunk read from the underlying reader.
const INPUT_CHUNK: usize = 8192;

/// A [`PullSource`] of UTF-16 code units decoded from a byte reader.
pub struct DecodingSource<R: Read> {
    reader: Option<R>,
    decoder: Decoder,
    /// Raw bytes read but not yet decoded live in `input[input_start..input_end]`.
    input: Vec<u8>,
    input_start: usize,
    input_end: usize,
    /// The reader returned end of file.
    reader_done: bool,
    /// The decoder has been flushed; nothing more will be produced.
    finished: bool,
    /// Low surrogate held back when the caller offered a single slot.
    pending: Option<u16>,
}

impl<R: Read> DecodingSource<R> {
    /// Create a new source decoding `reader` with `encoding`.
    pub fn new(reader: R, encoding: &'static Encoding) -> Self {
        Self {
            reader: Some(reader),
            decoder: encoding.new_decoder(),
            input: vec![0; INPUT_CHUNK],
            input_start: 0,
            input_end: 0,
            reader_done: false,
            finished: false,
            pending: None,
        }
    }

    /// Create a new UTF-8 decoding source.
    pub fn utf8(reader: R) -> Self {
        Self::new(reader, UTF_8)
    }

    /// Create a new source for an encoding label such as `"utf-8"` or `"shift_jis"`.
    ///
    /// # Errors
    ///
    /// Returns [`AfwError::UnknownEncoding`] if the label is not recognized.
    pub fn for_label(reader: R, label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| AfwError::unknown_encoding(label))?;
        Ok(Self::new(reader, encoding))
    }

    /// Get the encoding in effect (after BOM sniffing, once input has been seen).
    pub fn encoding(&self) -> &'static Encoding {
        self.decoder.encoding()
    }

    /// Check if the source has been closed.
    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    /// Decode into `dst`, which must hold at least two units.
    fn decode_into(&mut self, dst: &mut [u16]) -> io::Result<Pull> {
        loop {
            if self.input_start == self.input_end && !self.reader_done {
                let Some(reader) = self.reader.as_mut() else {
                    return Ok(Pull::End);
                };
                match reader.read(&mut self.input) {
                    Ok(0) => self.reader_done = true,
                    Ok(n) => {
                        self.input_start = 0;
                        self.input_end = n;
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(Pull::Idle),
                    Err(e) => return Err(e),
                }
            }

            let last = self.reader_done;
            let (result, read, written, _) = self.decoder.decode_to_utf16(
                &self.input[self.input_start..self.input_end],
                dst,
                last,
            );
            self.input_start += read;

            if last && result == CoderResult::InputEmpty {
                self.finished = true;
            }
            if written > 0 {
                return Ok(Pull::Data(written));
            }
            if self.finished {
                return Ok(Pull::End);
            }
            if result == CoderResult::OutputFull {
                return Ok(Pull::Idle);
            }
            // Input was consumed without output (BOM or a split sequence); read more.
        }
    }
}

impl<R: Read> PullSource for DecodingSource<R> {
    type Unit = u16;

    fn pull(&mut self, buf: &mut [u16]) -> io::Result<Pull> {
        if buf.is_empty() {
            return Ok(Pull::Idle);
        }
        if let Some(unit) = self.pending.take() {
            buf[0] = unit;
            return Ok(Pull::Data(1));
        }
        if self.finished {
            return Ok(Pull::End);
        }

        if buf.len() >= 2 {
            return self.decode_into(buf);
        }

        // A single slot may not fit a surrogate pair; decode into a pair and hold one back.
        let mut pair = [0u16; 2];
        match self.decode_into(&mut pair)? {
            Pull::Data(n) => {
                buf[0] = pair[0];
                if n == 2 {
                    self.pending = Some(pair[1]);
                }
                Ok(Pull::Data(1))
            }
            other => Ok(other),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        self.reader = None;
        self.finished = true;
        self.pending = None;
        Ok(())
    }
}

impl<R: Read> fmt::Debug for DecodingSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodingSource")
            .field("encoding", &self.decoder.encoding().name())
            .field("buffered_bytes", &(self.input_end - self.input_start))
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::BufferedPullStream;
    use crate::traits::SequentialRead;
    use std::io::Cursor;

    /// Hands out one byte per read call.
    struct Trickle(Cursor<Vec<u8>>);

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(1);
            self.0.read(&mut buf[..n])
        }
    }

    fn decode_all<S: PullSource<Unit = u16>>(source: S, capacity: usize) -> String {
        let mut stream = BufferedPullStream::with_capacity(source, capacity).unwrap();
        let mut units = Vec::new();
        stream.read_remaining(&mut units).unwrap();
        String::from_utf16(&units).unwrap()
    }

    #[test]
    fn test_decode_utf8() {
        let source = DecodingSource::utf8(Cursor::new("Grüße, 世界".as_bytes().to_vec()));
        assert_eq!(decode_all(source, 4), "Grüße, 世界");
    }

    #[test]
    fn test_decode_split_multibyte_sequences() {
        let text = "añb€c😀d";
        let source = DecodingSource::utf8(Trickle(Cursor::new(text.as_bytes().to_vec())));
        assert_eq!(decode_all(source, 3), text);
    }

    #[test]
    fn test_surrogate_pair_into_single_slot() {
        let mut source = DecodingSource::utf8(Cursor::new("😀".as_bytes().to_vec()));
        let expected: Vec<u16> = "😀".encode_utf16().collect();
        let mut slot = [0u16; 1];

        assert_eq!(source.pull(&mut slot).unwrap(), Pull::Data(1));
        assert_eq!(slot[0], expected[0]);
        assert_eq!(source.pull(&mut slot).unwrap(), Pull::Data(1));
        assert_eq!(slot[0], expected[1]);
        assert_eq!(source.pull(&mut slot).unwrap(), Pull::End);
    }

    #[test]
    fn test_bom_overrides_encoding() {
        let bytes = vec![0xFF, 0xFE, b'h', 0, b'i', 0];
        let mut source = DecodingSource::utf8(Cursor::new(bytes));
        let mut buf = [0u16; 8];
        assert_eq!(source.pull(&mut buf).unwrap(), Pull::Data(2));
        assert_eq!(&buf[..2], &[u16::from(b'h'), u16::from(b'i')]);
        assert_eq!(source.encoding(), encoding_rs::UTF_16LE);
    }

    #[test]
    fn test_shift_jis_label() {
        let bytes = vec![0x93, 0xFA, 0x96, 0x7B];
        let source = DecodingSource::for_label(Cursor::new(bytes), "Shift_JIS").unwrap();
        assert_eq!(decode_all(source, 8), "日本");
    }

    #[test]
    fn test_malformed_input_replaced() {
        let source = DecodingSource::utf8(Cursor::new(vec![b'a', 0xFF, b'b', 0xE6]));
        assert_eq!(decode_all(source, 8), "a\u{FFFD}b\u{FFFD}");
    }

    #[test]
    fn test_unknown_label() {
        let err = DecodingSource::for_label(Cursor::new(Vec::<u8>::new()), "no-such-charset")
            .unwrap_err();
        assert!(matches!(err, AfwError::UnknownEncoding { .. }));
    }

    #[test]
    fn test_empty_input_ends() {
        let mut source = DecodingSource::utf8(Cursor::new(Vec::<u8>::new()));
        let mut buf = [0u16; 4];
        assert_eq!(source.pull(&mut buf).unwrap(), Pull::End);
        assert_eq!(source.pull(&mut buf).unwrap(), Pull::End);
    }

    #[test]
    fn test_close_ends_input() {
        let mut source = DecodingSource::utf8(Cursor::new(b"abc".to_vec()));
        source.close().unwrap();
        assert!(source.is_closed());
        let mut buf = [0u16; 4];
        assert_eq!(source.pull(&mut buf).unwrap(), Pull::End);
    }
}
