//! Interop with [`std::io`].
//!
//! Byte streams implement [`std::io::Read`], so they can be handed to
//! anything that takes a reader (`io::copy`, `BufReader`, decoders).
//! End of input maps to `Ok(0)`. A source I/O error comes back as the
//! original [`io::Error`]; every other [`AfwError`] becomes
//! [`io::ErrorKind::InvalidInput`].

use crate::error::AfwError;
use crate::peekable::PeekablePullStream;
use crate::source::PullSource;
use crate::stream::BufferedPullStream;
use std::io::{self, Read};

impl From<AfwError> for io::Error {
    fn from(err: AfwError) -> Self {
        match err {
            AfwError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidInput, other),
        }
    }
}

impl<S: PullSource<Unit = u8>> Read for BufferedPullStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let length = buf.len();
        Ok(self.read_bulk(buf, 0, length)?.unwrap_or(0))
    }
}

impl<S: PullSource<Unit = u8>> Read for PeekablePullStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let length = buf.len();
        Ok(self.read_bulk(buf, 0, length)?.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MemorySource, Pull, ReaderSource};
    use std::io::Cursor;

    struct Broken;

    impl PullSource for Broken {
        type Unit = u8;

        fn pull(&mut self, _buf: &mut [u8]) -> io::Result<Pull> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer reset"))
        }
    }

    #[test]
    fn test_io_copy_through_stream() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        let source = ReaderSource::new(Cursor::new(data.clone()));
        let mut stream = BufferedPullStream::with_capacity(source, 512).unwrap();

        let mut out = Vec::new();
        let copied = io::copy(&mut stream, &mut out).unwrap();
        assert_eq!(copied, 5000);
        assert_eq!(out, data);
    }

    #[test]
    fn test_read_to_end_after_peek() {
        let source = MemorySource::new(b"#!/bin/sh\necho hi\n".to_vec());
        let mut stream = PeekablePullStream::with_capacity(source, 8).unwrap();
        assert!(stream.peek_slice(b"#!").unwrap());

        let mut text = String::new();
        stream.read_to_string(&mut text).unwrap();
        assert_eq!(text, "#!/bin/sh\necho hi\n");
    }

    #[test]
    fn test_source_error_keeps_kind() {
        let mut stream = BufferedPullStream::with_capacity(Broken, 4).unwrap();
        let mut buf = [0u8; 4];
        let err = stream.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }

    #[test]
    fn test_other_errors_are_invalid_input() {
        let err: io::Error = AfwError::Underflow.into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_empty_read_does_not_pull() {
        let source = MemorySource::new(b"abc".to_vec());
        let mut stream = BufferedPullStream::with_capacity(source, 4).unwrap();
        assert_eq!(stream.read(&mut []).unwrap(), 0);
        assert_eq!(stream.get_ref().pulls(), 0);
    }
}
