//! The byte stream frames travel over
//!
//! The protocol is half duplex: write one frame, read one line back, repeat.
//! Opening and picking the device is left to the caller.

use std::io::{self, ErrorKind, Read, Write};

use tracing::debug;

use crate::command::{Command, ValidationPolicy};
use crate::error::Error;
use crate::frame::{Frame, TERMINATOR};

/// A duplex link to the synth
pub trait ByteStream {
    /// Write all of `bytes`
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Read up to and including the next newline
    ///
    /// The newline is not part of the returned bytes.
    fn read_line(&mut self) -> io::Result<Vec<u8>>;
}

/// [`ByteStream`] over anything that is [`Read`] + [`Write`], e.g. a serial port
///
/// Lines are read a byte at a time, so nothing past the newline is consumed
/// from the underlying reader.
#[derive(Debug)]
pub struct LineStream<T> {
    inner: T,
}

impl<T> LineStream<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + Write> ByteStream for LineStream<T> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)?;
        self.inner.flush()
    }

    fn read_line(&mut self) -> io::Result<Vec<u8>> {
        let mut line = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => {
                    return Err(io::Error::new(
                        ErrorKind::UnexpectedEof,
                        "link closed before end of line",
                    ));
                }
                Ok(_) if byte[0] == TERMINATOR => return Ok(line),
                Ok(_) => line.push(byte[0]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Sends commands to the synth one at a time
#[derive(Debug)]
pub struct Session<S> {
    stream: S,
    policy: ValidationPolicy,
}

impl<S: ByteStream> Session<S> {
    pub fn new(stream: S, policy: ValidationPolicy) -> Self {
        Self { stream, policy }
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Parse, encode and send operator input, returning the synth's reply
    pub fn submit(&mut self, raw: &str) -> Result<Vec<u8>, Error> {
        let command = Command::parse_with(raw, self.policy)?;
        self.send(&command)
    }

    /// Send an already validated command and wait for the reply line
    ///
    /// Encoding happens before anything is written, so a command that fails
    /// to encode never leaves a partial frame on the wire.
    pub fn send(&mut self, command: &Command) -> Result<Vec<u8>, Error> {
        let frame = Frame::encode(command)?;

        debug!(%command, %frame, "writing frame");
        self.stream.write(frame.as_bytes())?;

        let reply = self.stream.read_line()?;
        debug!(reply = %reply.escape_ascii(), "read reply");

        Ok(reply)
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EncodeError, ValidationError};
    use std::io::Cursor;

    /// Echoes back canned replies and records what was written
    #[derive(Default)]
    struct Loopback {
        written: Vec<u8>,
        replies: Cursor<Vec<u8>>,
    }

    impl Loopback {
        fn replying(replies: &[u8]) -> Self {
            Self {
                written: Vec::new(),
                replies: Cursor::new(replies.to_vec()),
            }
        }
    }

    impl Read for Loopback {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.replies.read(buf)
        }
    }

    impl Write for Loopback {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn read_line_stops_at_newline() {
        let mut stream = LineStream::new(Loopback::replying(b"734\nrest\n"));
        assert_eq!(stream.read_line().unwrap(), b"734");
        assert_eq!(stream.read_line().unwrap(), b"rest");

        let err = stream.read_line().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn submit_writes_one_frame_per_command() {
        let stream = LineStream::new(Loopback::replying(b"734\nF86\n"));
        let mut session = Session::new(stream, ValidationPolicy::Strict);

        assert_eq!(session.submit("7,3,sawtooth").unwrap(), b"734");
        assert_eq!(session.submit("15, 8, 6").unwrap(), b"F86");

        let loopback = session.into_inner().into_inner();
        assert_eq!(loopback.written, b"0734\n1586\n");
    }

    #[test]
    fn invalid_input_writes_nothing() {
        let stream = LineStream::new(Loopback::default());
        let mut session = Session::new(stream, ValidationPolicy::default());

        assert!(matches!(
            session.submit("5,3,hexagon"),
            Err(Error::Validation(ValidationError::UnknownShape(_)))
        ));
        assert!(matches!(
            session.submit("5,12,3"),
            Err(Error::Encode(EncodeError::Overflow { .. }))
        ));

        assert!(session.into_inner().get_ref().written.is_empty());
    }

    #[test]
    fn transport_errors_propagate() {
        let stream = LineStream::new(Loopback::default());
        let mut session = Session::new(stream, ValidationPolicy::Strict);

        match session.submit("1,1,1") {
            Err(Error::Transport(e)) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
            other => panic!("expected a transport error, got {other:?}"),
        }
    }
}
