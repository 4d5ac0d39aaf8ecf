use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::http::parser::ParseError;

/// Longest line (terminator included) accepted from a peer.
pub const MAX_LINE_LENGTH: usize = 8 * 1024;

/// Reads CRLF-terminated lines from a buffered byte stream.
///
/// The reader owns the connection stream for its whole lifetime; the write
/// side is reached through [`LineReader::get_mut`].
pub struct LineReader<S> {
    inner: BufReader<S>,
    line: BytesMut,
    consumed: u64,
}

impl<S: AsyncRead + Unpin> LineReader<S> {
    pub fn new(stream: S) -> Self {
        Self {
            inner: BufReader::new(stream),
            line: BytesMut::with_capacity(256),
            consumed: 0,
        }
    }

    /// Total number of bytes taken off the stream so far.
    ///
    /// Monotonic, so callers compare two readings to learn whether anything
    /// arrived in between.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn get_mut(&mut self) -> &mut S {
        self.inner.get_mut()
    }

    /// Reads one line and returns it without its `\r\n` terminator.
    ///
    /// Fails with `EndOfStream` if the stream ends before any byte of the
    /// line, `UnexpectedEof` if it ends mid-line, and `MalformedLine` if the
    /// line is terminated by a bare `\n` or is not UTF-8.
    pub async fn read_line(&mut self) -> Result<String, ParseError> {
        self.line.clear();

        loop {
            let available = self.inner.fill_buf().await.map_err(ParseError::Io)?;

            if available.is_empty() {
                return Err(if self.line.is_empty() {
                    ParseError::EndOfStream
                } else {
                    ParseError::UnexpectedEof
                });
            }

            let (chunk, done) = match available.iter().position(|&b| b == b'\n') {
                Some(i) => (&available[..=i], true),
                None => (available, false),
            };
            let n = chunk.len();
            let too_long = self.line.len() + n > MAX_LINE_LENGTH;
            if !too_long {
                self.line.extend_from_slice(chunk);
            }

            self.inner.consume(n);
            self.consumed += n as u64;

            if too_long {
                return Err(ParseError::LineTooLong);
            }
            if done {
                break;
            }
        }

        if !self.line.ends_with(b"\r\n") {
            return Err(ParseError::MalformedLine);
        }
        self.line.truncate(self.line.len() - 2);

        String::from_utf8(self.line.split().to_vec()).map_err(|_| ParseError::MalformedLine)
    }
}
