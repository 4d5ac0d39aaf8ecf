use std::collections::HashMap;
use std::fmt;

use tokio::io::AsyncRead;

use crate::http::line::LineReader;
use crate::http::request::{HTTP_VERSION, Method, Request, canonical_header_key};

/// Value stored in `Request::host` when the client sends an empty `Host:`.
pub const DEFAULT_HOST: &str = "localhost";

/// Most header lines accepted in one request. Together with
/// [`MAX_LINE_LENGTH`](crate::http::line::MAX_LINE_LENGTH) this bounds the
/// size of a header block.
pub const MAX_HEADERS: usize = 100;

#[derive(Debug)]
pub enum ParseError {
    /// Stream closed before the first byte of a line
    EndOfStream,
    /// Stream closed in the middle of a line
    UnexpectedEof,
    /// Line not terminated by CRLF, or not UTF-8
    MalformedLine,
    LineTooLong,
    MalformedStartLine,
    UnsupportedMethod,
    InvalidTarget,
    UnsupportedProtocol,
    MalformedHeader,
    TooManyHeaders,
    MissingHost,
    Io(std::io::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EndOfStream => write!(f, "end of stream"),
            ParseError::UnexpectedEof => write!(f, "stream ended mid-request"),
            ParseError::MalformedLine => write!(f, "malformed line"),
            ParseError::LineTooLong => write!(f, "line too long"),
            ParseError::MalformedStartLine => write!(f, "malformed start line"),
            ParseError::UnsupportedMethod => write!(f, "unsupported method"),
            ParseError::InvalidTarget => write!(f, "target must start with '/'"),
            ParseError::UnsupportedProtocol => write!(f, "unsupported protocol version"),
            ParseError::MalformedHeader => write!(f, "malformed header"),
            ParseError::TooManyHeaders => write!(f, "too many header lines"),
            ParseError::MissingHost => write!(f, "missing Host header"),
            ParseError::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl std::error::Error for ParseError {}

/// Failure of the underlying stream rather than of the request itself.
#[derive(Debug)]
pub enum StreamError {
    /// Peer closed the connection without sending anything
    EndOfStream,
    Io(std::io::Error),
}

/// Result of trying to read one request off a connection.
#[derive(Debug)]
pub enum ParseOutcome {
    Complete(Request),
    /// The peer sent something that is not a valid request
    Invalid {
        error: ParseError,
        bytes_received: bool,
    },
    Stream(StreamError),
}

/// Reads the next request from `reader`.
pub async fn read_request<S>(reader: &mut LineReader<S>) -> ParseOutcome
where
    S: AsyncRead + Unpin,
{
    let start = reader.consumed();

    match parse_request(reader).await {
        Ok(request) => ParseOutcome::Complete(request),
        Err(ParseError::Io(e)) => ParseOutcome::Stream(StreamError::Io(e)),
        Err(ParseError::EndOfStream) if reader.consumed() == start => {
            ParseOutcome::Stream(StreamError::EndOfStream)
        }
        // The header block ended with the stream
        Err(ParseError::EndOfStream) => ParseOutcome::Invalid {
            error: ParseError::UnexpectedEof,
            bytes_received: true,
        },
        Err(error) => ParseOutcome::Invalid {
            error,
            bytes_received: reader.consumed() > start,
        },
    }
}

async fn parse_request<S>(reader: &mut LineReader<S>) -> Result<Request, ParseError>
where
    S: AsyncRead + Unpin,
{
    let start_line = reader.read_line().await?;
    let (method, path, version) = parse_start_line(&start_line)?;

    let mut headers = HashMap::new();
    let mut host = None;
    let mut close = false;
    let mut count = 0;

    loop {
        let line = reader.read_line().await?;
        if line.is_empty() {
            break;
        }

        count += 1;
        if count > MAX_HEADERS {
            return Err(ParseError::TooManyHeaders);
        }

        let (name, value) = parse_header_line(&line)?;

        match name.as_str() {
            "Host" => {
                host = Some(if value.is_empty() {
                    DEFAULT_HOST.to_string()
                } else {
                    value.to_string()
                });
            }
            "Connection" => close = value == "close",
            _ => {
                headers.insert(name, value.to_string());
            }
        }
    }

    let host = host.ok_or(ParseError::MissingHost)?;

    Ok(Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        host,
        close,
    })
}

fn parse_start_line(line: &str) -> Result<(Method, &str, &str), ParseError> {
    let mut parts = line.split_whitespace();

    let (Some(method), Some(path), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::MalformedStartLine);
    };

    let method = Method::from_str(method).ok_or(ParseError::UnsupportedMethod)?;

    if !path.starts_with('/') {
        return Err(ParseError::InvalidTarget);
    }

    if version != HTTP_VERSION {
        return Err(ParseError::UnsupportedProtocol);
    }

    Ok((method, path, version))
}

/// Splits `Name: value` into the canonical name and the trimmed value.
fn parse_header_line(line: &str) -> Result<(String, &str), ParseError> {
    let (key, value) = line.split_once(':').ok_or(ParseError::MalformedHeader)?;

    if !is_token(key) {
        return Err(ParseError::MalformedHeader);
    }

    Ok((canonical_header_key(key), value.trim()))
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}
