use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::{Instant, timeout_at};

use crate::http::line::LineReader;
use crate::http::parser::{ParseOutcome, StreamError, read_request};
use crate::http::request::Request;
use crate::http::resolver::resolve;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// Read deadline used when none is configured.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// One client connection and the request/response loop running on it.
pub struct Connection<S> {
    reader: LineReader<S>,
    doc_root: Arc<PathBuf>,
    read_timeout: Duration,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(Response),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, doc_root: Arc<PathBuf>, read_timeout: Duration) -> Self {
        Self {
            reader: LineReader::new(stream),
            doc_root,
            read_timeout,
            state: ConnectionState::Reading,
        }
    }

    /// Serves requests until the peer goes away, asks to close, or sends
    /// something invalid.
    ///
    /// Protocol problems are answered on the wire and end in `Ok`. Only I/O
    /// failures on the stream itself are returned as errors.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = self.read_next().await?;
                }

                ConnectionState::Processing(req) => {
                    let response = self.handle_request(req).await;
                    self.state = ConnectionState::Writing(response);
                }

                ConnectionState::Writing(response) => {
                    ResponseWriter::new(&response)
                        .write_to_stream(self.reader.get_mut())
                        .await?;

                    tracing::debug!(
                        status = response.status.as_u16(),
                        path = response.request.as_ref().map(|r| r.path.as_str()),
                        "Response written"
                    );

                    if response.closes_connection() {
                        self.state = ConnectionState::Closed;
                    } else {
                        self.state = ConnectionState::Reading; // go back for next request
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Waits for the next request under a freshly armed deadline and decides
    /// where the session goes next.
    async fn read_next(&mut self) -> anyhow::Result<ConnectionState> {
        let deadline = Instant::now() + self.read_timeout;
        let mark = self.reader.consumed();

        let result = timeout_at(deadline, read_request(&mut self.reader)).await;
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(_) if self.reader.consumed() > mark => {
                tracing::debug!("Timed out with a partial request, rejecting");
                return Ok(ConnectionState::Writing(Response::bad_request()));
            }
            Err(_) => {
                tracing::debug!("Idle timeout, closing connection");
                return Ok(ConnectionState::Closed);
            }
        };

        match outcome {
            ParseOutcome::Complete(req) => {
                tracing::debug!(path = %req.path, host = %req.host, close = req.close, "Request received");
                Ok(ConnectionState::Processing(req))
            }
            ParseOutcome::Invalid {
                error,
                bytes_received,
            } => {
                tracing::debug!(error = %error, bytes_received, "Malformed request");
                Ok(ConnectionState::Writing(Response::bad_request()))
            }
            ParseOutcome::Stream(StreamError::EndOfStream) => {
                tracing::debug!("Peer closed connection");
                Ok(ConnectionState::Closed)
            }
            ParseOutcome::Stream(StreamError::Io(e)) => Err(e.into()),
        }
    }

    async fn handle_request(&self, req: Request) -> Response {
        // The parser never yields these, but a Request can be built by hand
        if req.host.is_empty() || !req.path.starts_with('/') {
            return Response::bad_request();
        }

        match resolve(&self.doc_root, &req.path).await {
            Some(resource) => Response::ok(req, &resource),
            None => Response::not_found(req),
        }
    }
}
