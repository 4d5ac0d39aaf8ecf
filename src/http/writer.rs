use anyhow::Context;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

/// Size of each read from the body file.
pub const BODY_CHUNK_SIZE: usize = 8192;

/// Serializes the status line and header block of `resp`.
///
/// Headers are emitted sorted by name so the output does not depend on
/// insertion order.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        resp.version,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    let mut keys: Vec<&String> = resp.headers.keys().collect();
    keys.sort();

    for k in keys {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(resp.headers[k].as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

pub struct ResponseWriter<'a> {
    response: &'a Response,
    head: Vec<u8>,
}

impl<'a> ResponseWriter<'a> {
    pub fn new(response: &'a Response) -> Self {
        Self {
            response,
            head: serialize_head(response),
        }
    }

    /// Writes the head, then streams the body file if there is one.
    ///
    /// The body file is opened first, so a file that cannot be opened fails
    /// the call before anything reaches `stream`.
    pub async fn write_to_stream<W>(&self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let body = match &self.response.file_path {
            Some(path) => Some(
                File::open(path)
                    .await
                    .with_context(|| format!("failed to open {}", path.display()))?,
            ),
            None => None,
        };

        stream
            .write_all(&self.head)
            .await
            .context("failed to write response head")?;

        if let Some(mut file) = body {
            let mut chunk = vec![0u8; BODY_CHUNK_SIZE];
            loop {
                let n = file
                    .read(&mut chunk)
                    .await
                    .context("failed to read response body")?;
                if n == 0 {
                    break;
                }
                stream
                    .write_all(&chunk[..n])
                    .await
                    .context("failed to write response body")?;
            }
        }

        stream.flush().await.context("failed to flush response")?;
        Ok(())
    }
}
