//! HTTP protocol implementation.
//!
//! This module implements a small HTTP/1.1 server that answers `GET`
//! requests with files from a document root, with support for persistent
//! connections.
//!
//! # Architecture
//!
//! - **`line`**: Reads CRLF-terminated lines off the connection stream
//! - **`parser`**: Builds a validated request from those lines
//! - **`request`**: HTTP request representation and header name helpers
//! - **`resolver`**: Maps request targets to files under the document root
//! - **`response`**: The three responses the server produces (200, 400, 404)
//! - **`writer`**: Serializes a response and streams its body file
//! - **`mime`**: MIME type detection based on file extensions
//! - **`connection`**: The per-connection request/response state machine
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Arm read deadline, wait for a request
//!        └──────┬──────┘
//!               │ Request parsed          (malformed / partial timeout → 400)
//!               ▼                         (EOF / idle timeout → Closed)
//!        ┌──────────────────┐
//!        │   Processing     │ ← Resolve target, build 200 / 404 / 400
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Head, then file body in chunks
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Connection: close → Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use docserve::http::connection::Connection;
//! use std::{path::PathBuf, sync::Arc, time::Duration};
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let doc_root = Arc::new(PathBuf::from("/srv/www"));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let doc_root = doc_root.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, doc_root, Duration::from_secs(5));
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod line;
pub mod mime;
pub mod parser;
pub mod request;
pub mod resolver;
pub mod response;
pub mod writer;
