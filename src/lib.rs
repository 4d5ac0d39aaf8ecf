//! docserve - static file HTTP/1.1 server
//!
//! Core library for request parsing, resource resolution and the
//! per-connection protocol loop.

pub mod config;
pub mod http;
pub mod server;
