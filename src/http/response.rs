use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::http::mime::mime_type_for;
use crate::http::request::{HTTP_VERSION, Request};
use crate::http::resolver::Resource;

/// HTTP status codes the server produces.
///
/// - `Ok` (200): File found and served
/// - `BadRequest` (400): Malformed or unusable request
/// - `NotFound` (404): No file for the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// ```
    /// # use docserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// An HTTP response ready to be written to a client.
///
/// The body is never held in memory: `file_path`, when set, names the file
/// whose bytes follow the header block.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub version: String,
    /// Headers keyed by canonical name
    pub headers: HashMap<String, String>,
    /// The request this answers; `None` for malformed requests
    pub request: Option<Request>,
    /// File to stream as the body; `None` means no body
    pub file_path: Option<PathBuf>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .file(path)
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HashMap<String, String>,
    request: Option<Request>,
    file_path: Option<PathBuf>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            request: None,
            file_path: None,
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn request(mut self, request: Request) -> Self {
        self.request = Some(request);
        self
    }

    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Builds the final Response, stamping it with the current `Date`.
    pub fn build(mut self) -> Response {
        self.headers
            .entry("Date".to_string())
            .or_insert_with(|| http_date(SystemTime::now()));

        Response {
            status: self.status,
            version: HTTP_VERSION.to_string(),
            headers: self.headers,
            request: self.request,
            file_path: self.file_path,
        }
    }
}

impl Response {
    /// 200 OK serving `resource` as the body.
    pub fn ok(request: Request, resource: &Resource) -> Self {
        let mut builder = ResponseBuilder::new(StatusCode::Ok)
            .header("Last-Modified", http_date(resource.modified))
            .header("Content-Type", mime_type_for(&resource.path))
            .header("Content-Length", resource.size.to_string());

        if request.close {
            builder = builder.header("Connection", "close");
        }

        builder.request(request).file(resource.path.clone()).build()
    }

    /// 400 Bad Request. Always closes the connection.
    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .header("Connection", "close")
            .build()
    }

    /// 404 Not Found, without a body.
    pub fn not_found(request: Request) -> Self {
        let mut builder = ResponseBuilder::new(StatusCode::NotFound);

        if request.close {
            builder = builder.header("Connection", "close");
        }

        builder.request(request).build()
    }

    /// Whether the connection must be closed once this response is written.
    pub fn closes_connection(&self) -> bool {
        self.headers
            .get("Connection")
            .is_some_and(|v| v == "close")
    }
}

/// Formats `time` as an HTTP date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn http_date(time: SystemTime) -> String {
    let datetime = DateTime::<Utc>::from(time);
    datetime.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
