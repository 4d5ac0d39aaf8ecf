use std::collections::HashMap;

/// The only protocol version the server speaks.
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// HTTP request methods.
///
/// The server only retrieves resources, so `GET` is the single method a
/// request can carry. Anything else is rejected while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// Method names are case-sensitive.
    ///
    /// ```
    /// # use docserve::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// assert_eq!(Method::from_str("POST"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
        }
    }
}

/// A parsed, validated HTTP request.
///
/// `Host` and `Connection` are never kept in `headers`; they are lifted into
/// `host` and `close`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// The request target, always starting with "/"
    pub path: String,
    /// Protocol version ("HTTP/1.1")
    pub version: String,
    /// Remaining headers, keyed by canonical name
    pub headers: HashMap<String, String>,
    /// Value of the Host header
    pub host: String,
    /// Whether the client sent `Connection: close`
    pub close: bool,
}

impl Request {
    /// Looks up a header by name, ignoring case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&canonical_header_key(key))
            .map(|v| v.as_str())
    }
}

/// Builder for constructing Request objects outside the parser.
pub struct RequestBuilder {
    path: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    host: Option<String>,
    close: bool,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            path: None,
            version: None,
            headers: HashMap::new(),
            host: None,
            close: false,
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Adds a header under its canonical name.
    pub fn header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.insert(canonical_header_key(key), value.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn close(mut self, close: bool) -> Self {
        self.close = close;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: Method::GET,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| HTTP_VERSION.to_string()),
            headers: self.headers,
            host: self.host.ok_or("host missing")?,
            close: self.close,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalizes a header name so every hyphen-separated word starts with an
/// upper-case letter and continues in lower case.
///
/// ```
/// # use docserve::http::request::canonical_header_key;
/// assert_eq!(canonical_header_key("last-modified"), "Last-Modified");
/// assert_eq!(canonical_header_key("CONTENT-TYPE"), "Content-Type");
/// ```
pub fn canonical_header_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = true;

    for c in key.chars() {
        if upper {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }

    out
}
