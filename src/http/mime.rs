//! MIME type detection based on file extensions.

use std::path::Path;

pub const DEFAULT_MIME: &str = "application/octet-stream";

const MIME_TYPES: &[(&str, &str)] = &[
    ("avif", "image/avif"),
    ("css", "text/css; charset=utf-8"),
    ("gif", "image/gif"),
    ("htm", "text/html; charset=utf-8"),
    ("html", "text/html; charset=utf-8"),
    ("ico", "image/vnd.microsoft.icon"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("js", "text/javascript; charset=utf-8"),
    ("json", "application/json"),
    ("mjs", "text/javascript; charset=utf-8"),
    ("mp4", "video/mp4"),
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("svg", "image/svg+xml"),
    ("txt", "text/plain; charset=utf-8"),
    ("wasm", "application/wasm"),
    ("webp", "image/webp"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("xml", "text/xml; charset=utf-8"),
];

/// Returns the Content-Type for `path`, judged by its extension alone.
pub fn mime_type_for<P: AsRef<Path>>(path: P) -> &'static str {
    let Some(ext) = path.as_ref().extension().and_then(|e| e.to_str()) else {
        return DEFAULT_MIME;
    };

    MIME_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map_or(DEFAULT_MIME, |&(_, mime)| mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(mime_type_for("/srv/index.html"), "text/html; charset=utf-8");
        assert_eq!(mime_type_for("photo.JPG"), "image/jpeg");
        assert_eq!(mime_type_for("a/b/c.png"), "image/png");
    }

    #[test]
    fn unknown_or_missing_extension() {
        assert_eq!(mime_type_for("archive.xyz"), DEFAULT_MIME);
        assert_eq!(mime_type_for("Makefile"), DEFAULT_MIME);
        assert_eq!(mime_type_for(".hidden"), DEFAULT_MIME);
    }
}
