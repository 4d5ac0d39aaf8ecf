//! Maps request targets onto files under the document root.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// File served for targets naming a directory.
pub const INDEX_FILE: &str = "index.html";

/// A regular file a request target resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

/// Resolves `target` against `doc_root`.
///
/// Returns `None` when the cleaned path would leave the document root, or
/// when it does not name an existing regular file.
pub async fn resolve(doc_root: &Path, target: &str) -> Option<Resource> {
    let path = safe_join(doc_root, target)?;

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Resource lookup failed");
            return None;
        }
    };

    if !metadata.is_file() {
        return None;
    }

    Some(Resource {
        size: metadata.len(),
        modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        path,
    })
}

/// Joins `target` onto `doc_root`, collapsing `.` and `..` segments, and
/// returns the result only if it stays below `doc_root`.
///
/// A target ending in `/` gets [`INDEX_FILE`] appended first. No file system
/// access happens here.
pub fn safe_join(doc_root: &Path, target: &str) -> Option<PathBuf> {
    let root = clean(doc_root.components().map(Segment::from));

    let mut target = target.to_string();
    if target.ends_with('/') {
        target.push_str(INDEX_FILE);
    }

    let joined = clean(
        doc_root
            .components()
            .map(Segment::from)
            .chain(target.split('/').map(Segment::from_target)),
    );

    let escapes = joined.components().any(|c| c == Component::ParentDir);
    if !escapes && joined.starts_with(&root) && joined != root {
        Some(joined)
    } else {
        None
    }
}

enum Segment {
    Root(OsString),
    Current,
    Parent,
    Name(OsString),
}

impl Segment {
    fn from_target(s: &str) -> Self {
        match s {
            "" | "." => Segment::Current,
            ".." => Segment::Parent,
            name => Segment::Name(name.into()),
        }
    }
}

impl From<Component<'_>> for Segment {
    fn from(c: Component<'_>) -> Self {
        match c {
            Component::Prefix(_) | Component::RootDir => Segment::Root(c.as_os_str().into()),
            Component::CurDir => Segment::Current,
            Component::ParentDir => Segment::Parent,
            Component::Normal(name) => Segment::Name(name.into()),
        }
    }
}

/// Lexically normalizes a sequence of path segments.
fn clean(segments: impl Iterator<Item = Segment>) -> PathBuf {
    let mut roots: Vec<OsString> = Vec::new();
    let mut stack: Vec<OsString> = Vec::new();

    for segment in segments {
        match segment {
            Segment::Root(r) => roots.push(r),
            Segment::Current => {}
            Segment::Parent => match stack.last() {
                Some(last) if last != ".." => {
                    stack.pop();
                }
                // ".." at the filesystem root stays at the root
                _ if !roots.is_empty() => {}
                _ => stack.push("..".into()),
            },
            Segment::Name(name) => stack.push(name),
        }
    }

    let mut path: PathBuf = roots.iter().collect();
    path.extend(stack);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_dot_segments() {
        let root = Path::new("/srv/www");
        assert_eq!(
            safe_join(root, "/a/./b/../c.txt"),
            Some(PathBuf::from("/srv/www/a/c.txt"))
        );
        assert_eq!(
            safe_join(root, "//double//slash.txt"),
            Some(PathBuf::from("/srv/www/double/slash.txt"))
        );
    }

    #[test]
    fn directory_targets_get_index() {
        let root = Path::new("/srv/www");
        assert_eq!(safe_join(root, "/"), Some(PathBuf::from("/srv/www/index.html")));
        assert_eq!(
            safe_join(root, "/docs/"),
            Some(PathBuf::from("/srv/www/docs/index.html"))
        );
    }

    #[test]
    fn traversal_is_rejected() {
        let root = Path::new("/srv/www");
        assert_eq!(safe_join(root, "/../../etc/passwd"), None);
        assert_eq!(safe_join(root, "/a/../../www2/secret"), None);
        assert_eq!(safe_join(root, "/.."), None);
        assert_eq!(safe_join(root, "/."), None);
    }

    #[test]
    fn relative_root() {
        let root = Path::new("public");
        assert_eq!(
            safe_join(root, "/css/site.css"),
            Some(PathBuf::from("public/css/site.css"))
        );
        assert_eq!(safe_join(root, "/../secret"), None);

        let cwd = Path::new(".");
        assert_eq!(safe_join(cwd, "/a.txt"), Some(PathBuf::from("a.txt")));
        assert_eq!(safe_join(cwd, "/../a.txt"), None);
    }
}
