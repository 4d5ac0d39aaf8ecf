use docserve::http::resolver::{INDEX_FILE, resolve, safe_join};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn doc_root() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::write(root.join("index.html"), "hello").unwrap();
    fs::create_dir(root.join("docs")).unwrap();
    fs::write(root.join("docs").join("index.html"), "<h1>docs</h1>").unwrap();
    fs::write(root.join("docs").join("guide.txt"), "read me").unwrap();
    fs::create_dir(root.join("empty")).unwrap();

    temp_dir
}

#[tokio::test]
async fn test_resolves_existing_file() {
    let temp_dir = doc_root();
    let resource = resolve(temp_dir.path(), "/docs/guide.txt").await.unwrap();

    assert_eq!(resource.path, temp_dir.path().join("docs").join("guide.txt"));
    assert_eq!(resource.size, 7);
}

#[tokio::test]
async fn test_directory_target_serves_index() {
    let temp_dir = doc_root();

    let root_index = resolve(temp_dir.path(), "/").await.unwrap();
    assert_eq!(root_index.path, temp_dir.path().join(INDEX_FILE));
    assert_eq!(root_index.size, 5);

    let docs_index = resolve(temp_dir.path(), "/docs/").await.unwrap();
    assert_eq!(docs_index.path, temp_dir.path().join("docs").join(INDEX_FILE));
}

#[tokio::test]
async fn test_directory_without_slash_is_not_found() {
    let temp_dir = doc_root();
    assert!(resolve(temp_dir.path(), "/docs").await.is_none());
}

#[tokio::test]
async fn test_directory_without_index_is_not_found() {
    let temp_dir = doc_root();
    assert!(resolve(temp_dir.path(), "/empty/").await.is_none());
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let temp_dir = doc_root();
    assert!(resolve(temp_dir.path(), "/missing.txt").await.is_none());
}

#[tokio::test]
async fn test_traversal_out_of_root_is_not_found() {
    let temp_dir = doc_root();
    let inner = temp_dir.path().join("docs");

    // index.html exists one level up, but outside this root
    assert!(resolve(&inner, "/../index.html").await.is_none());
    assert!(resolve(&inner, "/./../docs/../index.html").await.is_none());
    assert!(resolve(&inner, "/guide.txt").await.is_some());
}

#[tokio::test]
async fn test_dot_segments_inside_root_are_collapsed() {
    let temp_dir = doc_root();
    let resource = resolve(temp_dir.path(), "/docs/../docs/./guide.txt")
        .await
        .unwrap();
    assert_eq!(resource.path, temp_dir.path().join("docs").join("guide.txt"));
}

#[test]
fn test_etc_passwd_never_escapes() {
    let root = Path::new("/srv/www");

    assert_eq!(safe_join(root, "/../../etc/passwd"), None);
    assert_eq!(safe_join(root, "/../www/index.html"), Some(PathBuf::from("/srv/www/index.html")));
    assert_eq!(safe_join(root, "/../wwwx/index.html"), None);
}
