use docserve::config::Config;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn test_config_defaults() {
    let cfg = Config::from_env_with(env(&[])).unwrap();

    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8080");
    assert_eq!(cfg.server.read_timeout_secs, 5);
    assert_eq!(cfg.read_timeout(), Duration::from_secs(5));
    assert_eq!(cfg.static_files.doc_root, PathBuf::from("./public"));
}

#[test]
fn test_config_env_overrides() {
    let cfg = Config::from_env_with(env(&[("LISTEN", "0.0.0.0:3000"), ("DOC_ROOT", "/srv/www")]))
        .unwrap();

    assert_eq!(cfg.server.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.static_files.doc_root, PathBuf::from("/srv/www"));
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml_str(
        r#"
server:
  listen_addr: "0.0.0.0:9000"
  read_timeout_secs: 30
static_files:
  doc_root: /var/www
"#,
    )
    .unwrap();

    assert_eq!(cfg.server.listen_addr, "0.0.0.0:9000");
    assert_eq!(cfg.read_timeout(), Duration::from_secs(30));
    assert_eq!(cfg.static_files.doc_root, PathBuf::from("/var/www"));
}

#[test]
fn test_config_partial_yaml_uses_defaults() {
    let cfg = Config::from_yaml_str("static_files:\n  doc_root: site\n").unwrap();

    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8080");
    assert_eq!(cfg.server.read_timeout_secs, 5);
    assert_eq!(cfg.static_files.doc_root, PathBuf::from("site"));
}

#[test]
fn test_config_invalid_yaml() {
    assert!(Config::from_yaml_str("server: [not, a, map]").is_err());
}

#[test]
fn test_config_file_then_env() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "server:\n  listen_addr: \"127.0.0.1:7000\"\n  read_timeout_secs: 2").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let cfg = Config::from_env_with(env(&[("HTTPD_CONFIG", path.as_str())])).unwrap();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:7000");
    assert_eq!(cfg.server.read_timeout_secs, 2);

    let cfg = Config::from_env_with(env(&[("HTTPD_CONFIG", path.as_str()), ("LISTEN", "127.0.0.1:7001")]))
        .unwrap();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:7001");
}

#[test]
fn test_config_missing_file_is_error() {
    let result = Config::from_env_with(env(&[("HTTPD_CONFIG", "/nonexistent/httpd.yaml")]));
    assert!(result.is_err());
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1.server.listen_addr, cfg2.server.listen_addr);
}
