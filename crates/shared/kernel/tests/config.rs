use rhub_domain::config::ApiConfig;
use rhub_kernel::config::load_config;
use std::io::Write;

#[test]
fn loads_defaults_from_minimal_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "[blobs]\ndata_dir = \"/tmp/rhub-blobs\"\nbase_url = \"/media\"").unwrap();

    let config: ApiConfig = load_config(Some(&path)).unwrap();
    assert_eq!(config.blobs.base_url, "/media");
    assert_eq!(config.security.encryption_key_env, "RHUB_ENCRYPTION_KEY");
    assert!(config.logging.path.is_none());
}

#[test]
fn missing_file_is_an_error() {
    let result: Result<ApiConfig, _> = load_config(Some("does/not/exist"));
    assert!(result.is_err());
}
