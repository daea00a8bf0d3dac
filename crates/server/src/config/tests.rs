use std::path::PathBuf;

use super::*;

#[test]
fn empty_file_gives_defaults() {
    let config: PhotoRepoConfig = toml::from_str("").unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.shutdown_timeout_seconds, 30);
    assert_eq!(config.storage.root, "./files");
    assert_eq!(config.storage.album_dir, "albums");
    assert_eq!(config.listing.page_size, 50);
    assert_eq!(config.upload.max_body_bytes, 512 * 1024 * 1024);
    assert_eq!(config.thumbnail.width, 500);
    assert_eq!(config.thumbnail.quality, 20);
    assert!(config.static_files.enabled);
    assert_eq!(config.static_files.dist_path, "static");
    assert_eq!(config.telemetry.format, "text");
    assert!(!config.telemetry.is_json());
}

#[test]
fn custom_config() {
    let toml = r#"
        [server]
        host = "0.0.0.0"
        port = 9000

        [storage]
        root = "/srv/photos"

        [listing]
        page_size = 20

        [thumbnail]
        width = 320
        quality = 60

        [static_files]
        enabled = false
        dist_path = "web/dist"

        [telemetry]
        format = "JSON"
    "#;

    let config: PhotoRepoConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    // Unset fields in a present section still get defaults
    assert_eq!(config.server.shutdown_timeout_seconds, 30);
    assert_eq!(config.storage.root_path(), PathBuf::from("/srv/photos"));
    assert_eq!(
        config.storage.album_path(),
        PathBuf::from("/srv/photos/albums")
    );
    assert_eq!(config.listing.page_size, 20);
    assert_eq!(config.thumbnail.width, 320);
    assert_eq!(config.thumbnail.quality, 60);
    assert!(!config.static_files.enabled);
    assert_eq!(config.static_files.dist_path, "web/dist");
    assert!(config.telemetry.is_json());
}

#[test]
fn absolute_album_dir_overrides_root() {
    let config: StorageConfig = toml::from_str(
        r#"
        root = "./files"
        album_dir = "/var/lib/albums"
    "#,
    )
    .unwrap();
    assert_eq!(config.album_path(), PathBuf::from("/var/lib/albums"));
}

#[test]
fn unknown_value_type_is_rejected() {
    let result: Result<PhotoRepoConfig, _> = toml::from_str("[server]\nport = \"eighty\"");
    assert!(result.is_err());
}

#[test]
fn load_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = PhotoRepoConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.server.port, 8080);
}

#[test]
fn load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photorepo.toml");
    std::fs::write(&path, "[listing]\npage_size = 7\n").unwrap();
    let config = PhotoRepoConfig::load(&path).unwrap();
    assert_eq!(config.listing.page_size, 7);
}

#[test]
fn load_reports_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photorepo.toml");
    std::fs::write(&path, "[listing\n").unwrap();
    assert!(matches!(
        PhotoRepoConfig::load(&path),
        Err(crate::error::ServerError::Config(_))
    ));
}

#[test]
fn static_dir_defaults_outside_storage() {
    let config = PhotoRepoConfig::default();
    assert_eq!(config.static_dir(), Some(PathBuf::from("static")));
}

#[test]
fn static_dir_refuses_to_cover_storage_root() {
    let mut config = PhotoRepoConfig::default();
    config.static_files.dist_path = ".".to_owned();
    assert_eq!(config.static_dir(), None);

    config.static_files.dist_path = "./files".to_owned();
    assert_eq!(config.static_dir(), None);

    config.static_files.dist_path = "web".to_owned();
    config.storage.root = "web/files".to_owned();
    assert_eq!(config.static_dir(), None);
}

#[test]
fn static_dir_disabled() {
    let mut config = PhotoRepoConfig::default();
    config.static_files.enabled = false;
    assert_eq!(config.static_dir(), None);
}
