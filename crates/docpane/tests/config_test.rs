use docpane::{DocpaneConfig, DocpaneErrorKind};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn file_values_override_bundled_defaults() {
    let file = write_config(
        r#"
[explorer]
page_size = 25
enable_cross_partition_query = false
"#,
    );

    let config = DocpaneConfig::from_file(file.path()).unwrap();

    assert_eq!(*config.explorer().page_size(), 25);
    assert!(!*config.explorer().enable_cross_partition_query());
    // Untouched keys keep their bundled values.
    assert_eq!(config.explorer().tab_title(), "Documents");
    assert_eq!(config.logging().level(), "info");
    assert!(!*config.logging().json());
}

#[test]
fn tab_settings_follow_explorer_config() {
    let file = write_config(
        r#"
[explorer]
tab_title = "Orders"
enable_cross_partition_query = false
"#,
    );

    let settings = DocpaneConfig::from_file(file.path())
        .unwrap()
        .explorer()
        .tab_settings()
        .unwrap();

    assert_eq!(settings.tab_title(), "Orders");
    assert!(!*settings.cross_partition_enabled());
}

#[test]
fn zero_page_size_is_rejected() {
    let file = write_config("[explorer]\npage_size = 0\n");

    let err = DocpaneConfig::from_file(file.path()).unwrap_err();

    assert!(matches!(err.kind(), DocpaneErrorKind::Config(_)));
    assert!(err.failure_message().contains("page_size"));
}

#[test]
fn malformed_file_is_a_config_error() {
    let file = write_config("[explorer\npage_size = ");

    let err = DocpaneConfig::from_file(file.path()).unwrap_err();

    assert!(matches!(err.kind(), DocpaneErrorKind::Config(_)));
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = DocpaneConfig::from_file(dir.path().join("absent.toml")).unwrap_err();

    assert!(err.failure_message().starts_with("Failed to read configuration"));
}
