//! Loading configuration files from disk.

use std::io::Write;

use referrer_gate::config::{load_config, ConfigError, ValidationError};
use referrer_gate::filter::FilterSnapshot;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_config() {
    let file = write_config(
        r#"
        [listener]
        bind_address = "127.0.0.1:9000"

        [referrer_filter]
        allow-empty = true
        allow-hosts = ["example.com", "https://secure.example.com:8443", "http://bad host"]
        allow-hosts-regexp = ['https://.*\.example\.org:443', "("]
        filter-methods = ["post", "patch"]
        exclude-agents-regexp = ['.*Monitor.*']

        [admin]
        enabled = true
        api_key = "secret"
        "#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
    assert!(config.admin.enabled);

    let snapshot = FilterSnapshot::build(&config.referrer_filter, Vec::<String>::new());
    assert!(snapshot.allow_empty());
    assert_eq!(
        snapshot.filter_methods(),
        Some(&["POST".to_string(), "PATCH".to_string()][..])
    );
    // Bad host and bad pattern are skipped, the rest still apply.
    assert_eq!(snapshot.allow_list().origins().len(), 3);
    assert_eq!(snapshot.allow_list().patterns().len(), 1);
    assert_eq!(snapshot.excluded_agents().len(), 1);
}

#[test]
fn test_empty_file_uses_defaults() {
    let file = write_config("");
    let config = load_config(file.path()).unwrap();
    assert!(!config.referrer_filter.allow_empty);
    assert_eq!(config.referrer_filter.filter_methods.len(), 5);
}

#[test]
fn test_parse_error() {
    let file = write_config("[referrer_filter]\nallow-empty = \"maybe\"\n");
    assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
}

#[test]
fn test_validation_error() {
    let file = write_config("[listener]\nbind_address = \"not-an-address\"\n");
    match load_config(file.path()) {
        Err(ConfigError::Validation(errors)) => assert_eq!(
            errors,
            vec![ValidationError::InvalidBindAddress {
                section: "listener",
                address: "not-an-address".into(),
            }]
        ),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(matches!(load_config(&missing), Err(ConfigError::Io(_))));
}

#[test]
fn test_invalid_filter_method_is_dropped_not_fatal() {
    let file = write_config("[referrer_filter]\nfilter-methods = [\"POST\", \"BAD METHOD\"]\n");
    let config = load_config(file.path()).unwrap();

    let snapshot = FilterSnapshot::build(&config.referrer_filter, Vec::<String>::new());
    assert_eq!(snapshot.filter_methods(), Some(&["POST".to_string()][..]));
    assert!(snapshot.is_filtered_method("POST"));
}
