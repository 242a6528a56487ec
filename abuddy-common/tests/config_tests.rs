//! Unit tests for configuration loading
//!
//! Resolution order: command line, then environment, then the TOML file,
//! then compiled defaults. A missing config file is not an error.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use abuddy_common::config::{
    load_toml_config, ConfigOverrides, ServerConfig, TomlConfig, DEFAULT_FRONTEND_URL, DEFAULT_PORT,
    ENV_EXPIRING_SOON_DAYS, ENV_FRONTEND_URLS, ENV_IDENTITY_URL,
};
use abuddy_common::Error;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Should create temp file");
    file.write_all(contents.as_bytes()).expect("Should write config");
    file
}

#[test]
fn test_defaults_without_any_source() {
    let config = ServerConfig::from_sources(ConfigOverrides::default(), TomlConfig::default(), no_env)
        .expect("Defaults should resolve");

    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.frontend_urls, vec![DEFAULT_FRONTEND_URL.to_string()]);
    assert_eq!(config.expiring_soon_days, 30);
    assert!(config.identity.url.is_none());
    assert!(config.database_path.ends_with("abuddy.db"));
}

#[test]
fn test_toml_file_values() {
    let file = write_config(
        r#"
        port = 8080
        database_path = "/var/lib/abuddy/data.db"
        frontend_urls = ["https://app.example.com"]
        expiring_soon_days = 45

        [identity]
        url = "https://id.example.com/auth/v1/user"
        api_key = "anon-key"

        [[identity.static_tokens]]
        token = "dev-token"
        id = "dev-user"
        email = "dev@example.com"
        "#,
    );

    let toml = load_toml_config(file.path()).expect("Config should parse");
    let config = ServerConfig::from_sources(ConfigOverrides::default(), toml, no_env).unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.database_path, PathBuf::from("/var/lib/abuddy/data.db"));
    assert_eq!(config.frontend_urls, vec!["https://app.example.com".to_string()]);
    assert_eq!(config.expiring_soon_days, 45);
    assert_eq!(config.identity.api_key.as_deref(), Some("anon-key"));
    assert_eq!(config.identity.static_tokens.len(), 1);
    assert_eq!(config.identity.static_tokens[0].id, "dev-user");
}

#[test]
fn test_command_line_beats_toml() {
    let toml = TomlConfig {
        port: Some(8080),
        database_path: Some(PathBuf::from("/from/toml.db")),
        ..TomlConfig::default()
    };
    let overrides = ConfigOverrides {
        port: Some(9090),
        database_path: Some(PathBuf::from("/from/cli.db")),
        config_file: None,
    };

    let config = ServerConfig::from_sources(overrides, toml, no_env).unwrap();

    assert_eq!(config.port, 9090);
    assert_eq!(config.database_path, PathBuf::from("/from/cli.db"));
}

#[test]
fn test_environment_beats_toml() {
    let toml = TomlConfig {
        frontend_urls: Some(vec!["http://toml.test".to_string()]),
        expiring_soon_days: Some(10),
        ..TomlConfig::default()
    };
    let env = env_from(&[
        (ENV_FRONTEND_URLS, "http://a.test, http://b.test"),
        (ENV_EXPIRING_SOON_DAYS, "14"),
        (ENV_IDENTITY_URL, "http://id.test/user"),
    ]);

    let config = ServerConfig::from_sources(ConfigOverrides::default(), toml, env).unwrap();

    assert_eq!(
        config.frontend_urls,
        vec!["http://a.test".to_string(), "http://b.test".to_string()]
    );
    assert_eq!(config.expiring_soon_days, 14);
    assert_eq!(config.identity.url.as_deref(), Some("http://id.test/user"));
}

#[test]
fn test_invalid_threshold_rejected() {
    let env = env_from(&[(ENV_EXPIRING_SOON_DAYS, "soon")]);
    let result = ServerConfig::from_sources(ConfigOverrides::default(), TomlConfig::default(), env);
    assert!(matches!(result, Err(Error::Config(_))));

    let toml = TomlConfig {
        expiring_soon_days: Some(-1),
        ..TomlConfig::default()
    };
    let result = ServerConfig::from_sources(ConfigOverrides::default(), toml, no_env);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_unknown_keys_rejected() {
    let file = write_config("port = 3001\nlog_colour = \"green\"\n");
    assert!(matches!(load_toml_config(file.path()), Err(Error::Config(_))));
}

#[test]
fn test_explicit_missing_config_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let overrides = ConfigOverrides {
        config_file: Some(dir.path().join("absent.toml")),
        ..ConfigOverrides::default()
    };

    assert!(matches!(ServerConfig::resolve(overrides), Err(Error::Config(_))));
}
