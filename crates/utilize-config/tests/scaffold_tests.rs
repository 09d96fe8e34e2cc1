//! Tests for writing the default configuration document

use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use utilize_config::{ConfigScaffolder, ConfigStore, DEFAULT_SECTIONS};

#[test]
fn test_written_config_contains_all_thirteen_sections() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.ini");

    ConfigScaffolder::write_default_config(&path).unwrap();

    let store = ConfigStore::from_path(&path).unwrap();
    assert_eq!(DEFAULT_SECTIONS.len(), 13);
    for name in DEFAULT_SECTIONS {
        assert!(store.has_section(name), "missing section [{name}]");
    }
}

#[test]
fn test_written_config_carries_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.ini");

    ConfigScaffolder::write_default_config(&path).unwrap();
    let store = ConfigStore::from_path(&path).unwrap();

    assert_eq!(store.get("basecon", "base", ""), "62");
    assert_eq!(store.get("seco", "serialize", ""), "msgpack");
    assert_eq!(store.get("seco", "compress", ""), "zlib");
    assert_eq!(store.get("redis", "host", ""), "localhost");
    assert_eq!(store.get("redis", "port", ""), "6379");
    assert_eq!(store.get("redis", "password", "unset"), "");
    assert_eq!(store.get("redis", "db", ""), "0");
    assert!(!store.has_key("redis", "unix_socket_path"));
    assert_eq!(store.get("memcached", "port", ""), "11211");
    assert_eq!(store.get("kvs", "engine", ""), ":memory:");
    assert_eq!(store.get("kvs", "path", ""), "./database.kvs");
    assert!(!store.get_bool("kvs", "initialize", true));
    assert_eq!(store.get("decibel", "engine", ""), "sqlite");
    assert_eq!(store.get("decibel", "path", ""), "./database.sqlite");
    assert_eq!(store.get("mysql", "port", ""), "3306");
    assert_eq!(store.get("mysql", "user", "unset"), "");
    assert_eq!(store.get("mysql", "database", "unset"), "");
}

#[test]
fn test_rendered_text_comments_legal_values() {
    let text = ConfigScaffolder::render_default();

    assert!(text.starts_with("[global]\n; global settings\n"));
    assert!(text.contains("[redis]\n"));
    assert!(text.contains(";unix_socket_path =\n"));
    assert!(text.contains("; `engine` in (':memory:', 'redis', 'memcached', 'dbm')\n"));
    assert!(text.contains("engine = :memory:\n"));
    assert!(text.contains("password =\n"));
}

#[test]
fn test_writing_overwrites_an_existing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.ini");
    fs::write(&path, "[custom]\nkeep = no\n").unwrap();

    ConfigScaffolder::write_default_config(&path).unwrap();

    let store = ConfigStore::from_path(&path).unwrap();
    assert!(!store.has_section("custom"));
    assert_eq!(fs::read_to_string(&path).unwrap(), ConfigScaffolder::render_default());
}
