//! Overlaying configuration store
//!
//! The [`ConfigStore`] accumulates one [`ConfigDocument`] from any number of
//! sources. Every load overlays onto what is already there, so a later
//! source can override individual keys without restating whole sections.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::document::{ConfigDocument, Section, SectionMap};
use crate::{Result, io};

/// Path used when no configuration source is given.
pub const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Tokens accepted as `true` by [`coerce_boolean`], compared ignoring case.
pub const TRUTHY_TOKENS: [&str; 9] = [
    "1", "t", "y", "true", "yes", "on", "ok", "okay", "confirm",
];

/// Interpret a configuration string as a boolean.
///
/// Any value outside [`TRUTHY_TOKENS`], including the empty string, is
/// `false`. Surrounding whitespace is significant.
pub fn coerce_boolean(value: impl AsRef<str>) -> bool {
    let value = value.as_ref();
    TRUTHY_TOKENS
        .iter()
        .any(|token| value.eq_ignore_ascii_case(token))
}

/// Where configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A document on disk. A missing or unreadable file is an error.
    Path(PathBuf),
    /// Inline document text.
    Text(String),
    /// Already-structured sections.
    Map(SectionMap),
}

impl ConfigSource {
    /// Interpret `source` as inline text when `as_string` is set, else as a
    /// file path.
    pub fn textual(source: impl Into<String>, as_string: bool) -> Self {
        let source = source.into();
        if as_string {
            Self::Text(source)
        } else {
            Self::Path(PathBuf::from(source))
        }
    }
}

impl From<PathBuf> for ConfigSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ConfigSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<SectionMap> for ConfigSource {
    fn from(map: SectionMap) -> Self {
        Self::Map(map)
    }
}

/// Configuration store with presence-checked lookups.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    document: ConfigDocument,
}

impl ConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from a single file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::new();
        store.load_file(path)?;
        Ok(store)
    }

    /// Create a store from [`DEFAULT_CONFIG_PATH`].
    pub fn open_default() -> Result<Self> {
        Self::from_path(DEFAULT_CONFIG_PATH)
    }

    /// Overlay a source onto the current document.
    pub fn load(&mut self, source: impl Into<ConfigSource>) -> Result<()> {
        match source.into() {
            ConfigSource::Path(path) => self.load_file(path),
            ConfigSource::Text(text) => self.load_str(&text),
            ConfigSource::Map(map) => {
                self.load_map(&map);
                Ok(())
            }
        }
    }

    /// Overlay a document read from disk.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = io::read_text(path)?;
        let incoming = ConfigDocument::parse(&content, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), sections = incoming.len(), "loaded config file");
        self.document.merge(&incoming);
        Ok(())
    }

    /// Overlay inline document text.
    pub fn load_str(&mut self, text: &str) -> Result<()> {
        let incoming = ConfigDocument::parse(text, "<string>")?;
        tracing::debug!(sections = incoming.len(), "loaded config string");
        self.document.merge(&incoming);
        Ok(())
    }

    /// Overlay structured sections.
    pub fn load_map(&mut self, map: &SectionMap) {
        tracing::debug!(sections = map.len(), "loaded config mapping");
        self.document.merge(&ConfigDocument::from_map(map));
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.document.has_section(name)
    }

    pub fn has_key(&self, section: &str, key: &str) -> bool {
        self.document.get(section, key).is_some()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.document.section(name)
    }

    /// Look up a value, falling back to `default` when the section or key
    /// is absent.
    pub fn get<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.document.get(section, key).unwrap_or(default)
    }

    /// Look up a value without a fallback.
    pub fn lookup(&self, section: &str, key: &str) -> Option<&str> {
        self.document.get(section, key)
    }

    /// Look up a value and coerce it with [`coerce_boolean`].
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.lookup(section, key)
            .map(coerce_boolean)
            .unwrap_or(default)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.document.sections()
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.document.section_names()
    }
}

impl FromStr for ConfigStore {
    type Err = crate::Error;

    fn from_str(text: &str) -> Result<Self> {
        let mut store = Self::new();
        store.load_str(text)?;
        Ok(store)
    }
}

impl From<ConfigDocument> for ConfigStore {
    fn from(document: ConfigDocument) -> Self {
        Self { document }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("1")]
    #[case("t")]
    #[case("y")]
    #[case("true")]
    #[case("yes")]
    #[case("on")]
    #[case("ok")]
    #[case("okay")]
    #[case("confirm")]
    #[case("TRUE")]
    #[case("Yes")]
    #[case("oKaY")]
    #[case("CONFIRM")]
    fn test_coerce_boolean_accepts_truthy_tokens(#[case] token: &str) {
        assert!(coerce_boolean(token));
    }

    #[rstest]
    #[case("")]
    #[case("0")]
    #[case("false")]
    #[case("no")]
    #[case("off")]
    #[case("enabled")]
    #[case(" true")]
    #[case("truthy")]
    fn test_coerce_boolean_rejects_everything_else(#[case] token: &str) {
        assert!(!coerce_boolean(token));
    }

    #[test]
    fn test_get_returns_default_for_missing_section_or_key() {
        let store: ConfigStore = "[kvs]\nengine = dbm\n".parse().unwrap();

        assert_eq!(store.get("kvs", "engine", ":memory:"), "dbm");
        assert_eq!(store.get("kvs", "path", "./database.kvs"), "./database.kvs");
        assert_eq!(store.get("decibel", "engine", "sqlite"), "sqlite");
        assert!(store.has_section("kvs"));
        assert!(!store.has_section("decibel"));
    }

    #[test]
    fn test_get_bool_coerces_or_defaults() {
        let store: ConfigStore = "[kvs]\ninitialize = Yes\n[decibel]\ninitialize = nope\n"
            .parse()
            .unwrap();

        assert!(store.get_bool("kvs", "initialize", false));
        assert!(!store.get_bool("decibel", "initialize", true));
        assert!(!store.get_bool("seco", "initialize", false));
    }

    #[test]
    fn test_textual_source_selects_path_or_text() {
        assert_eq!(
            ConfigSource::textual("./config.ini", false),
            ConfigSource::Path(PathBuf::from("./config.ini"))
        );
        assert_eq!(
            ConfigSource::textual("[global]", true),
            ConfigSource::Text("[global]".to_string())
        );
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut store = ConfigStore::new();

        let err = store
            .load(ConfigSource::Path(temp.path().join("absent.ini")))
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
