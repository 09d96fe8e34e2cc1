//! Ordered INI document model
//!
//! A [`ConfigDocument`] is an ordered set of named [`Section`]s, each an
//! ordered mapping of string keys to string values. Keys are case-sensitive
//! and values are never typed; callers convert as needed.
//!
//! # Syntax
//!
//! ```text
//! [section]
//! ; comment
//! # comment
//! key = value
//! other: value
//! statement = CREATE TABLE t (
//!     id INTEGER PRIMARY KEY)
//! ```
//!
//! Indented lines continue the previous value and are joined with `\n`.
//! Blank lines between continuation lines are kept inside the value.

use indexmap::IndexMap;

use crate::{Error, Result};

/// Nested mapping form of a document: section name to key/value pairs.
pub type SectionMap = IndexMap<String, IndexMap<String, String>>;

/// A named group of key/value entries.
///
/// Comment lines are kept only so that scaffolded documents can be rendered
/// with explanations; parsing a document discards them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    comments: Vec<String>,
    entries: IndexMap<String, String>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set a value, returning the previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Attach a comment line. Lines without a `;` or `#` marker get `; `.
    pub fn comment(&mut self, line: impl Into<String>) -> &mut Self {
        let line = line.into();
        let line = if line.starts_with(';') || line.starts_with('#') {
            line
        } else {
            format!("; {line}")
        };
        self.comments.push(line);
        self
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn entries(&self) -> &IndexMap<String, String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An ordered INI document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    sections: IndexMap<String, Section>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse document text.
    ///
    /// `origin` names the source in error messages (a path or `<string>`).
    /// Duplicate sections or keys within one source are rejected; overlaying
    /// happens only across sources, via [`ConfigDocument::merge`].
    pub fn parse(content: &str, origin: &str) -> Result<Self> {
        let mut document = Self::new();
        let mut current: Option<String> = None;
        let mut last_key: Option<String> = None;
        // Blank lines seen since the last value line; kept only if the value continues
        let mut blank_run = 0usize;

        for (index, raw) in content.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                if last_key.is_some() {
                    blank_run += 1;
                }
                continue;
            }
            if trimmed.starts_with(';') || trimmed.starts_with('#') {
                continue;
            }

            let indented = raw.starts_with(char::is_whitespace);
            if indented {
                if let (Some(section), Some(key)) = (&current, &last_key) {
                    if let Some(value) = document
                        .sections
                        .get_mut(section)
                        .and_then(|s| s.entries.get_mut(key))
                    {
                        if !value.is_empty() {
                            value.push('\n');
                        }
                        for _ in 0..blank_run {
                            value.push('\n');
                        }
                        blank_run = 0;
                        value.push_str(trimmed);
                        continue;
                    }
                }
            }
            blank_run = 0;

            if let Some(rest) = trimmed.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .ok_or_else(|| Error::parse(origin, line_no, "unterminated section header"))?
                    .trim();
                if name.is_empty() {
                    return Err(Error::parse(origin, line_no, "empty section name"));
                }
                if document.sections.contains_key(name) {
                    return Err(Error::parse(
                        origin,
                        line_no,
                        format!("duplicate section [{name}]"),
                    ));
                }
                document.sections.insert(name.to_string(), Section::new());
                current = Some(name.to_string());
                last_key = None;
                continue;
            }

            let Some(section_name) = &current else {
                return Err(Error::parse(
                    origin,
                    line_no,
                    "entry appears before any section header",
                ));
            };

            let delimiter = trimmed
                .find(['=', ':'])
                .ok_or_else(|| Error::parse(origin, line_no, "expected `key = value`"))?;
            let key = trimmed[..delimiter].trim();
            let value = trimmed[delimiter + 1..].trim();
            if key.is_empty() {
                return Err(Error::parse(origin, line_no, "empty key"));
            }

            let section = document
                .sections
                .get_mut(section_name)
                .ok_or_else(|| Error::parse(origin, line_no, "section vanished during parse"))?;
            if section.contains_key(key) {
                return Err(Error::parse(
                    origin,
                    line_no,
                    format!("duplicate key `{key}` in [{section_name}]"),
                ));
            }
            section.set(key, value);
            last_key = Some(key.to_string());
        }

        Ok(document)
    }

    /// Build a document from the nested mapping form.
    pub fn from_map(map: &SectionMap) -> Self {
        let mut document = Self::new();
        for (name, entries) in map {
            let section = document.add_section(name.clone());
            for (key, value) in entries {
                section.set(key.clone(), value.clone());
            }
        }
        document
    }

    /// Overlay `other` onto this document.
    ///
    /// Sections are created as needed; within a section the last writer per
    /// key wins and keys absent from `other` are preserved.
    pub fn merge(&mut self, other: &ConfigDocument) {
        for (name, incoming) in &other.sections {
            match self.sections.get_mut(name) {
                Some(existing) => {
                    for (key, value) in &incoming.entries {
                        existing.entries.insert(key.clone(), value.clone());
                    }
                }
                None => {
                    self.sections.insert(name.clone(), incoming.clone());
                }
            }
        }
    }

    /// Get or create a section.
    pub fn add_section(&mut self, name: impl Into<String>) -> &mut Section {
        self.sections.entry(name.into()).or_default()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(name)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section).and_then(|s| s.get(key))
    }

    /// Sections in document order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render the document as INI text.
    ///
    /// Multi-line values are written as indented continuation lines so the
    /// output parses back to the same entries.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, (name, section)) in self.sections.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&format!("[{name}]\n"));
            for comment in &section.comments {
                out.push_str(comment);
                out.push('\n');
            }
            for (key, value) in &section.entries {
                if value.is_empty() {
                    out.push_str(&format!("{key} =\n"));
                } else {
                    out.push_str(&format!("{key} = {}\n", value.replace('\n', "\n\t")));
                }
            }
        }
        out
    }
}
