//! Configuration layer for utilize
//!
//! Provides the ordered INI document model, the overlaying [`ConfigStore`]
//! every resource is resolved from, and the [`ConfigScaffolder`] that emits
//! a complete, commented default document.

pub mod document;
pub mod error;
pub mod io;
pub mod scaffold;
pub mod store;

pub use document::{ConfigDocument, Section, SectionMap};
pub use error::{Error, Result};
pub use scaffold::{ConfigScaffolder, DEFAULT_SECTIONS};
pub use store::{
    ConfigSource, ConfigStore, DEFAULT_CONFIG_PATH, TRUTHY_TOKENS, coerce_boolean,
};
