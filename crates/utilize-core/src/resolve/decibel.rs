//! Relational store engine selection

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use utilize_config::{ConfigStore, Section};

use super::non_empty;
use crate::resource::ResourceKind;
use crate::{Error, Result};

pub const DEFAULT_ENGINE: &str = "sqlite";
pub const DEFAULT_PATH: &str = "./database.sqlite";

/// Connection parameters for mysql: every key of `[mysql]`, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MysqlParams {
    entries: IndexMap<String, String>,
}

impl MysqlParams {
    fn from_section(section: &Section) -> Result<Self> {
        if non_empty(section.get("host")).is_none() {
            return Err(Error::MissingParameter {
                resource: ResourceKind::Decibel,
                engine: "mysql".into(),
                key: "host".into(),
            });
        }
        if let Some(port) = non_empty(section.get("port")) {
            port.trim()
                .parse::<u16>()
                .map_err(|e| Error::invalid("mysql", "port", port, e.to_string()))?;
        }
        Ok(Self {
            entries: section.entries().clone(),
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        non_empty(self.entries.get(key).map(String::as_str))
    }

    pub fn host(&self) -> &str {
        self.get("host").unwrap_or_default()
    }

    pub fn port(&self) -> u16 {
        self.get("port")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(3306)
    }

    pub fn user(&self) -> Option<&str> {
        self.get("user")
    }

    pub fn database(&self) -> Option<&str> {
        self.get("database")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The relational engine and its connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlEngine {
    Sqlite { path: PathBuf },
    Mysql { params: MysqlParams },
}

impl SqlEngine {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sqlite { .. } => "sqlite",
            Self::Mysql { .. } => "mysql",
        }
    }

    /// Section holding initialization statements
    fn init_section(&self) -> &'static str {
        match self {
            Self::Sqlite { .. } => "sqlite:init",
            Self::Mysql { .. } => "mysql:init",
        }
    }

    /// Section holding named statement templates
    fn stmt_section(&self) -> &'static str {
        match self {
            Self::Sqlite { .. } => "sqlite:stmt",
            Self::Mysql { .. } => "mysql:stmt",
        }
    }
}

impl fmt::Display for SqlEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One initialization statement, keyed by its id in the init section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitStatement {
    pub key: String,
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecibelDescriptor {
    pub engine: SqlEngine,
    pub initialize: bool,
    /// Statements to run in one transaction at first build, empty unless
    /// `initialize` is set
    pub init: Vec<InitStatement>,
    /// Named statement templates handed to the relational handle
    pub statements: IndexMap<String, String>,
}

impl DecibelDescriptor {
    pub fn resolve(config: &ConfigStore) -> Result<Self> {
        let name = config.get("decibel", "engine", DEFAULT_ENGINE);
        let engine = match name.to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => SqlEngine::Sqlite {
                path: PathBuf::from(config.get("decibel", "path", DEFAULT_PATH)),
            },
            "mysql" => {
                let section = config.section("mysql").ok_or_else(|| Error::MissingParameter {
                    resource: ResourceKind::Decibel,
                    engine: name.to_string(),
                    key: "host".into(),
                })?;
                SqlEngine::Mysql {
                    params: MysqlParams::from_section(section)?,
                }
            }
            _ => {
                return Err(Error::UnsupportedEngine {
                    resource: ResourceKind::Decibel,
                    engine: name.to_string(),
                });
            }
        };

        let initialize = config.get_bool("decibel", "initialize", false);
        let init = match config.section(engine.init_section()) {
            Some(section) if initialize => section
                .iter()
                .map(|(key, sql)| InitStatement {
                    key: key.to_string(),
                    sql: sql.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };
        let statements = config
            .section(engine.stmt_section())
            .map(|section| section.entries().clone())
            .unwrap_or_default();

        Ok(Self {
            engine,
            initialize,
            init,
            statements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn store(text: &str) -> ConfigStore {
        text.parse().unwrap()
    }

    #[test]
    fn test_defaults_to_sqlite_file() {
        let descriptor = DecibelDescriptor::resolve(&store("")).unwrap();
        assert_eq!(
            descriptor.engine,
            SqlEngine::Sqlite {
                path: PathBuf::from(DEFAULT_PATH)
            }
        );
        assert!(descriptor.init.is_empty());
        assert!(descriptor.statements.is_empty());
    }

    #[rstest]
    #[case("sqlite")]
    #[case("sqlite3")]
    #[case("SQLite")]
    fn test_sqlite_aliases(#[case] name: &str) {
        let config = store(&format!("[decibel]\nengine = {name}\npath = app.db\n"));
        assert_eq!(
            DecibelDescriptor::resolve(&config).unwrap().engine,
            SqlEngine::Sqlite {
                path: PathBuf::from("app.db")
            }
        );
    }

    #[test]
    fn test_init_statements_follow_source_order() {
        let config = store(
            "[decibel]\ninitialize = true\n\
             [sqlite:init]\nz_users = CREATE TABLE users (id INTEGER)\na_seed = INSERT INTO users VALUES (1)\n\
             [sqlite:stmt]\nall_users = SELECT * FROM users\n",
        );
        let descriptor = DecibelDescriptor::resolve(&config).unwrap();

        let keys: Vec<_> = descriptor.init.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["z_users", "a_seed"]);
        assert_eq!(
            descriptor.statements.get("all_users").map(String::as_str),
            Some("SELECT * FROM users")
        );
    }

    #[test]
    fn test_templates_load_without_initialize() {
        let config = store("[sqlite:init]\nt = CREATE TABLE t (x)\n[sqlite:stmt]\nq = SELECT 1\n");
        let descriptor = DecibelDescriptor::resolve(&config).unwrap();
        assert!(descriptor.init.is_empty());
        assert_eq!(descriptor.statements.len(), 1);
    }

    #[test]
    fn test_mysql_requires_host() {
        let err = DecibelDescriptor::resolve(&store("[decibel]\nengine = mysql\n")).unwrap_err();
        assert!(matches!(err, Error::MissingParameter { ref key, .. } if key == "host"));

        let err = DecibelDescriptor::resolve(&store(
            "[decibel]\nengine = mysql\n[mysql]\nhost =\n",
        ))
        .unwrap_err();
        assert!(matches!(err, Error::MissingParameter { .. }));
    }

    #[test]
    fn test_mysql_reads_every_key_and_its_own_sections() {
        let config = store(
            "[decibel]\nengine = mysql\ninitialize = on\n\
             [mysql]\nhost = db\nport = 3307\nuser = app\npassword =\ndatabase = main\ncharset = utf8mb4\n\
             [sqlite:init]\nignored = SELECT 1\n\
             [mysql:init]\nt = CREATE TABLE t (x INT)\n",
        );
        let descriptor = DecibelDescriptor::resolve(&config).unwrap();

        let SqlEngine::Mysql { params } = &descriptor.engine else {
            panic!("expected mysql engine");
        };
        assert_eq!(params.host(), "db");
        assert_eq!(params.port(), 3307);
        assert_eq!(params.user(), Some("app"));
        assert_eq!(params.get("password"), None);
        assert_eq!(params.get("charset"), Some("utf8mb4"));
        assert_eq!(descriptor.init.len(), 1);
        assert_eq!(descriptor.init[0].key, "t");
    }

    #[test]
    fn test_unknown_engine_is_rejected() {
        let err = DecibelDescriptor::resolve(&store("[decibel]\nengine = postgres\n")).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedEngine { resource: ResourceKind::Decibel, ref engine } if engine == "postgres"
        ));
    }
}
