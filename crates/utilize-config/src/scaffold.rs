//! Default configuration scaffolding
//!
//! Generates a document containing every section the resource registry
//! reads, pre-populated with defaults and commented with the legal values.

use std::path::Path;

use crate::document::ConfigDocument;
use crate::{Result, io};

/// Every section a scaffolded document contains, in output order.
pub const DEFAULT_SECTIONS: [&str; 13] = [
    "global",
    "basecon",
    "seco",
    "redis",
    "memcached",
    "kvs",
    "kvs:init",
    "decibel",
    "sqlite:init",
    "sqlite:stmt",
    "mysql",
    "mysql:init",
    "mysql:stmt",
];

/// Produces the default configuration document.
pub struct ConfigScaffolder;

impl ConfigScaffolder {
    /// Build the default document.
    pub fn default_document() -> ConfigDocument {
        let mut doc = ConfigDocument::new();

        doc.add_section("global").comment("global settings");

        let basecon = doc.add_section("basecon");
        basecon.comment("choose base from (2 <= base <= 65)");
        basecon.set("base", "62");

        let seco = doc.add_section("seco");
        seco.comment("choose `serialize` in ('json', 'msgpack', 'pickle')")
            .comment("choose `compress` in ('zlib', 'bz2')");
        seco.set("serialize", "msgpack");
        seco.set("compress", "zlib");

        let redis = doc.add_section("redis");
        redis
            .comment("redis connection, `unix_socket_path` replaces `host` and `port` when set")
            .comment(";unix_socket_path =");
        redis.set("host", "localhost");
        redis.set("port", "6379");
        redis.set("password", "");
        redis.set("db", "0");

        let memcached = doc.add_section("memcached");
        memcached.comment("memcached connection, `port` is an integer");
        memcached.set("host", "localhost");
        memcached.set("port", "11211");

        let kvs = doc.add_section("kvs");
        kvs.comment("`initialize` seeds values from [kvs:init] on first use")
            .comment("`engine` in (':memory:', 'redis', 'memcached', 'dbm')")
            .comment("`path` is only used when `engine` is set to 'dbm'");
        kvs.set("initialize", "false");
        kvs.set("engine", ":memory:");
        kvs.set("path", "./database.kvs");

        doc.add_section("kvs:init")
            .comment("`key = value` format, value can be valid JSON string");

        let decibel = doc.add_section("decibel");
        decibel
            .comment("`initialize` runs [sqlite:init] or [mysql:init] on first use")
            .comment("choose decibel `engine` in ('sqlite', 'mysql')")
            .comment("`path` is only used when `engine` is set to 'sqlite'");
        decibel.set("initialize", "false");
        decibel.set("engine", "sqlite");
        decibel.set("path", "./database.sqlite");

        doc.add_section("sqlite:init")
            .comment("`stmt_id = stmt` format, initialize statements");
        doc.add_section("sqlite:stmt")
            .comment("`stmt_id = stmt` format, regular statements");

        let mysql = doc.add_section("mysql");
        mysql.comment("every key is passed to the mysql connection");
        mysql.set("host", "localhost");
        mysql.set("port", "3306");
        mysql.set("user", "");
        mysql.set("password", "");
        mysql.set("database", "");

        doc.add_section("mysql:init")
            .comment("`stmt_id = stmt` format, initialize statements");
        doc.add_section("mysql:stmt")
            .comment("`stmt_id = stmt` format, regular statements");

        doc
    }

    /// Render the default document as INI text.
    pub fn render_default() -> String {
        Self::default_document().render()
    }

    /// Write the default document to `path`, replacing any existing file.
    pub fn write_default_config(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        io::write_text(path, &Self::render_default())?;
        tracing::info!(path = %path.display(), "wrote default config");
        Ok(())
    }
}
