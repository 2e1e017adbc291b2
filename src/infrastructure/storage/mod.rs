//! Relational storage: SQLite pool and schema migrations

pub mod migrations;
pub mod sqlite;

pub use migrations::{run_migrations, Migration, SqliteMigrator};
pub use sqlite::{connect, SqliteConfig};
