//! `PostgreSQL` adapters for the schema-synchronising SQL backend.

mod driver;

pub use driver::{POSTGRES_DIALECT, PostgresSyncSqlConnection, PostgresSyncSqlDriver};
