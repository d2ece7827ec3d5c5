use crate::{SqliteConnection, SqlitePrepared, SqliteSqlWriter};
use botdb_core::{Connection, Driver, Result};
use std::borrow::Cow;

#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDriver;

impl SqliteDriver {
    pub const fn new() -> Self {
        Self
    }

    pub async fn connect(&self, url: impl Into<Cow<'static, str>>) -> Result<SqliteConnection> {
        SqliteConnection::connect(url.into()).await
    }
}

impl Driver for SqliteDriver {
    type Connection = SqliteConnection;
    type SqlWriter = SqliteSqlWriter;
    type Prepared = SqlitePrepared;

    const NAME: &'static str = "sqlite";

    fn sql_writer(&self) -> SqliteSqlWriter {
        SqliteSqlWriter {}
    }
}
