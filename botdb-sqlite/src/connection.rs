use crate::{
    CBox, SqliteDriver, SqlitePrepared, driver_error, error_message_from_ptr,
    extract::{extract_name, extract_value},
};
use async_stream::try_stream;
use botdb_core::{
    Connection, Context, Driver, Error, Executor, Query, QueryResult, Result, RowLabeled,
    RowNames, RowsAffected, stream::Stream, truncate_long,
};
use libsqlite3_sys::{
    SQLITE_DONE, SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_FULLMUTEX, SQLITE_OPEN_READWRITE,
    SQLITE_OPEN_URI, SQLITE_ROW, sqlite3, sqlite3_busy_timeout,
    sqlite3_column_count, sqlite3_errstr, sqlite3_extended_result_codes, sqlite3_finalize,
    sqlite3_last_insert_rowid, sqlite3_open_v2, sqlite3_prepare_v2, sqlite3_reset, sqlite3_step,
    sqlite3_stmt, sqlite3_total_changes64,
};
use std::{
    borrow::Cow,
    ffi::{CStr, CString, c_char, c_int},
    ptr,
    sync::atomic::{AtomicPtr, Ordering},
};
use tokio::task::spawn_blocking;

// The pregenerated bundled bindings of libsqlite3-sys omit this symbol, the bundled library exports it.
unsafe extern "C" {
    fn sqlite3_close_v2(db: *mut sqlite3) -> c_int;
}

const BUSY_TIMEOUT_MS: c_int = 5000;

pub struct SqliteConnection {
    pub(crate) connection: CBox<*mut sqlite3>,
}

/// Steps the statement to completion, collecting the rows or the changes it made.
unsafe fn step_all(
    statement: *mut sqlite3_stmt,
    connection: *mut sqlite3,
) -> Result<Vec<QueryResult>> {
    unsafe {
        sqlite3_reset(statement);
        let count = sqlite3_column_count(statement);
        let labels = (0..count)
            .map(|i| extract_name(statement, i))
            .collect::<Result<RowNames>>()?;
        let changes = sqlite3_total_changes64(connection);
        let mut results = Vec::new();
        loop {
            match sqlite3_step(statement) {
                SQLITE_ROW => {
                    let values = (0..count)
                        .map(|i| extract_value(statement, i))
                        .collect::<Result<Box<[_]>>>();
                    let values = match values {
                        Ok(v) => v,
                        Err(e) => {
                            sqlite3_reset(statement);
                            return Err(e);
                        }
                    };
                    results.push(QueryResult::Row(RowLabeled::new(labels.clone(), values)));
                }
                SQLITE_DONE => break,
                _ => {
                    let error = driver_error(connection);
                    sqlite3_reset(statement);
                    return Err(error.into());
                }
            }
        }
        if count == 0 {
            let rows_affected = (sqlite3_total_changes64(connection) - changes).max(0) as u64;
            results.push(QueryResult::Affected(RowsAffected {
                rows_affected,
                last_affected_id: Some(sqlite3_last_insert_rowid(connection)),
            }));
        }
        sqlite3_reset(statement);
        Ok(results)
    }
}

impl SqliteConnection {
    async fn prepare_statement(&self, query: String) -> Result<SqlitePrepared> {
        let connection = AtomicPtr::new(*self.connection);
        let context = format!(
            "While preparing the query:\n{}",
            truncate_long!(query)
        );
        let statement = spawn_blocking(move || unsafe {
            let connection = connection.load(Ordering::Relaxed);
            let sql = CString::new(query.as_bytes())
                .context("Could not create a CString from the query String")?;
            let mut statement = CBox::new(ptr::null_mut(), |p| {
                sqlite3_finalize(p);
            });
            let mut tail: *const c_char = ptr::null();
            let rc = sqlite3_prepare_v2(
                connection,
                sql.as_ptr(),
                query.len() as c_int,
                &mut *statement,
                &mut tail,
            );
            if rc != SQLITE_OK {
                return Err(Error::new(driver_error(connection)));
            }
            if !tail.is_null() && !CStr::from_ptr(tail).to_bytes().trim_ascii().is_empty() {
                return Err(Error::msg("Cannot prepare more than one statement at a time"));
            }
            if statement.is_null() {
                return Err(Error::msg("The query does not contain any statement"));
            }
            Ok(statement)
        })
        .await?
        .context(context)
        .inspect_err(|e| log::error!("{:#}", e))?;
        Ok(SqlitePrepared::new(statement))
    }
}

impl Executor for SqliteConnection {
    type Driver = SqliteDriver;
    type Exclusive<'e>
        = &'e mut Self
    where
        Self: 'e;

    fn driver(&self) -> &Self::Driver {
        &SqliteDriver
    }

    async fn exclusive(&mut self) -> Self::Exclusive<'_> {
        self
    }

    async fn prepare(&mut self, query: String) -> Result<Query<Self::Driver>> {
        Ok(Query::Prepared(self.prepare_statement(query).await?))
    }

    fn run<'s>(
        &'s mut self,
        query: &'s mut Query<Self::Driver>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send + 's {
        try_stream! {
            let mut owned = None;
            let prepared = match query {
                Query::Prepared(prepared) => prepared,
                Query::Raw(sql) => owned.insert(self.prepare_statement(sql.clone()).await?),
            };
            let statement = AtomicPtr::new(*prepared.statement);
            let connection = AtomicPtr::new(*self.connection);
            let results = spawn_blocking(move || unsafe {
                step_all(
                    statement.load(Ordering::Relaxed),
                    connection.load(Ordering::Relaxed),
                )
            })
            .await??;
            for result in results {
                yield result;
            }
        }
    }
}

impl Connection for SqliteConnection {
    /// Opens `sqlite://<path>[?<options>]`, the part after the scheme is used as a `file:` URI.
    async fn connect(url: Cow<'static, str>) -> Result<SqliteConnection> {
        let prefix = format!("{}://", <Self::Driver as Driver>::NAME);
        let Some(path) = url.strip_prefix(&prefix) else {
            let error = Error::msg(format!(
                "Expected sqlite connection url to start with `{}`, found `{}`",
                &prefix, url
            ));
            log::error!("{:#}", error);
            return Err(error);
        };
        let uri = CString::new(format!("file:{}", path))
            .with_context(|| format!("Error while decoding connection URL: `{}`", url))?;
        let connection = spawn_blocking(move || unsafe {
            let mut connection = CBox::new(ptr::null_mut(), |p| {
                sqlite3_close_v2(p);
            });
            let rc = sqlite3_open_v2(
                uri.as_ptr(),
                &mut *connection,
                SQLITE_OPEN_READWRITE
                    | SQLITE_OPEN_CREATE
                    | SQLITE_OPEN_URI
                    | SQLITE_OPEN_FULLMUTEX,
                ptr::null(),
            );
            if rc != SQLITE_OK {
                let message = if connection.is_null() {
                    error_message_from_ptr(sqlite3_errstr(rc))
                } else {
                    driver_error(*connection).message.into()
                };
                return Err(Error::msg(message.into_owned()));
            }
            sqlite3_extended_result_codes(*connection, 1);
            sqlite3_busy_timeout(*connection, BUSY_TIMEOUT_MS);
            Ok(connection)
        })
        .await?
        .with_context(|| format!("Could not open the database `{}`", url))
        .inspect_err(|e| log::error!("{:#}", e))?;
        log::debug!("Connected to `{}`", url);
        Ok(Self { connection })
    }
}
