mod count;
mod create_table;
mod delete;
mod drop_table;
mod insert;
mod select;
mod update;

pub use count::*;
pub use create_table::*;
pub use delete::*;
pub use drop_table::*;
pub use insert::*;
pub use select::*;
pub use update::*;

use crate::{
    DriverError, Error, Executor, Parameters, Query, QueryError, Result, RowLabeled,
    RowsAffected, stream::TryStreamExt, truncate_long,
};

/// Failures reported by the engine become a [`QueryError`] carrying the SQL,
/// anything else keeps its type and gets the SQL as context.
pub(crate) fn query_error(sql: &str, error: Error) -> Error {
    if error.downcast_ref::<DriverError>().is_some() {
        let error = QueryError::new(sql, error);
        if error.is_unique_violation() {
            log::debug!("{:#}", error);
        } else {
            log::error!("{:#}", error);
        }
        error.into()
    } else {
        let error = error.context(format!(
            "While executing the query:\n{}",
            truncate_long!(sql)
        ));
        log::error!("{:#}", error);
        error
    }
}

pub(crate) async fn prepare<E: Executor>(
    executor: &mut E,
    sql: &str,
) -> Result<Query<E::Driver>> {
    log::debug!("{}", truncate_long!(sql));
    executor
        .prepare(sql.to_owned())
        .await
        .map_err(|e| query_error(sql, e))
}

async fn fetch_prepared<E: Executor>(
    executor: &mut E,
    query: &mut Query<E::Driver>,
    parameters: &Parameters,
) -> Result<Vec<RowLabeled>> {
    if query.is_prepared() {
        query.clear_bindings()?;
    }
    query.bind_all(parameters)?;
    executor.fetch(query).try_collect().await
}

pub(crate) async fn execute_prepared<E: Executor>(
    executor: &mut E,
    query: &mut Query<E::Driver>,
    parameters: &Parameters,
) -> Result<RowsAffected> {
    if query.is_prepared() {
        query.clear_bindings()?;
    }
    query.bind_all(parameters)?;
    executor.execute(query).await
}

pub(crate) async fn fetch_all<E: Executor>(
    executor: &mut E,
    sql: &str,
    parameters: &Parameters,
) -> Result<Vec<RowLabeled>> {
    let mut query = prepare(executor, sql).await?;
    fetch_prepared(executor, &mut query, parameters)
        .await
        .map_err(|e| query_error(sql, e))
}

pub(crate) async fn execute<E: Executor>(
    executor: &mut E,
    sql: &str,
    parameters: &Parameters,
) -> Result<RowsAffected> {
    let mut query = prepare(executor, sql).await?;
    execute_prepared(executor, &mut query, parameters)
        .await
        .map_err(|e| query_error(sql, e))
}
