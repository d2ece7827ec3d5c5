use crate::{
    Conflict, Driver, Executor, NamedRow, Parameters, PreparedRow, QueryBuilderError, Result,
    Schema, SqlWriter,
    statement::{execute, execute_prepared, prepare, query_error},
};
use std::borrow::Cow;

/// `INSERT [OR <conflict>] INTO <table>`.
#[derive(Debug, Clone)]
pub struct Insert<'a> {
    table: Cow<'a, str>,
    conflict: Option<Conflict>,
    schema: Option<Schema<'a>>,
}

impl<'a> Insert<'a> {
    pub fn new(table: impl Into<Cow<'a, str>>) -> Self {
        Self {
            table: table.into(),
            conflict: None,
            schema: None,
        }
    }

    pub fn conflict(mut self, conflict: Conflict) -> Self {
        self.conflict = Some(conflict);
        self
    }

    /// Rows are exported through the schema before being bound.
    pub fn schema(mut self, schema: Schema<'a>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn prepare_row(&self, row: NamedRow) -> Result<PreparedRow> {
        PreparedRow::new(row, self.schema.as_ref())
    }

    pub fn sql(&self, writer: &dyn SqlWriter, row: &PreparedRow) -> String {
        let mut out = String::with_capacity(64);
        writer.write_insert(&mut out, &self.table, row, self.conflict);
        out
    }

    /// Inserts one row, returns its id or `None` when no row was inserted.
    pub async fn run<E: Executor>(&self, executor: &mut E, row: NamedRow) -> Result<Option<i64>> {
        let row = self.prepare_row(row)?;
        let sql = self.sql(&executor.driver().sql_writer(), &row);
        let affected = execute(executor, &sql, &row.parameters()).await?;
        Ok(if affected.rows_affected > 0 {
            affected.last_affected_id
        } else {
            None
        })
    }

    /// Inserts every row inside a single transaction, the statement is prepared once.
    ///
    /// The ids are returned only after the transaction committed, on any failure
    /// the transaction is rolled back and nothing is inserted. Every row must
    /// have the same columns in the same order. The connection is held through
    /// [`Executor::exclusive`] from `BEGIN` to the end of the transaction.
    pub async fn run_batch<E: Executor>(
        &self,
        executor: &mut E,
        rows: Vec<NamedRow>,
    ) -> Result<Vec<Option<i64>>> {
        let rows = rows
            .into_iter()
            .map(|row| self.prepare_row(row))
            .collect::<Result<Vec<_>>>()?;
        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };
        for row in &rows[1..] {
            if !row.columns().eq(first.columns()) {
                return Err(QueryBuilderError::MismatchedRow {
                    expected: first.columns().map(Into::into).collect(),
                    found: row.columns().map(Into::into).collect(),
                }
                .into());
            }
        }
        let writer = executor.driver().sql_writer();
        let sql = self.sql(&writer, first);
        let (mut begin, mut commit, mut rollback) = (String::new(), String::new(), String::new());
        writer.write_transaction_begin(&mut begin);
        writer.write_transaction_commit(&mut commit);
        writer.write_transaction_rollback(&mut rollback);
        let empty = Parameters::new();
        let mut executor = executor.exclusive().await;
        let executor = &mut executor;
        execute(executor, &begin, &empty).await?;
        let result = match Self::run_rows(executor, &sql, &rows).await {
            Ok(ids) => execute(executor, &commit, &empty).await.map(|_| ids),
            Err(e) => Err(e),
        };
        if result.is_err() {
            if let Err(e) = execute(executor, &rollback, &empty).await {
                log::error!("Could not roll back the batch insert: {:#}", e);
            }
        }
        result
    }

    async fn run_rows<E: Executor>(
        executor: &mut E,
        sql: &str,
        rows: &[PreparedRow],
    ) -> Result<Vec<Option<i64>>> {
        let mut query = prepare(executor, sql).await?;
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            let affected = execute_prepared(executor, &mut query, &row.parameters())
                .await
                .map_err(|e| query_error(sql, e))?;
            ids.push(if affected.rows_affected > 0 {
                affected.last_affected_id
            } else {
                None
            });
        }
        Ok(ids)
    }
}
