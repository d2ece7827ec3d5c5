use crate::{
    Driver, Executor, NamedRow, Parameters, PreparedRow, QueryBuilderError, Result,
    RowsAffected, Schema, SqlWriter, Where, statement::execute,
};
use std::{borrow::Cow, mem};

/// `UPDATE <table> SET ...` with an optional filter.
#[derive(Debug, Clone)]
pub struct Update<'a> {
    table: Cow<'a, str>,
    row: PreparedRow,
    filter: Where,
}

impl<'a> Update<'a> {
    /// The keys of `row` are reserved, the filter never reuses them.
    pub fn new(
        table: impl Into<Cow<'a, str>>,
        row: NamedRow,
        schema: Option<&Schema>,
    ) -> Result<Self> {
        if row.is_empty() {
            return Err(QueryBuilderError::EmptyUpdate.into());
        }
        let row = PreparedRow::new(row, schema)?;
        let mut filter = Where::new();
        for key in row.keys() {
            filter.reserve(key);
        }
        Ok(Self {
            table: table.into(),
            row,
            filter,
        })
    }

    /// The conditions built by `scope` are added to the filter, their keys
    /// never collide with the ones of the row.
    pub fn filter(mut self, scope: impl FnOnce(Where) -> Where) -> Self {
        self.filter = mem::take(&mut self.filter).merge(scope(Where::new()));
        self
    }

    pub fn sql(&self, writer: &dyn SqlWriter) -> String {
        let mut out = String::with_capacity(64);
        writer.write_update(&mut out, &self.table, &self.row, &self.filter);
        out
    }

    /// Values of the row and of the filter together.
    pub fn parameters(&self) -> Parameters {
        let mut parameters = self.row.parameters();
        parameters.extend(
            self.filter
                .parameters()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        parameters
    }

    pub async fn run<E: Executor>(&self, executor: &mut E) -> Result<RowsAffected> {
        let sql = self.sql(&executor.driver().sql_writer());
        execute(executor, &sql, &self.parameters()).await
    }
}
