use crate::{Driver, Executor, Result, RowsAffected, SqlWriter, Where, statement::execute};
use std::borrow::Cow;

/// `DELETE FROM <table>`, every row when the filter is empty.
#[derive(Debug, Clone)]
pub struct Delete<'a> {
    table: Cow<'a, str>,
    filter: Where,
}

impl<'a> Delete<'a> {
    pub fn new(table: impl Into<Cow<'a, str>>) -> Self {
        Self {
            table: table.into(),
            filter: Where::new(),
        }
    }

    pub fn filter(mut self, filter: Where) -> Self {
        self.filter = filter;
        self
    }

    pub fn sql(&self, writer: &dyn SqlWriter) -> String {
        let mut out = String::with_capacity(64);
        writer.write_delete(&mut out, &self.table, &self.filter);
        out
    }

    pub async fn run<E: Executor>(&self, executor: &mut E) -> Result<RowsAffected> {
        let sql = self.sql(&executor.driver().sql_writer());
        execute(executor, &sql, self.filter.parameters()).await
    }
}
