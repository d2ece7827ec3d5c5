use crate::{
    AsValue, Driver, Error, Executor, Result, SqlWriter, Where, statement::fetch_all,
};
use std::borrow::Cow;

/// `SELECT COUNT(<expression>) FROM <table>`.
#[derive(Debug, Clone)]
pub struct Count<'a> {
    table: Cow<'a, str>,
    expression: Cow<'a, str>,
    filter: Where,
}

impl<'a> Count<'a> {
    pub fn new(table: impl Into<Cow<'a, str>>) -> Self {
        Self {
            table: table.into(),
            expression: "*".into(),
            filter: Where::new(),
        }
    }

    pub fn expression(mut self, expression: impl Into<Cow<'a, str>>) -> Self {
        self.expression = expression.into();
        self
    }

    pub fn filter(mut self, filter: Where) -> Self {
        self.filter = filter;
        self
    }

    pub fn sql(&self, writer: &dyn SqlWriter) -> String {
        let mut out = String::with_capacity(64);
        writer.write_count(&mut out, &self.expression, &self.table, &self.filter);
        out
    }

    pub async fn get<E: Executor>(&self, executor: &mut E) -> Result<i64> {
        let sql = self.sql(&executor.driver().sql_writer());
        let rows = fetch_all(executor, &sql, self.filter.parameters()).await?;
        let value = rows
            .into_iter()
            .next()
            .and_then(|row| row.values.into_vec().into_iter().next())
            .ok_or_else(|| Error::msg("The count query did not return any value"))?;
        i64::try_from_value(value)
    }
}

/// Whether at least one row matches.
#[derive(Debug, Clone)]
pub struct Exists<'a> {
    count: Count<'a>,
}

impl<'a> Exists<'a> {
    pub fn new(table: impl Into<Cow<'a, str>>) -> Self {
        Self {
            count: Count::new(table),
        }
    }

    pub fn filter(mut self, filter: Where) -> Self {
        self.count = self.count.filter(filter);
        self
    }

    pub fn sql(&self, writer: &dyn SqlWriter) -> String {
        self.count.sql(writer)
    }

    pub async fn get<E: Executor>(&self, executor: &mut E) -> Result<bool> {
        Ok(self.count.get(executor).await? > 0)
    }
}
