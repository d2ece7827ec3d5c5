use crate::{
    Driver, Executor, Order, Parameters, Result, RowLabeled, Schema, SqlWriter, Where,
    statement::fetch_all,
};
use std::borrow::Cow;

/// `SELECT <expression> FROM <table>` with optional filter, order and limit.
#[derive(Debug, Clone)]
pub struct Select<'a> {
    table: Cow<'a, str>,
    expression: Cow<'a, str>,
    filter: Where,
    order_by: Option<(Cow<'a, str>, Order)>,
    limit: Option<u64>,
    schema: Option<Schema<'a>>,
}

impl<'a> Select<'a> {
    pub fn new(table: impl Into<Cow<'a, str>>) -> Self {
        Self {
            table: table.into(),
            expression: "*".into(),
            filter: Where::new(),
            order_by: None,
            limit: None,
            schema: None,
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

    pub fn order_by(mut self, column: impl Into<Cow<'a, str>>, order: Order) -> Self {
        self.order_by = Some((column.into(), order));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Fetched rows are imported through the schema.
    pub fn schema(mut self, schema: Schema<'a>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn parameters(&self) -> &Parameters {
        self.filter.parameters()
    }

    fn write(&self, writer: &dyn SqlWriter, limit: Option<u64>) -> String {
        let mut out = String::with_capacity(64);
        writer.write_select(
            &mut out,
            &self.expression,
            &self.table,
            &self.filter,
            self.order_by.as_ref().map(|(c, o)| (c.as_ref(), *o)),
            limit,
        );
        out
    }

    pub fn sql(&self, writer: &dyn SqlWriter) -> String {
        self.write(writer, self.limit)
    }

    async fn fetch<E: Executor>(&self, executor: &mut E, sql: String) -> Result<Vec<RowLabeled>> {
        let rows = fetch_all(executor, &sql, self.filter.parameters()).await?;
        match &self.schema {
            Some(schema) => rows
                .into_iter()
                .map(|row| schema.import_row(row).map_err(Into::into))
                .collect(),
            None => Ok(rows),
        }
    }

    /// Every matching row, possibly none.
    pub async fn all<E: Executor>(&self, executor: &mut E) -> Result<Vec<RowLabeled>> {
        let sql = self.sql(&executor.driver().sql_writer());
        self.fetch(executor, sql).await
    }

    /// The first matching row, `None` when nothing matches.
    pub async fn first<E: Executor>(&self, executor: &mut E) -> Result<Option<RowLabeled>> {
        let sql = self.write(&executor.driver().sql_writer(), Some(1));
        Ok(self.fetch(executor, sql).await?.into_iter().next())
    }
}
