use crate::{Driver, Executor, Parameters, Result, SqlWriter, statement::execute};
use std::borrow::Cow;

#[derive(Debug, Clone)]
pub struct DropTable<'a> {
    table: Cow<'a, str>,
    if_exists: bool,
}

impl<'a> DropTable<'a> {
    pub fn new(table: impl Into<Cow<'a, str>>) -> Self {
        Self {
            table: table.into(),
            if_exists: false,
        }
    }

    pub fn if_exists(mut self, if_exists: bool) -> Self {
        self.if_exists = if_exists;
        self
    }

    pub fn sql(&self, writer: &dyn SqlWriter) -> String {
        let mut out = String::with_capacity(32);
        writer.write_drop_table(&mut out, &self.table, self.if_exists);
        out
    }

    pub async fn run<E: Executor>(&self, executor: &mut E) -> Result<()> {
        let sql = self.sql(&executor.driver().sql_writer());
        execute(executor, &sql, &Parameters::new()).await.map(|_| ())
    }
}
