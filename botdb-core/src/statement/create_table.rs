use crate::{
    ColumnDef, Constraint, Driver, EntityDescriptor, Executor, Parameters, QueryBuilderError,
    Reference, ReferenceTarget, Result, SqlWriter, TenantContext, Value, statement::execute,
};
use std::borrow::Cow;

/// `CREATE TABLE`, built either from an entity or column by column.
///
/// Column modifiers apply to the last added column:
/// ```rust,ignore
/// CreateTable::new("quotes")
///     .column("id", Value::Int64(None))
///     .primary()
///     .auto_increment()
///     .column("text", Value::Varchar(None))
///     .unique();
/// ```
#[derive(Debug, Clone)]
pub struct CreateTable<'a> {
    table: Cow<'a, str>,
    columns: Vec<ColumnDef>,
    constraints: Vec<Constraint>,
    if_not_exists: bool,
    error: Option<QueryBuilderError>,
}

impl<'a> CreateTable<'a> {
    pub fn new(table: impl Into<Cow<'a, str>>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
            if_not_exists: false,
            error: None,
        }
    }

    /// The table of `entity` in the tenant context, references to other
    /// entities resolve to their table in the same context.
    pub fn for_entity(entity: &EntityDescriptor, context: &TenantContext) -> Result<Self> {
        let mut columns = entity.columns.clone();
        for column in &mut columns {
            if let Some(reference) = &column.references {
                if matches!(reference.target, ReferenceTarget::Entity(..)) {
                    column.references = Some(Reference {
                        target: ReferenceTarget::Table(reference.table_name(context)?),
                        column: reference.column.clone(),
                    });
                }
            }
        }
        Ok(Self {
            table: entity.table_name(context)?.into(),
            columns,
            constraints: entity.constraints.clone(),
            if_not_exists: false,
            error: None,
        })
    }

    pub fn if_not_exists(mut self, if_not_exists: bool) -> Self {
        self.if_not_exists = if_not_exists;
        self
    }

    pub fn column(mut self, name: impl Into<Cow<'static, str>>, value: Value) -> Self {
        self.columns.push(ColumnDef::new(name, value));
        self
    }

    pub fn column_def(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    fn modify_last(mut self, method: &'static str, f: impl FnOnce(&mut ColumnDef)) -> Self {
        match self.columns.last_mut() {
            Some(column) => f(column),
            None => {
                self.error.get_or_insert(QueryBuilderError::NoColumn(method));
            }
        }
        self
    }

    pub fn nullable(self) -> Self {
        self.modify_last("nullable", |c| c.nullable = true)
    }

    pub fn unique(self) -> Self {
        self.modify_last("unique", |c| c.unique = true)
    }

    pub fn primary(self) -> Self {
        self.modify_last("primary", |c| c.primary_key = true)
    }

    pub fn auto_increment(self) -> Self {
        self.modify_last("auto_increment", |c| c.auto_increment = true)
    }

    pub fn references(
        self,
        table: impl Into<Cow<'static, str>>,
        column: impl Into<Cow<'static, str>>,
    ) -> Self {
        let (table, column) = (table.into(), column.into());
        self.modify_last("references", move |c| {
            c.references = Some(Reference {
                target: ReferenceTarget::Table(table),
                column,
            })
        })
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn sql(&self, writer: &dyn SqlWriter) -> Result<String> {
        if let Some(error) = &self.error {
            return Err(error.clone().into());
        }
        if self.columns.is_empty() {
            return Err(QueryBuilderError::EmptyTable.into());
        }
        if let Some(column) = self.columns.iter().find(|c| {
            c.references
                .as_ref()
                .is_some_and(|r| matches!(r.target, ReferenceTarget::Entity(..)))
        }) {
            return Err(QueryBuilderError::UnresolvedReference(column.name.to_string()).into());
        }
        let mut out = String::with_capacity(128);
        writer.write_create_table(
            &mut out,
            &self.table,
            &self.columns,
            &self.constraints,
            self.if_not_exists,
        );
        Ok(out)
    }

    pub async fn run<E: Executor>(&self, executor: &mut E) -> Result<()> {
        let sql = self.sql(&executor.driver().sql_writer())?;
        execute(executor, &sql, &Parameters::new()).await.map(|_| ())
    }
}
