use crate::{NamedRow, Parameters, QueryBuilderError, Result, Schema, Value, parameter_key};

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedColumn {
    pub column: &'static str,
    /// Parameter key, `$` followed by the column name.
    pub key: String,
    pub value: Value,
}

/// A row ready to be bound, optionally coerced to its storage form first.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PreparedRow {
    columns: Vec<PreparedColumn>,
}

impl PreparedRow {
    pub fn new(row: NamedRow, schema: Option<&Schema>) -> Result<Self> {
        let row = match schema {
            Some(schema) => schema.export_row(row)?,
            None => row,
        };
        let mut columns: Vec<PreparedColumn> = Vec::with_capacity(row.len());
        for (column, value) in row {
            if columns.iter().any(|c| c.column == column) {
                return Err(QueryBuilderError::DuplicateColumn(column.into()).into());
            }
            let key = parameter_key(column, |k| columns.iter().any(|c| c.key == k));
            columns.push(PreparedColumn { column, key, value });
        }
        Ok(Self { columns })
    }

    pub fn iter(&self) -> impl Iterator<Item = &PreparedColumn> {
        self.columns.iter()
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.column)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.columns.iter().map(|c| &c.value)
    }

    pub fn parameters(&self) -> Parameters {
        self.columns
            .iter()
            .map(|c| (c.key.clone(), c.value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
