use botdb_core::{SqlWriter, Value};

/// SQLite dialect, only the storage classes differ from the generic SQL.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteSqlWriter {}

impl SqlWriter for SqliteSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_column_type(&self, out: &mut String, value: &Value) {
        out.push_str(match value {
            Value::Boolean(..) | Value::Int64(..) => "INTEGER",
            Value::Float64(..) => "REAL",
            Value::Varchar(..) | Value::Enum(..) | Value::StringList(..) | Value::Timestamp(..) => {
                "TEXT"
            }
            Value::Blob(..) => "BLOB",
            Value::Null => "NULL",
        });
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteSqlWriter;
    use botdb_core::{ColumnDef, SqlWriter, Value};

    #[test]
    fn id_column() {
        let mut out = String::new();
        SqliteSqlWriter {}.write_create_table_column_fragment(&mut out, &ColumnDef::id());
        assert_eq!(out, "id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT");
        out.clear();
        SqliteSqlWriter {}.write_create_table_column_fragment(
            &mut out,
            &ColumnDef::new("joined", Value::Timestamp(None)).nullable(true),
        );
        assert_eq!(out, "joined TEXT");
    }
}
