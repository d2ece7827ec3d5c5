use crate::{
    ColumnDef, Condition, Constraint, PreparedRow, Reference, ReferenceTarget, Value, Where,
    possibly_parenthesized, separated_by,
};
use std::fmt::Write;

/// Conflict resolution clause of an `INSERT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    Rollback,
    Abort,
    Fail,
    Ignore,
    Replace,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

const KEYWORDS: &[&str] = &[
    "ABORT", "ADD", "ALL", "ALTER", "AND", "AS", "ASC", "AUTOINCREMENT", "BEGIN", "BETWEEN",
    "BY", "CASE", "CAST", "CHECK", "COLLATE", "COLUMN", "COMMIT", "CONSTRAINT", "CREATE",
    "CROSS", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END", "ESCAPE", "EXISTS",
    "FAIL", "FOREIGN", "FROM", "GLOB", "GROUP", "HAVING", "IGNORE", "IN", "INDEX", "INNER",
    "INSERT", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE", "LIMIT", "NATURAL", "NOT", "NULL",
    "OFFSET", "ON", "OR", "ORDER", "OUTER", "PRIMARY", "REFERENCES", "REPLACE", "ROLLBACK",
    "SELECT", "SET", "TABLE", "THEN", "TO", "TRANSACTION", "UNION", "UNIQUE", "UPDATE",
    "USING", "VALUES", "WHEN", "WHERE",
];

/// Renders statements for a specific SQL dialect.
///
/// Every method has a default implementation producing generic SQL, drivers
/// override what their dialect does differently.
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Plain identifiers that do not need quoting.
    fn is_bare_identifier(&self, value: &str) -> bool {
        let mut chars = value.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        (first.is_ascii_alphabetic() || first == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(value))
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', r#""""#);
        out.push('"');
    }

    fn write_identifier(&self, out: &mut String, value: &str) {
        if self.is_bare_identifier(value) {
            out.push_str(value);
        } else {
            self.write_identifier_quoted(out, value);
        }
    }

    fn write_column_type(&self, out: &mut String, value: &Value) {
        out.push_str(match value {
            Value::Boolean(..) => "BOOLEAN",
            Value::Int64(..) => "BIGINT",
            Value::Float64(..) => "DOUBLE",
            Value::Varchar(..) | Value::Enum(..) | Value::StringList(..) => "VARCHAR",
            Value::Blob(..) => "BLOB",
            Value::Timestamp(..) => "TIMESTAMP",
            Value::Null => "NULL",
        });
    }

    fn write_where(&self, out: &mut String, value: &Where) {
        if value.is_empty() {
            return;
        }
        out.push_str(" WHERE ");
        let conditions = value.conditions();
        let parenthesize = conditions.len() > 1;
        separated_by(
            out,
            conditions,
            |out, v| {
                possibly_parenthesized!(out, parenthesize, self.write_condition(out, v));
            },
            " AND ",
        );
    }

    fn write_conditions(&self, out: &mut String, values: &[Condition], separator: &str) {
        separated_by(
            out,
            values,
            |out, v| {
                possibly_parenthesized!(out, v.is_compound(), self.write_condition(out, v));
            },
            separator,
        );
    }

    fn write_condition(&self, out: &mut String, value: &Condition) {
        match value {
            Condition::And(values) => self.write_conditions(out, values, " AND "),
            Condition::Or(values) => self.write_conditions(out, values, " OR "),
            Condition::Equals { column, key } => {
                self.write_identifier(out, column);
                out.push_str(" = ");
                out.push_str(key);
            }
            Condition::In { column, keys } | Condition::NotIn { column, keys } => {
                self.write_identifier(out, column);
                out.push_str(if matches!(value, Condition::In { .. }) {
                    " IN ("
                } else {
                    " NOT IN ("
                });
                separated_by(out, keys, |out, v| out.push_str(v), ", ");
                out.push(')');
            }
        }
    }

    fn write_conflict(&self, out: &mut String, value: Conflict) {
        out.push_str(match value {
            Conflict::Rollback => "OR ROLLBACK",
            Conflict::Abort => "OR ABORT",
            Conflict::Fail => "OR FAIL",
            Conflict::Ignore => "OR IGNORE",
            Conflict::Replace => "OR REPLACE",
        });
    }

    fn write_transaction_begin(&self, out: &mut String) {
        out.push_str("BEGIN");
    }

    fn write_transaction_commit(&self, out: &mut String) {
        out.push_str("COMMIT");
    }

    fn write_transaction_rollback(&self, out: &mut String) {
        out.push_str("ROLLBACK");
    }

    fn write_create_table(
        &self,
        out: &mut String,
        table: &str,
        columns: &[ColumnDef],
        constraints: &[Constraint],
        if_not_exists: bool,
    ) {
        out.push_str("CREATE TABLE ");
        if if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        self.write_identifier(out, table);
        out.push_str(" (");
        separated_by(
            out,
            columns,
            |out, v| self.write_create_table_column_fragment(out, v),
            ", ",
        );
        for constraint in constraints {
            out.push_str(", CONSTRAINT ");
            self.write_identifier(out, &constraint.name);
            out.push(' ');
            out.push_str(&constraint.sql);
        }
        out.push(')');
    }

    fn write_create_table_column_fragment(&self, out: &mut String, column: &ColumnDef) {
        self.write_identifier(out, &column.name);
        out.push(' ');
        self.write_column_type(out, &column.value);
        if !column.nullable {
            out.push_str(" NOT NULL");
        }
        if column.primary_key {
            out.push_str(" PRIMARY KEY");
            if column.auto_increment {
                out.push_str(" AUTOINCREMENT");
            }
        }
        if column.unique && !column.primary_key {
            out.push_str(" UNIQUE");
        }
        if let Some(Reference {
            target: ReferenceTarget::Table(table),
            column: referenced,
        }) = &column.references
        {
            out.push_str(" REFERENCES ");
            self.write_identifier(out, table);
            out.push('(');
            self.write_identifier(out, referenced);
            out.push(')');
        }
    }

    fn write_drop_table(&self, out: &mut String, table: &str, if_exists: bool) {
        out.push_str("DROP TABLE ");
        if if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_identifier(out, table);
    }

    fn write_select(
        &self,
        out: &mut String,
        expression: &str,
        table: &str,
        filter: &Where,
        order_by: Option<(&str, Order)>,
        limit: Option<u64>,
    ) {
        out.push_str("SELECT ");
        out.push_str(expression);
        out.push_str(" FROM ");
        self.write_identifier(out, table);
        self.write_where(out, filter);
        if let Some((column, order)) = order_by {
            out.push_str(" ORDER BY ");
            self.write_identifier(out, column);
            out.push_str(match order {
                Order::Asc => " ASC",
                Order::Desc => " DESC",
            });
        }
        if let Some(limit) = limit {
            let _ = write!(out, " LIMIT {}", limit);
        }
    }

    fn write_count(&self, out: &mut String, expression: &str, table: &str, filter: &Where) {
        out.push_str("SELECT COUNT(");
        out.push_str(expression);
        out.push_str(") FROM ");
        self.write_identifier(out, table);
        self.write_where(out, filter);
    }

    fn write_insert(
        &self,
        out: &mut String,
        table: &str,
        row: &PreparedRow,
        conflict: Option<Conflict>,
    ) {
        out.push_str("INSERT ");
        if let Some(conflict) = conflict {
            self.write_conflict(out, conflict);
            out.push(' ');
        }
        out.push_str("INTO ");
        self.write_identifier(out, table);
        if row.is_empty() {
            out.push_str(" DEFAULT VALUES");
            return;
        }
        out.push_str(" (");
        separated_by(out, row.columns(), |out, v| self.write_identifier(out, v), ", ");
        out.push_str(") VALUES (");
        separated_by(out, row.keys(), |out, v| out.push_str(v), ", ");
        out.push(')');
    }

    fn write_update(&self, out: &mut String, table: &str, row: &PreparedRow, filter: &Where) {
        out.push_str("UPDATE ");
        self.write_identifier(out, table);
        out.push_str(" SET ");
        separated_by(
            out,
            row.iter(),
            |out, v| {
                self.write_identifier(out, v.column);
                out.push_str(" = ");
                out.push_str(&v.key);
            },
            ", ",
        );
        self.write_where(out, filter);
    }

    fn write_delete(&self, out: &mut String, table: &str, filter: &Where) {
        out.push_str("DELETE FROM ");
        self.write_identifier(out, table);
        self.write_where(out, filter);
    }
}

/// Dialect independent writer, also used to display statements.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericSqlWriter;

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{GenericSqlWriter, SqlWriter};

    #[test]
    fn identifiers() {
        let writer = GenericSqlWriter;
        let mut out = String::new();
        writer.write_identifier(&mut out, "user_name");
        out.push(' ');
        writer.write_identifier(&mut out, "order");
        out.push(' ');
        writer.write_identifier(&mut out, "irc_#chan\"x");
        assert_eq!(out, r#"user_name "order" "irc_#chan""x""#);
    }
}
