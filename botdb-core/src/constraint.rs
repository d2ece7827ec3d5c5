use crate::{SqlWriter, separated_by};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    NotNull,
    PrimaryKey,
    Check,
}

/// Named table constraint, emitted as `CONSTRAINT <name> <sql>` in `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub name: Cow<'static, str>,
    pub kind: ConstraintKind,
    /// Columns of the declaring table the constraint is about.
    pub columns: Vec<Cow<'static, str>>,
    pub sql: String,
}

fn columns_list(writer: &dyn SqlWriter, columns: &[Cow<'static, str>]) -> String {
    let mut out = String::from("(");
    separated_by(
        &mut out,
        columns,
        |out, v| writer.write_identifier(out, v),
        ", ",
    );
    out.push(')');
    out
}

fn owned_columns<I, S>(columns: I) -> Vec<Cow<'static, str>>
where
    I: IntoIterator<Item = S>,
    S: Into<Cow<'static, str>>,
{
    columns.into_iter().map(Into::into).collect()
}

impl Constraint {
    fn with_kind(
        name: impl Into<Cow<'static, str>>,
        kind: ConstraintKind,
        columns: Vec<Cow<'static, str>>,
        sql: String,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            columns,
            sql,
        }
    }

    pub fn unique<I, S>(name: impl Into<Cow<'static, str>>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        let columns = owned_columns(columns);
        let writer = crate::GenericSqlWriter;
        let sql = format!("UNIQUE {}", columns_list(&writer, &columns));
        Self::with_kind(name, ConstraintKind::Unique, columns, sql)
    }

    pub fn primary_key<I, S>(name: impl Into<Cow<'static, str>>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        let columns = owned_columns(columns);
        let writer = crate::GenericSqlWriter;
        let sql = format!("PRIMARY KEY {}", columns_list(&writer, &columns));
        Self::with_kind(name, ConstraintKind::PrimaryKey, columns, sql)
    }

    /// Rendered as a check, so it can be attached to existing column declarations.
    pub fn not_null(
        name: impl Into<Cow<'static, str>>,
        column: impl Into<Cow<'static, str>>,
    ) -> Self {
        let column = column.into();
        let mut sql = String::from("CHECK (");
        crate::GenericSqlWriter.write_identifier(&mut sql, &column);
        sql.push_str(" IS NOT NULL)");
        Self::with_kind(name, ConstraintKind::NotNull, vec![column], sql)
    }

    /// Verbatim check expression, the columns it mentions are not validated.
    pub fn check(name: impl Into<Cow<'static, str>>, expression: impl AsRef<str>) -> Self {
        let sql = format!("CHECK ({})", expression.as_ref());
        Self::with_kind(name, ConstraintKind::Check, Vec::new(), sql)
    }

    pub fn foreign_key<I, S, J, T>(
        name: impl Into<Cow<'static, str>>,
        columns: I,
        table: impl AsRef<str>,
        references: J,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
        J: IntoIterator<Item = T>,
        T: Into<Cow<'static, str>>,
    {
        let columns = owned_columns(columns);
        let references = owned_columns(references);
        let writer = crate::GenericSqlWriter;
        let mut sql = format!("FOREIGN KEY {} REFERENCES ", columns_list(&writer, &columns));
        writer.write_identifier(&mut sql, table.as_ref());
        sql.push(' ');
        sql.push_str(&columns_list(&writer, &references));
        Self::with_kind(name, ConstraintKind::ForeignKey, columns, sql)
    }
}

#[cfg(test)]
mod tests {
    use super::{Constraint, ConstraintKind};

    #[test]
    fn constraints_sql() {
        let unique = Constraint::unique("uq_user", ["name", "network"]);
        assert_eq!(unique.kind, ConstraintKind::Unique);
        assert_eq!(unique.sql, "UNIQUE (name, network)");
        assert_eq!(
            Constraint::not_null("nn_name", "name").sql,
            "CHECK (name IS NOT NULL)"
        );
        assert_eq!(
            Constraint::foreign_key("fk_owner", ["owner"], "users", ["id"]).sql,
            "FOREIGN KEY (owner) REFERENCES users (id)"
        );
        assert_eq!(Constraint::check("positive", "x > 0").sql, "CHECK (x > 0)");
        assert_eq!(
            Constraint::primary_key("pk", ["a", "b"]).sql,
            "PRIMARY KEY (a, b)"
        );
    }
}
