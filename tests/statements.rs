#[cfg(test)]
mod tests {
    use botdb::{
        AsValue, ColumnDef, Conflict, Constraint, Count, CreateTable, Delete, DropTable, Exists,
        GenericSqlWriter, Insert, Order, PreparedRow, QueryBuilderError, Reference, ReferenceTarget,
        Select, Update, Value, Where,
    };
    use indoc::indoc;

    const WRITER: GenericSqlWriter = GenericSqlWriter;

    #[test]
    fn create_table() {
        let statement = CreateTable::new("irc_general_accounts")
            .if_not_exists(true)
            .column_def(ColumnDef::id())
            .column("name", Value::Varchar(None))
            .unique()
            .column("owner", Value::Int64(None))
            .nullable()
            .references("irc_general_users", "id")
            .column("order", Value::Float64(None))
            .constraint(Constraint::check("positive_order", "\"order\" >= 0"));
        assert_eq!(
            statement.sql(&WRITER).expect("Failed to render the statement"),
            indoc! {r#"
                CREATE TABLE IF NOT EXISTS irc_general_accounts (
                id BIGINT NOT NULL PRIMARY KEY AUTOINCREMENT,
                name VARCHAR NOT NULL UNIQUE,
                owner BIGINT REFERENCES irc_general_users(id),
                "order" DOUBLE NOT NULL,
                CONSTRAINT positive_order CHECK ("order" >= 0))
            "#}
            .trim()
            .replace("(\n", "(")
            .replace(",\n", ", ")
        );
    }

    #[test]
    fn create_table_misuse() {
        let error = CreateTable::new("t")
            .nullable()
            .column("a", Value::Int64(None))
            .sql(&WRITER)
            .expect_err("A modifier was used before any column");
        assert_eq!(
            error.downcast_ref::<QueryBuilderError>(),
            Some(&QueryBuilderError::NoColumn("nullable"))
        );
        let error = CreateTable::new("t")
            .sql(&WRITER)
            .expect_err("The table has no column");
        assert_eq!(
            error.downcast_ref::<QueryBuilderError>(),
            Some(&QueryBuilderError::EmptyTable)
        );
        let error = CreateTable::new("t")
            .column_def(ColumnDef {
                references: Some(Reference {
                    target: ReferenceTarget::Entity(|| unreachable!()),
                    column: "id".into(),
                }),
                ..ColumnDef::of::<i64>("owner")
            })
            .sql(&WRITER)
            .expect_err("The entity reference was never resolved");
        assert_eq!(
            error.downcast_ref::<QueryBuilderError>(),
            Some(&QueryBuilderError::UnresolvedReference("owner".into()))
        );
    }

    #[test]
    fn drop_table() {
        assert_eq!(DropTable::new("t").sql(&WRITER), "DROP TABLE t");
        assert_eq!(
            DropTable::new("irc_#chan_t").if_exists(true).sql(&WRITER),
            r#"DROP TABLE IF EXISTS "irc_#chan_t""#
        );
    }

    #[test]
    fn select() {
        assert_eq!(Select::new("t").sql(&WRITER), "SELECT * FROM t");
        let select = Select::new("accounts")
            .expression("name, karma")
            .filter(Where::new().eq("banned", false).is_in("karma", [1, 2]))
            .order_by("karma", Order::Desc)
            .limit(10);
        assert_eq!(
            select.sql(&WRITER),
            indoc! {"
                SELECT name, karma FROM accounts
                 WHERE (banned = $banned) AND (karma IN ($karma, $karma1))
                 ORDER BY karma DESC LIMIT 10
            "}
            .trim()
            .replace('\n', "")
        );
        assert_eq!(select.parameters().len(), 3);
    }

    #[test]
    fn count_and_exists() {
        let filter = Where::new().eq("name", "ferris");
        assert_eq!(
            Count::new("accounts").filter(filter.clone()).sql(&WRITER),
            "SELECT COUNT(*) FROM accounts WHERE name = $name"
        );
        assert_eq!(
            Count::new("accounts").expression("DISTINCT name").sql(&WRITER),
            "SELECT COUNT(DISTINCT name) FROM accounts"
        );
        assert_eq!(
            Exists::new("accounts").filter(filter).sql(&WRITER),
            "SELECT COUNT(*) FROM accounts WHERE name = $name"
        );
    }

    #[test]
    fn insert() {
        let row = PreparedRow::new(
            vec![("name", "ferris".as_value()), ("karma", 3i64.as_value())],
            None,
        )
        .expect("Failed to prepare the row");
        assert_eq!(
            Insert::new("accounts").sql(&WRITER, &row),
            "INSERT INTO accounts (name, karma) VALUES ($name, $karma)"
        );
        assert_eq!(
            Insert::new("accounts")
                .conflict(Conflict::Replace)
                .sql(&WRITER, &row),
            "INSERT OR REPLACE INTO accounts (name, karma) VALUES ($name, $karma)"
        );
        let empty = PreparedRow::new(Vec::new(), None).expect("Failed to prepare the row");
        assert_eq!(
            Insert::new("accounts")
                .conflict(Conflict::Ignore)
                .sql(&WRITER, &empty),
            "INSERT OR IGNORE INTO accounts DEFAULT VALUES"
        );
    }

    #[test]
    fn insert_duplicate_column() {
        let error = PreparedRow::new(
            vec![("name", "a".as_value()), ("name", "b".as_value())],
            None,
        )
        .expect_err("The column appears twice");
        assert_eq!(
            error.downcast_ref::<QueryBuilderError>(),
            Some(&QueryBuilderError::DuplicateColumn("name".into()))
        );
    }

    #[test]
    fn update() {
        let update = Update::new(
            "accounts",
            vec![("karma", 5i64.as_value()), ("banned", true.as_value())],
            None,
        )
        .expect("Failed to build the update")
        .filter(|w| w.eq("karma", 4).or(|w| w.eq("banned", false).eq("name", "x")));
        assert_eq!(
            update.sql(&WRITER),
            indoc! {"
                UPDATE accounts SET karma = $karma, banned = $banned
                 WHERE (karma = $karma1) AND (banned = $banned1 OR name = $name)
            "}
            .trim()
            .replace('\n', "")
        );
        let parameters = update.parameters();
        assert_eq!(parameters.len(), 5);
        assert_eq!(parameters.get("$karma"), Some(&5i64.as_value()));
        assert_eq!(parameters.get("$karma1"), Some(&4i64.as_value()));

        let error = Update::new("accounts", Vec::new(), None).expect_err("Nothing to set");
        assert_eq!(
            error.downcast_ref::<QueryBuilderError>(),
            Some(&QueryBuilderError::EmptyUpdate)
        );
    }

    #[test]
    fn delete() {
        assert_eq!(Delete::new("accounts").sql(&WRITER), "DELETE FROM accounts");
        assert_eq!(
            Delete::new("accounts")
                .filter(Where::new().not_in("id", [1, 2, 3]))
                .sql(&WRITER),
            "DELETE FROM accounts WHERE id NOT IN ($id, $id1, $id2)"
        );
    }
}
