#[cfg(test)]
mod tests {
    use botdb_core::{Connection, Executor, Query, QueryResult, Value, stream::StreamExt};
    use botdb_sqlite::SqliteConnection;
    use botdb_tests::{init_logs, silent_logs};
    use std::{path::Path, pin::pin, sync::Mutex};
    use tokio::fs;

    static MUTEX: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn create_database() {
        init_logs();
        const DB_PATH: &'static str = "../target/debug/creation.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH)
                .await
                .expect(format!("Failed to remove test database file {}", DB_PATH).as_str());
        }
        SqliteConnection::connect(format!("sqlite://{}?mode=rwc", DB_PATH).into())
            .await
            .expect("Could not open the database");
        assert!(
            Path::new(DB_PATH).exists(),
            "Database file should be created after connection"
        );
        SqliteConnection::connect(format!("sqlite://{}?mode=ro", DB_PATH).into())
            .await
            .expect("Could not open the database");
        fs::remove_file(DB_PATH)
            .await
            .expect(format!("Failed to remove existing test database file {}", DB_PATH).as_str());
        silent_logs! {
            assert!(
                SqliteConnection::connect(format!("sqlite://{}?mode=ro", DB_PATH).into())
                    .await
                    .is_err(),
                "Should not be able to open in read only unexisting database"
            );
        }
    }

    #[tokio::test]
    async fn wrong_url() {
        silent_logs! {
            assert!(
                SqliteConnection::connect("postgres://some_value".into())
                    .await
                    .is_err()
            );
        }
    }

    #[tokio::test]
    async fn in_memory_raw_query() {
        init_logs();
        let mut connection = SqliteConnection::connect("sqlite://:memory:".into())
            .await
            .expect("Could not open an in memory database");
        let mut query = Query::Raw("SELECT 1 + 1 AS two".into());
        let mut stream = pin!(connection.run(&mut query));
        let Some(Ok(QueryResult::Row(row))) = stream.next().await else {
            panic!("Expected one row");
        };
        assert_eq!(row.get::<i64>("two").expect("Failed to read the column"), 2);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn more_than_one_statement() {
        let mut connection = SqliteConnection::connect("sqlite://:memory:".into())
            .await
            .expect("Could not open an in memory database");
        silent_logs! {
            assert!(
                connection
                    .prepare("SELECT 1; SELECT 2".into())
                    .await
                    .is_err()
            );
        }
        connection
            .prepare("SELECT 1;  ".into())
            .await
            .expect("Trailing whitespace should be accepted");
    }

    #[tokio::test]
    async fn bound_values_keep_their_length() {
        let mut connection = SqliteConnection::connect("sqlite://:memory:".into())
            .await
            .expect("Could not open an in memory database");
        let mut query = connection
            .prepare("SELECT length($text) AS chars, length($blob) AS bytes".into())
            .await
            .expect("Failed to prepare the query");
        query
            .bind("$text", &Value::Varchar(Some("çà ".repeat(10_000))))
            .expect("Failed to bind the text")
            .bind("$blob", &Value::Blob(Some(vec![7u8; 100_000].into())))
            .expect("Failed to bind the blob");
        let mut stream = pin!(connection.run(&mut query));
        let Some(Ok(QueryResult::Row(row))) = stream.next().await else {
            panic!("Expected one row");
        };
        assert_eq!(row.get::<i64>("chars").expect("Failed to read the column"), 30_000);
        assert_eq!(row.get::<i64>("bytes").expect("Failed to read the column"), 100_000);
    }
}
