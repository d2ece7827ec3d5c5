use crate::simple::Account;
use botdb::{
    Connection, Entity, Insert, QueryBuilderError, SharedConnection, TenantContext, Value, Where,
    is_unique_violation,
};
use std::iter;

pub async fn batch<C: Connection>(connection: &SharedConnection<C>) {
    let context = TenantContext::new("irc").with_tenant("#batch");
    let mut executor = connection.clone();
    Account::drop_table(&mut executor, &context, true)
        .await
        .expect("Failed to drop the accounts table");
    Account::create_table(&mut executor, &context, true)
        .await
        .expect("Failed to create the accounts table");
    let table = Account::table_name(&context).expect("Failed to get the table name");
    let schema = Account::schema().expect("Failed to get the schema");
    let insert = Insert::new(table.as_str()).schema(schema);

    // The batch runs on the locked connection, no other statement can interleave
    let mut guard = connection.lock().await;
    let ids = insert
        .run_batch(
            &mut guard,
            ["a", "b", "c"]
                .into_iter()
                .map(|name| Account::new(name).row())
                .collect(),
        )
        .await
        .expect("Failed to insert the batch");
    assert_eq!(ids, [Some(1), Some(2), Some(3)]);
    assert!(
        insert
            .run_batch(&mut guard, Vec::new())
            .await
            .expect("Failed to insert an empty batch")
            .is_empty()
    );

    // A failing row rolls back the whole batch
    let error = crate::silent_logs! {
        insert
            .run_batch(
                &mut guard,
                ["d", "e", "a", "f"]
                    .into_iter()
                    .map(|name| Account::new(name).row())
                    .collect(),
            )
            .await
            .expect_err("The duplicate row must fail the batch")
    };
    assert!(is_unique_violation(&error));

    // Rows with different columns are rejected before anything is sent
    let error = insert
        .run_batch(
            &mut guard,
            vec![
                Account::new("g").row(),
                vec![("name", Value::Varchar(Some("h".into())))],
            ],
        )
        .await
        .expect_err("Mismatched rows must be rejected");
    assert!(matches!(
        error.downcast_ref::<QueryBuilderError>(),
        Some(QueryBuilderError::MismatchedRow { .. })
    ));
    drop(guard);

    // Failing batches on a shared handle never roll back the writes of other handles
    let other = TenantContext::new("irc").with_tenant("#batch-other");
    let mut writer = connection.clone();
    Account::drop_table(&mut writer, &other, true)
        .await
        .expect("Failed to drop the accounts table");
    Account::create_table(&mut writer, &other, true)
        .await
        .expect("Failed to create the accounts table");
    let batches = async {
        let mut executor = connection.clone();
        for round in 0..5 {
            let rows = (0..20)
                .map(|i| Account::new(&format!("r{}_{}", round, i)).row())
                .chain(iter::once(Account::new("a").row()))
                .collect();
            let error = insert
                .run_batch(&mut executor, rows)
                .await
                .expect_err("The duplicate row must fail the batch");
            assert!(is_unique_violation(&error));
        }
    };
    let writes = async {
        for i in 0..50 {
            Account::make(&mut writer, &other, Account::new(&format!("w{}", i)))
                .await
                .expect("Failed to make the account")
                .expect("The account should have been created");
            tokio::task::yield_now().await;
        }
    };
    crate::silent_logs! {
        tokio::join!(batches, writes)
    };
    assert_eq!(
        Account::count(&mut writer, &other, Where::new())
            .await
            .expect("Failed to count the accounts"),
        50
    );

    assert_eq!(
        Account::count(&mut executor, &context, Where::new())
            .await
            .expect("Failed to count the accounts"),
        3
    );
    assert!(
        !Account::exists(
            &mut executor,
            &context,
            Where::new().is_in("name", ["d", "e", "f", "g"])
        )
        .await
        .expect("Failed to check the accounts")
    );
}
