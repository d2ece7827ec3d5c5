use crate::simple::Account;
use botdb::{AsValue, Entity, Executor, TenantContext, Where};

async fn names<E: Executor>(
    executor: &mut E,
    context: &TenantContext,
    filter: Where,
) -> Vec<String> {
    Account::retrieve_all(executor, context, filter)
        .await
        .expect("Failed to retrieve the accounts")
        .into_iter()
        .map(|a| a.into_inner().name)
        .collect()
}

pub async fn predicates<E: Executor>(executor: &mut E) {
    let context = TenantContext::new("irc").with_tenant("#predicates");
    Account::drop_table(executor, &context, true)
        .await
        .expect("Failed to drop the accounts table");
    Account::create_table(executor, &context, true)
        .await
        .expect("Failed to create the accounts table");
    for (name, karma) in [("alice", 10), ("bob", -3), ("carol", 7), ("dave", 0)] {
        let mut account = Account::new(name);
        account.karma = karma;
        Account::make(executor, &context, account)
            .await
            .expect("Failed to make the account")
            .expect("The account should have been created");
    }

    assert_eq!(
        names(executor, &context, Where::new().is_in("name", ["bob", "dave", "zed"])).await,
        ["bob", "dave"]
    );
    assert_eq!(
        names(executor, &context, Where::new().not_in("name", ["bob", "dave"])).await,
        ["alice", "carol"]
    );
    assert!(
        names(executor, &context, Where::new().is_in("name", Vec::<String>::new()))
            .await
            .is_empty()
    );
    let filter = Where::new()
        .eq("banned", false)
        .or(|w| w.eq("name", "alice").eq("karma", -3));
    assert_eq!(names(executor, &context, filter).await, ["alice", "bob"]);
    let filter = Where::new().or(|w| {
        w.and(|w| w.eq("name", "carol").eq("karma", 7))
            .and(|w| w.eq("name", "dave").eq("karma", 1))
    });
    assert_eq!(names(executor, &context, filter).await, ["carol"]);

    // Update
    let affected = Account::update_entries(
        executor,
        &context,
        vec![("banned", true.as_value())],
        |w| w.is_in("name", ["bob", "dave"]),
    )
    .await
    .expect("Failed to update the accounts");
    assert_eq!(affected.rows_affected, 2);
    assert_eq!(
        Account::count(executor, &context, Where::new().eq("banned", true))
            .await
            .expect("Failed to count the accounts"),
        2
    );
    // The filter may use the same column as the row
    let affected = Account::update_entries(
        executor,
        &context,
        vec![("karma", 1i64.as_value())],
        |w| w.eq("karma", 0),
    )
    .await
    .expect("Failed to update the accounts");
    assert_eq!(affected.rows_affected, 1);
    let dave = Account::retrieve(executor, &context, Where::new().eq("name", "dave"))
        .await
        .expect("Failed to retrieve the account")
        .expect("The account should exist");
    assert_eq!(dave.karma, 1);
    assert!(dave.banned);
    // A filter built on its own keeps both values
    let affected = Account::update_entries(
        executor,
        &context,
        vec![("karma", 8i64.as_value())],
        |_| Where::new().eq("karma", 7),
    )
    .await
    .expect("Failed to update the accounts");
    assert_eq!(affected.rows_affected, 1);
    assert_eq!(
        names(executor, &context, Where::new().eq("karma", 8)).await,
        ["carol"]
    );
    let filter = Where::new()
        .eq("name", "alice")
        .or(|_| Where::new().eq("name", "carol").eq("name", "alice"));
    assert_eq!(names(executor, &context, filter).await, ["alice"]);

    // Remove
    assert!(
        Account::exists(executor, &context, Where::new().eq("name", "bob"))
            .await
            .expect("Failed to check the account")
    );
    let removed = Account::remove_entries(executor, &context, Where::new().eq("banned", true))
        .await
        .expect("Failed to remove the accounts");
    assert_eq!(removed.rows_affected, 2);
    assert!(
        !Account::exists(executor, &context, Where::new().eq("name", "bob"))
            .await
            .expect("Failed to check the account")
    );
    let removed = Account::remove_entries(executor, &context, Where::new().eq("name", "nobody"))
        .await
        .expect("Failed to remove the accounts");
    assert_eq!(removed.rows_affected, 0);
    assert_eq!(names(executor, &context, Where::new()).await, ["alice", "carol"]);
    Account::remove_entries(executor, &context, Where::new())
        .await
        .expect("Failed to remove the accounts");
    assert_eq!(
        Account::count(executor, &context, Where::new())
            .await
            .expect("Failed to count the accounts"),
        0
    );
}
