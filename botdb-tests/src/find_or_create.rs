use crate::simple::Account;
use botdb::{Entity, Executor, TenantContext, Where};

pub async fn find_or_create<E: Executor>(executor: &mut E) {
    let context = TenantContext::new("irc").with_tenant("#find");
    Account::drop_table(executor, &context, true)
        .await
        .expect("Failed to drop the accounts table");
    Account::create_table(executor, &context, true)
        .await
        .expect("Failed to create the accounts table");

    let filter = Where::new().eq("name", "op");
    let first = Account::retrieve_or_make(executor, &context, filter.clone(), Account::new("op"))
        .await
        .expect("Failed to find or create")
        .expect("The account should have been created");
    let mut seed = Account::new("op");
    seed.karma = 100;
    let second = Account::retrieve_or_make(executor, &context, filter, seed)
        .await
        .expect("Failed to find or create")
        .expect("The account should have been found");
    assert_eq!(first.id(), second.id());
    assert_eq!(second.karma, 0);
    assert_eq!(
        Account::count(executor, &context, Where::new())
            .await
            .expect("Failed to count the accounts"),
        1
    );

    // The filter does not match but the seed conflicts: the existing row is not returned
    let third = Account::retrieve_or_make(
        executor,
        &context,
        Where::new().eq("name", "other"),
        Account::new("op"),
    )
    .await
    .expect("Failed to find or create");
    assert!(third.is_none());
}
