use crate::simple::Account;
use botdb::{Entity, Executor, TenantContext, Where};

pub async fn unique<E: Executor>(executor: &mut E) {
    let context = TenantContext::new("irc").with_tenant("#unique");
    Account::drop_table(executor, &context, true)
        .await
        .expect("Failed to drop the accounts table");
    Account::create_table(executor, &context, false)
        .await
        .expect("Failed to create the accounts table");

    let first = Account::make(executor, &context, Account::new("x"))
        .await
        .expect("Failed to make the first account");
    assert!(first.is_some());
    let second = Account::make(executor, &context, Account::new("x"))
        .await
        .expect("A unique violation must not be an error");
    assert!(second.is_none());
    assert_eq!(
        Account::count(executor, &context, Where::new().eq("name", "x"))
            .await
            .expect("Failed to count the accounts"),
        1
    );

    // Creating an existing table without `IF NOT EXISTS` fails
    crate::silent_logs! {
        let error = Account::create_table(executor, &context, false)
            .await
            .expect_err("The table already exists");
        assert!(error.downcast_ref::<botdb::QueryError>().is_some());
    }
}
