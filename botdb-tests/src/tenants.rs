use crate::simple::Account;
use botdb::{ConfigurationError, Entity, Executor, TenantContext, Where};

pub async fn tenants<E: Executor>(executor: &mut E) {
    let general = TenantContext::new("irc").with_tenant("#General");
    let random = TenantContext::new("irc").with_tenant("#random");
    let discord = TenantContext::new("discord").with_tenant("general");

    // Deterministic and distinct table names
    let name = Account::table_name(&general).expect("Failed to get the table name");
    assert_eq!(name, "irc_general_accounts");
    assert_eq!(
        Account::table_name(&TenantContext::new("irc").with_tenant("general"))
            .expect("Failed to get the table name"),
        name
    );
    assert_ne!(
        Account::table_name(&random).expect("Failed to get the table name"),
        name
    );
    assert_ne!(
        Account::table_name(&discord).expect("Failed to get the table name"),
        name
    );

    for context in [&general, &random, &discord] {
        Account::drop_table(executor, context, true)
            .await
            .expect("Failed to drop the accounts table");
        Account::create_table(executor, context, true)
            .await
            .expect("Failed to create the accounts table");
    }

    // The same unique value lives independently in each tenant
    for context in [&general, &random, &discord] {
        Account::make(executor, context, Account::new("nick"))
            .await
            .expect("Failed to make the account")
            .expect("Every tenant has its own table");
    }
    let mut banned = Account::new("troll");
    banned.banned = true;
    Account::make(executor, &random, banned)
        .await
        .expect("Failed to make the account")
        .expect("The account should have been created");

    assert_eq!(
        Account::count(executor, &general, Where::new())
            .await
            .expect("Failed to count the accounts"),
        1
    );
    assert_eq!(
        Account::count(executor, &random, Where::new())
            .await
            .expect("Failed to count the accounts"),
        2
    );
    assert!(
        !Account::exists(executor, &general, Where::new().eq("name", "troll"))
            .await
            .expect("Failed to check the account")
    );
    assert!(
        Account::exists(executor, &random, Where::new().eq("name", "troll"))
            .await
            .expect("Failed to check the account")
    );

    // Instances keep the context they were created with
    let instance = Account::retrieve(executor, &random, Where::new().eq("name", "troll"))
        .await
        .expect("Failed to retrieve the account")
        .expect("The account should exist");
    assert_eq!(instance.context(), &random);
    assert_eq!(
        instance.table_name().expect("Failed to get the table name"),
        "irc_random_accounts"
    );

    // Entities without a table name function cannot be used
    let error = NoTable::table_name(&general).expect_err("There is no table name function");
    assert_eq!(
        error.downcast_ref::<ConfigurationError>(),
        Some(&ConfigurationError::MissingTable(std::any::type_name::<NoTable>()))
    );
    assert!(
        NoTable::get_all(executor, &general).await.is_err(),
        "Queries need a table name"
    );
}

struct NoTable;

impl Entity for NoTable {
    fn describe(builder: botdb::EntityBuilder) -> botdb::EntityBuilder {
        builder.id()
    }

    fn from_row(_row: &botdb::RowLabeled) -> botdb::Result<Self> {
        Ok(Self)
    }

    fn row(&self) -> botdb::NamedRow {
        Vec::new()
    }
}
