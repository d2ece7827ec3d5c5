use botdb::{
    AsValue, ColumnDef, Entity, EntityBuilder, Executor, InstanceError, InstanceState, NamedRow,
    Result, RowLabeled, TenantContext, Where,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub name: String,
    pub banned: bool,
    pub karma: i64,
}

impl Entity for Account {
    fn describe(builder: EntityBuilder) -> EntityBuilder {
        builder
            .id()
            .column(ColumnDef::of::<String>("name").unique(true))
            .column(ColumnDef::of::<bool>("banned"))
            .column(ColumnDef::of::<i64>("karma"))
            .table(|service, tenant, _| {
                format!("{}_{}_accounts", service, tenant.unwrap_or("global"))
            })
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            name: row.get("name")?,
            banned: row.get("banned")?,
            karma: row.get("karma")?,
        })
    }

    fn row(&self) -> NamedRow {
        vec![
            ("name", self.name.clone().as_value()),
            ("banned", self.banned.as_value()),
            ("karma", self.karma.as_value()),
        ]
    }
}

impl Account {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            banned: false,
            karma: 0,
        }
    }
}

pub async fn simple<E: Executor>(executor: &mut E) {
    let context = TenantContext::new("irc").with_tenant("#simple");
    Account::drop_table(executor, &context, true)
        .await
        .expect("Failed to drop the accounts table");
    Account::create_table(executor, &context, true)
        .await
        .expect("Failed to create the accounts table");

    // Empty table
    let accounts = Account::get_all(executor, &context)
        .await
        .expect("Failed to retrieve all the accounts");
    assert!(accounts.is_empty());
    assert!(
        Account::retrieve(executor, &context, Where::new().eq("name", "a"))
            .await
            .expect("Failed to retrieve an account")
            .is_none()
    );

    // Make and retrieve
    let made = Account::make(executor, &context, Account::new("a"))
        .await
        .expect("Failed to make the account")
        .expect("The account should have been created");
    assert_eq!(made.id(), 1);
    assert_eq!(made.state(), InstanceState::Bound);
    let found = Account::retrieve(executor, &context, Where::new().eq("name", "a"))
        .await
        .expect("Failed to retrieve the account")
        .expect("The account should exist");
    assert_eq!(found.id(), 1);
    assert!(!found.banned);
    assert_eq!(*found, Account::new("a"));

    // Save an unbound instance
    let mut instance = botdb::Instance::new(context.clone(), Account::new("b"));
    assert_eq!(instance.id(), 0);
    assert_eq!(instance.state(), InstanceState::Unbound);
    assert!(
        !instance
            .load(executor)
            .await
            .expect("Failed to load an unbound instance")
    );
    instance
        .save(executor)
        .await
        .expect("Failed to save the new account");
    assert_eq!(instance.id(), 2);
    assert_eq!(instance.state(), InstanceState::Bound);

    // Save a bound instance replaces its row
    instance.banned = true;
    instance.karma = 42;
    instance
        .save(executor)
        .await
        .expect("Failed to save the changed account");
    assert_eq!(instance.id(), 2);
    let mut reloaded = Account::get(executor, &context, 2)
        .await
        .expect("Failed to get the account")
        .expect("The account should exist");
    assert!(reloaded.banned);
    assert_eq!(reloaded.karma, 42);
    assert_eq!(
        Account::count(executor, &context, Where::new())
            .await
            .expect("Failed to count the accounts"),
        2
    );

    // Load discards local changes
    reloaded.karma = 0;
    assert!(
        reloaded
            .load(executor)
            .await
            .expect("Failed to reload the account")
    );
    assert_eq!(reloaded.karma, 42);

    // Delete
    instance
        .delete(executor)
        .await
        .expect("Failed to delete the account");
    assert_eq!(instance.state(), InstanceState::Deleted);
    assert!(
        Account::get(executor, &context, 2)
            .await
            .expect("Failed to get the account")
            .is_none()
    );
    let error = instance
        .save(executor)
        .await
        .expect_err("Saving a deleted instance must fail");
    assert_eq!(
        error.downcast_ref::<InstanceError>(),
        Some(&InstanceError::Deleted(std::any::type_name::<Account>()))
    );
    assert!(instance.delete(executor).await.is_err());
    let mut unbound = botdb::Instance::new(context.clone(), Account::new("c"));
    let error = unbound
        .delete(executor)
        .await
        .expect_err("Deleting an unbound instance must fail");
    assert!(matches!(
        error.downcast_ref::<InstanceError>(),
        Some(InstanceError::Unbound(..))
    ));
    assert!(
        !reloaded
            .load(executor)
            .await
            .expect("Failed to reload the deleted account")
    );
}
