use botdb::{
    AsEnum, AsValue, CoercionError, ColumnDef, Entity, EntityBuilder, Executor, NamedRow, Result,
    RowLabeled, TenantContext, Value, Where, enum_as_value,
};
use time::{OffsetDateTime, macros::datetime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Voice,
    Op,
    Owner,
}

impl AsEnum for Role {
    const VARIANTS: &'static [&'static str] = &["voice", "op", "owner"];

    fn name(&self) -> &'static str {
        match self {
            Role::Voice => "voice",
            Role::Op => "op",
            Role::Owner => "owner",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "voice" => Some(Role::Voice),
            "op" => Some(Role::Op),
            "owner" => Some(Role::Owner),
            _ => None,
        }
    }
}

enum_as_value!(Role);

#[derive(Debug, Clone, PartialEq)]
struct Profile {
    nick: String,
    role: Role,
    aliases: Vec<String>,
    seen: OffsetDateTime,
    score: f64,
    note: Option<String>,
    avatar: Option<Box<[u8]>>,
}

impl Entity for Profile {
    fn describe(builder: EntityBuilder) -> EntityBuilder {
        builder
            .id()
            .column(ColumnDef::of::<String>("nick"))
            .column(ColumnDef::of::<Role>("role"))
            .column(ColumnDef::of::<Vec<String>>("aliases"))
            .column(ColumnDef::of::<OffsetDateTime>("seen"))
            .column(ColumnDef::of::<f64>("score"))
            .column(ColumnDef::of::<String>("note").nullable(true))
            .column(ColumnDef::of::<Box<[u8]>>("avatar").nullable(true))
            .table(|service, tenant, suffix| {
                format!(
                    "{}_{}_profiles{}",
                    service,
                    tenant.unwrap_or("global"),
                    suffix.map(|s| format!("_{}", s)).unwrap_or_default()
                )
            })
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            nick: row.get("nick")?,
            role: row.get("role")?,
            aliases: row.get("aliases")?,
            seen: row.get("seen")?,
            score: row.get("score")?,
            note: row.get("note")?,
            avatar: row.get("avatar")?,
        })
    }

    fn row(&self) -> NamedRow {
        vec![
            ("nick", self.nick.clone().as_value()),
            ("role", self.role.as_value()),
            ("aliases", self.aliases.clone().as_value()),
            ("seen", self.seen.as_value()),
            ("score", self.score.as_value()),
            ("note", self.note.clone().as_value()),
            ("avatar", self.avatar.clone().as_value()),
        ]
    }
}

pub async fn coercion<E: Executor>(executor: &mut E) {
    let context = TenantContext::new("irc")
        .with_tenant("#coercion")
        .with_suffix("v2");
    assert_eq!(
        Profile::table_name(&context).expect("Failed to get the table name"),
        "irc_coercion_profiles_v2"
    );
    Profile::drop_table(executor, &context, true)
        .await
        .expect("Failed to drop the profiles table");
    Profile::create_table(executor, &context, true)
        .await
        .expect("Failed to create the profiles table");

    // Round trip of every type
    let full = Profile {
        nick: "alice".into(),
        role: Role::Op,
        aliases: vec!["al".into(), "ally".into()],
        seen: datetime!(2024-02-29 23:30:15.5 +02:00),
        score: 12.75,
        note: Some("likes tea".into()),
        avatar: Some([0u8, 1, 2, 255].into()),
    };
    let empty = Profile {
        nick: "bob".into(),
        role: Role::Voice,
        aliases: Vec::new(),
        seen: datetime!(1999-12-31 23:59:59 UTC),
        score: 3.0,
        note: None,
        avatar: None,
    };
    for profile in [full, empty] {
        let made = Profile::make(executor, &context, profile.clone())
            .await
            .expect("Failed to make the profile")
            .expect("The profile should have been created");
        assert_eq!(*made, profile);
        let filter = Where::new().eq("nick", profile.nick.clone());
        let found = Profile::retrieve(executor, &context, filter)
            .await
            .expect("Failed to retrieve the profile")
            .expect("The profile should exist");
        assert_eq!(found.into_inner(), profile);
    }
    assert_eq!(
        Profile::count(executor, &context, Where::new().eq("role", Role::Op))
            .await
            .expect("Failed to count the profiles"),
        1
    );

    // Undeclared enum values fail before any statement is sent
    let error = Profile::update_entries(
        executor,
        &context,
        vec![("role", Value::Varchar(Some("emperor".into())))],
        |w| w.eq("nick", "alice"),
    )
    .await
    .expect_err("An undeclared variant must be rejected");
    assert!(matches!(
        error.downcast_ref::<CoercionError>(),
        Some(CoercionError::UndeclaredVariant { .. })
    ));
    assert!(
        !Profile::exists(executor, &context, Where::new().eq("role", "emperor"))
            .await
            .expect("Failed to check the profiles")
    );

    // Elements containing the separator cannot be stored
    let mut broken = Profile {
        nick: "carol".into(),
        role: Role::Owner,
        aliases: vec!["a,b".into()],
        seen: OffsetDateTime::UNIX_EPOCH,
        score: 0.0,
        note: None,
        avatar: None,
    };
    let error = Profile::make(executor, &context, broken.clone())
        .await
        .expect_err("A list element with a comma must be rejected");
    assert!(matches!(
        error.downcast_ref::<CoercionError>(),
        Some(CoercionError::ListElement { .. })
    ));
    broken.aliases = vec![String::new()];
    assert!(Profile::make(executor, &context, broken).await.is_err());

    // Null in a column that is not nullable
    let error = Profile::update_entries(
        executor,
        &context,
        vec![("nick", Value::Varchar(None))],
        |w| w,
    )
    .await
    .expect_err("Null nick must be rejected");
    assert_eq!(
        error.downcast_ref::<CoercionError>(),
        Some(&CoercionError::Null("nick".into()))
    );

    // Unknown columns
    let error = Profile::update_entries(
        executor,
        &context,
        vec![("missing", 1i64.as_value())],
        |w| w,
    )
    .await
    .expect_err("Unknown columns must be rejected");
    assert!(matches!(
        error.downcast_ref::<CoercionError>(),
        Some(CoercionError::UnknownColumn { .. })
    ));

    // Valid update through the coercion
    let affected = Profile::update_entries(
        executor,
        &context,
        vec![("role", Role::Owner.as_value()), ("note", Value::Varchar(None))],
        |w| w.eq("nick", "alice"),
    )
    .await
    .expect("Failed to update the profile");
    assert_eq!(affected.rows_affected, 1);
    let alice = Profile::retrieve(executor, &context, Where::new().eq("nick", "alice"))
        .await
        .expect("Failed to retrieve the profile")
        .expect("The profile should exist");
    assert_eq!(alice.role, Role::Owner);
    assert_eq!(alice.note, None);
    assert_eq!(
        Profile::count(executor, &context, Where::new())
            .await
            .expect("Failed to count the profiles"),
        2
    );
}
