use botdb::{
    AsValue, ColumnDef, ConfigurationError, Constraint, Entity, EntityBuilder, Executor,
    Instance, NamedRow, Result, RowLabeled, TenantContext, Where,
};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct Channel {
    name: String,
}

impl Entity for Channel {
    fn describe(builder: EntityBuilder) -> EntityBuilder {
        builder
            .id()
            .column(ColumnDef::of::<String>("name").unique(true))
            .table(|service, tenant, _| {
                format!("{}_{}_channels", service, tenant.unwrap_or("global"))
            })
            .one_to_one::<Settings>("settings", "id", "channel")
            .one_to_many::<Member>("members", "id", "channel")
            .many_to_many::<ChannelTag, Tag>("tags", "id", "channel", "tag", "id")
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            name: row.get("name")?,
        })
    }

    fn row(&self) -> NamedRow {
        vec![("name", self.name.clone().as_value())]
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Settings {
    channel: i64,
    greeting: String,
}

impl Entity for Settings {
    fn describe(builder: EntityBuilder) -> EntityBuilder {
        builder
            .id()
            .column(
                ColumnDef::of::<i64>("channel")
                    .unique(true)
                    .references::<Channel>("id"),
            )
            .column(ColumnDef::of::<String>("greeting"))
            .table(|service, tenant, _| {
                format!("{}_{}_settings", service, tenant.unwrap_or("global"))
            })
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            channel: row.get("channel")?,
            greeting: row.get("greeting")?,
        })
    }

    fn row(&self) -> NamedRow {
        vec![
            ("channel", self.channel.as_value()),
            ("greeting", self.greeting.clone().as_value()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Member {
    channel: i64,
    nick: String,
}

impl Entity for Member {
    fn describe(builder: EntityBuilder) -> EntityBuilder {
        builder
            .id()
            .column(ColumnDef::of::<i64>("channel").references::<Channel>("id"))
            .column(ColumnDef::of::<String>("nick"))
            .constraint(Constraint::unique("member_once", ["channel", "nick"]))
            .table(|service, tenant, _| {
                format!("{}_{}_members", service, tenant.unwrap_or("global"))
            })
            .import::<Channel>("channel_of", "channel")
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            channel: row.get("channel")?,
            nick: row.get("nick")?,
        })
    }

    fn row(&self) -> NamedRow {
        vec![
            ("channel", self.channel.as_value()),
            ("nick", self.nick.clone().as_value()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Tag {
    label: String,
}

impl Entity for Tag {
    fn describe(builder: EntityBuilder) -> EntityBuilder {
        builder
            .id()
            .column(ColumnDef::of::<String>("label"))
            .table(|service, tenant, _| {
                format!("{}_{}_tags", service, tenant.unwrap_or("global"))
            })
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            label: row.get("label")?,
        })
    }

    fn row(&self) -> NamedRow {
        vec![("label", self.label.clone().as_value())]
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ChannelTag {
    channel: i64,
    tag: i64,
}

impl Entity for ChannelTag {
    fn describe(builder: EntityBuilder) -> EntityBuilder {
        builder
            .id()
            .column(ColumnDef::of::<i64>("channel").references::<Channel>("id"))
            .column(ColumnDef::of::<i64>("tag").references::<Tag>("id"))
            .table(|service, tenant, _| {
                format!("{}_{}_channel_tags", service, tenant.unwrap_or("global"))
            })
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            channel: row.get("channel")?,
            tag: row.get("tag")?,
        })
    }

    fn row(&self) -> NamedRow {
        vec![("channel", self.channel.as_value()), ("tag", self.tag.as_value())]
    }
}

async fn make<T: Entity, E: Executor>(
    executor: &mut E,
    context: &TenantContext,
    value: T,
) -> Instance<T> {
    T::make(executor, context, value)
        .await
        .expect("Failed to make the entity")
        .expect("The entity should have been created")
}

pub async fn relationships<E: Executor + Clone>(executor: &mut E) {
    let context = TenantContext::new("irc").with_tenant("#relations");
    ChannelTag::drop_table(executor, &context, true)
        .await
        .expect("Failed to drop the channel tags table");
    Member::drop_table(executor, &context, true)
        .await
        .expect("Failed to drop the members table");
    Settings::drop_table(executor, &context, true)
        .await
        .expect("Failed to drop the settings table");
    Tag::drop_table(executor, &context, true)
        .await
        .expect("Failed to drop the tags table");
    Channel::drop_table(executor, &context, true)
        .await
        .expect("Failed to drop the channels table");
    Channel::create_table(executor, &context, true)
        .await
        .expect("Failed to create the channels table");
    Settings::create_table(executor, &context, true)
        .await
        .expect("Failed to create the settings table");
    Member::create_table(executor, &context, true)
        .await
        .expect("Failed to create the members table");
    Tag::create_table(executor, &context, true)
        .await
        .expect("Failed to create the tags table");
    ChannelTag::create_table(executor, &context, true)
        .await
        .expect("Failed to create the channel tags table");

    let rust = make(executor, &context, Channel { name: "rust".into() }).await;
    let quiet = make(executor, &context, Channel { name: "quiet".into() }).await;
    make(
        executor,
        &context,
        Settings {
            channel: rust.id(),
            greeting: "Welcome!".into(),
        },
    )
    .await;
    for nick in ["ferris", "crab"] {
        make(
            executor,
            &context,
            Member {
                channel: rust.id(),
                nick: nick.into(),
            },
        )
        .await;
    }
    let mut tags = Vec::new();
    for label in ["lang", "systems", "unused"] {
        tags.push(make(executor, &context, Tag { label: label.into() }).await);
    }
    for tag in &tags[..2] {
        make(
            executor,
            &context,
            ChannelTag {
                channel: rust.id(),
                tag: tag.id(),
            },
        )
        .await;
    }

    // One to one
    let settings = rust
        .one_to_one::<Settings, _>(executor, "settings")
        .await
        .expect("Failed to get the settings")
        .expect("The channel has settings");
    assert_eq!(settings.greeting, "Welcome!");
    assert!(
        quiet
            .one_to_one::<Settings, _>(executor, "settings")
            .await
            .expect("Failed to get the settings")
            .is_none()
    );

    // One to many
    let members = rust
        .one_to_many::<Member, _>(executor, "members")
        .await
        .expect("Failed to get the members");
    let nicks: Vec<_> = members.iter().map(|m| m.nick.as_str()).collect();
    assert_eq!(nicks, ["ferris", "crab"]);
    assert!(
        quiet
            .one_to_many::<Member, _>(executor, "members")
            .await
            .expect("Failed to get the members")
            .is_empty()
    );

    // Many to many
    let linked = rust
        .many_to_many::<ChannelTag, Tag, _>(&*executor, "tags")
        .await
        .expect("Failed to get the tags");
    let mut labels: Vec<_> = linked.iter().map(|t| t.label.clone()).collect();
    labels.sort();
    assert_eq!(labels, ["lang", "systems"]);

    // Import
    let member = Member::retrieve(executor, &context, Where::new().eq("nick", "crab"))
        .await
        .expect("Failed to retrieve the member")
        .expect("The member should exist");
    let channel = member
        .import::<Channel, _>(executor, "channel_of")
        .await
        .expect("Failed to import the channel")
        .expect("The channel should exist");
    assert_eq!(channel.id(), rust.id());
    assert_eq!(channel.name, "rust");

    // Results are memoized per instance
    Member::remove_entries(executor, &context, Where::new())
        .await
        .expect("Failed to remove the members");
    let cached = rust
        .one_to_many::<Member, _>(executor, "members")
        .await
        .expect("Failed to get the members");
    assert!(Arc::ptr_eq(&cached, &members));
    let fresh = Channel::get(executor, &context, rust.id())
        .await
        .expect("Failed to get the channel")
        .expect("The channel should exist");
    assert!(
        fresh
            .one_to_many::<Member, _>(executor, "members")
            .await
            .expect("Failed to get the members")
            .is_empty()
    );

    // Wrong names, kinds or targets
    let error = rust
        .one_to_one::<Settings, _>(executor, "missing")
        .await
        .expect_err("The relationship does not exist");
    assert!(matches!(
        error.downcast_ref::<ConfigurationError>(),
        Some(ConfigurationError::UnknownRelationship { .. })
    ));
    let error = rust
        .one_to_one::<Member, _>(executor, "members")
        .await
        .expect_err("The relationship is one to many");
    assert!(matches!(
        error.downcast_ref::<ConfigurationError>(),
        Some(ConfigurationError::RelationshipMismatch { .. })
    ));
    assert!(
        rust.one_to_many::<Tag, _>(executor, "members")
            .await
            .is_err()
    );
}
