#[cfg(test)]
mod tests {
    use botdb::{
        AsValue, ColumnDef, ConfigurationError, Constraint, Entity, EntityBuilder, NamedRow,
        Result, RowLabeled, TenantContext, Value, register, registry::lookup,
    };

    struct Quote {
        text: String,
    }

    impl Entity for Quote {
        fn describe(builder: EntityBuilder) -> EntityBuilder {
            builder
                .id()
                .column(ColumnDef::of::<String>("text"))
                .table(|service, tenant, suffix| {
                    let mut name = format!("{}_{}_quotes", service, tenant.unwrap_or("global"));
                    if let Some(suffix) = suffix {
                        name.push('_');
                        name.push_str(suffix);
                    }
                    name
                })
                .import::<Quote>("previous", "id")
        }
        fn from_row(row: &RowLabeled) -> Result<Self> {
            Ok(Self {
                text: row.get("text")?,
            })
        }
        fn row(&self) -> NamedRow {
            vec![("text", self.text.clone().as_value())]
        }
    }

    struct Broken;

    impl Entity for Broken {
        fn describe(builder: EntityBuilder) -> EntityBuilder {
            builder.column(ColumnDef::of::<i64>("value"))
        }
        fn from_row(_row: &RowLabeled) -> Result<Self> {
            Ok(Self)
        }
        fn row(&self) -> NamedRow {
            Vec::new()
        }
    }

    struct Homeless;

    impl Entity for Homeless {
        fn describe(builder: EntityBuilder) -> EntityBuilder {
            builder.id()
        }
        fn from_row(_row: &RowLabeled) -> Result<Self> {
            Ok(Self)
        }
        fn row(&self) -> NamedRow {
            Vec::new()
        }
    }

    fn table(service: &str, tenant: Option<&str>, _: Option<&str>) -> String {
        format!("{}_{}_t", service, tenant.unwrap_or("global"))
    }

    #[test]
    fn register_once() {
        let first = register::<Quote>().expect("Failed to register the entity");
        let second = register::<Quote>().expect("Failed to register the entity");
        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(
            lookup::<Quote>().expect("The entity was registered"),
            first
        ));
        let names: Vec<_> = first.columns.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["id", "text"]);
        assert_eq!(first.columns[0].value, Value::Int64(None));
        assert!(first.columns[0].primary_key);
        assert!(first.relationship("previous").is_ok());
    }

    #[test]
    fn table_names() {
        let context = TenantContext::new("irc").with_tenant(" #Rust");
        assert_eq!(
            Quote::table_name(&context).expect("Failed to compute the table name"),
            "irc_rust_quotes"
        );
        assert_eq!(
            Quote::table_name(&context).expect("Failed to compute the table name"),
            Quote::table_name(&TenantContext::new("irc").with_tenant("rust"))
                .expect("Failed to compute the table name"),
        );
        assert_eq!(
            Quote::table_name(&TenantContext::new("discord"))
                .expect("Failed to compute the table name"),
            "discord_global_quotes"
        );
        assert_eq!(
            Quote::table_name(&context.clone().with_suffix("archive"))
                .expect("Failed to compute the table name"),
            "irc_rust_quotes_archive"
        );
    }

    #[test]
    fn register_failures() {
        let error = register::<Broken>().expect_err("The entity has no id");
        assert_eq!(
            error.downcast_ref::<ConfigurationError>(),
            Some(&ConfigurationError::MissingId(std::any::type_name::<Broken>()))
        );
        assert!(lookup::<Broken>().is_none());
        assert!(register::<Broken>().is_err());

        register::<Homeless>().expect("A table function is needed only when a table is used");
        let error = Homeless::table_name(&TenantContext::new("irc"))
            .expect_err("There is no table function");
        assert!(matches!(
            error.downcast_ref::<ConfigurationError>(),
            Some(ConfigurationError::MissingTable(..))
        ));
    }

    #[test]
    fn builder_errors() {
        assert_eq!(
            EntityBuilder::new("E").id().id().table(table).build().err(),
            Some(ConfigurationError::DuplicateId("E"))
        );
        assert_eq!(
            EntityBuilder::new("E")
                .id()
                .column(ColumnDef::of::<String>("a"))
                .column(ColumnDef::of::<i64>("a"))
                .build()
                .err(),
            Some(ConfigurationError::DuplicateColumn {
                entity: "E",
                column: "a".into()
            })
        );
        assert_eq!(
            EntityBuilder::new("E")
                .id()
                .column(ColumnDef::of::<i64>("id"))
                .build()
                .err(),
            Some(ConfigurationError::DuplicateColumn {
                entity: "E",
                column: "id".into()
            })
        );
        assert_eq!(
            EntityBuilder::new("E")
                .id()
                .column(ColumnDef::new("a", Value::Null))
                .build()
                .err(),
            Some(ConfigurationError::UntypedColumn {
                entity: "E",
                column: "a".into()
            })
        );
        assert_eq!(
            EntityBuilder::new("E")
                .id()
                .column(ColumnDef::of::<i64>("a"))
                .constraint(Constraint::unique("one", ["a"]))
                .constraint(Constraint::check("one", "a > 0"))
                .build()
                .err(),
            Some(ConfigurationError::DuplicateName {
                entity: "E",
                name: "one".into()
            })
        );
        assert_eq!(
            EntityBuilder::new("E")
                .id()
                .constraint(Constraint::unique("uq", ["missing"]))
                .build()
                .err(),
            Some(ConfigurationError::UnknownColumn {
                entity: "E",
                column: "missing".into()
            })
        );
        assert_eq!(
            EntityBuilder::new("E")
                .id()
                .column(ColumnDef::of::<i64>("a"))
                .constraint(Constraint::primary_key("pk", ["a"]))
                .build()
                .err(),
            Some(ConfigurationError::PrimaryKeyConflict("E"))
        );
        assert_eq!(
            EntityBuilder::new("E")
                .id()
                .import::<Quote>("quote", "quote_id")
                .build()
                .err(),
            Some(ConfigurationError::UnknownColumn {
                entity: "E",
                column: "quote_id".into()
            })
        );
        assert_eq!(
            EntityBuilder::new("E")
                .id()
                .column(ColumnDef::of::<i64>("quote"))
                .import::<Quote>("quote", "quote")
                .one_to_many::<Quote>("quote", "id", "id")
                .build()
                .err(),
            Some(ConfigurationError::DuplicateName {
                entity: "E",
                name: "quote".into()
            })
        );
    }

    #[test]
    fn builder_valid() {
        let descriptor = EntityBuilder::new("E")
            .id()
            .column(ColumnDef::of::<String>("nick").unique(true))
            .column(ColumnDef::of::<i64>("karma").nullable(true))
            .constraint(Constraint::unique("uq_nick_karma", ["nick", "karma"]))
            .table(table)
            .build()
            .expect("The declaration is valid");
        assert_eq!(descriptor.columns.len(), 3);
        assert!(
            descriptor
                .column("karma")
                .expect("The column exists")
                .nullable
        );
        assert!(descriptor.column("nick").expect("The column exists").unique);
        assert_eq!(
            descriptor
                .table_name(&TenantContext::new("irc").with_tenant("#A"))
                .expect("Failed to compute the table name"),
            "irc_a_t"
        );
        let error = descriptor
            .relationship("nothing")
            .expect_err("No relationship was declared");
        assert_eq!(
            error.downcast_ref::<ConfigurationError>(),
            Some(&ConfigurationError::UnknownRelationship {
                entity: "E",
                name: "nothing".into()
            })
        );
    }
}
