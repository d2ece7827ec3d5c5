#[cfg(test)]
mod tests {
    use botdb::{
        AsEnum, AsValue, CoercionError, ColumnDef, EntityBuilder, EntityDescriptor, RowLabeled,
        Schema, Value, enum_as_value,
    };
    use std::sync::Arc;
    use time::{OffsetDateTime, macros::datetime};

    #[derive(Debug, PartialEq)]
    enum Mode {
        Moderated,
        Secret,
    }

    impl AsEnum for Mode {
        const VARIANTS: &'static [&'static str] = &["moderated", "secret"];
        fn name(&self) -> &'static str {
            match self {
                Mode::Moderated => "moderated",
                Mode::Secret => "secret",
            }
        }
        fn from_name(name: &str) -> Option<Self> {
            match name {
                "moderated" => Some(Mode::Moderated),
                "secret" => Some(Mode::Secret),
                _ => None,
            }
        }
    }

    enum_as_value!(Mode);

    fn descriptor() -> EntityDescriptor {
        EntityBuilder::new("Channel")
            .id()
            .column(ColumnDef::of::<String>("name"))
            .column(ColumnDef::of::<bool>("active"))
            .column(ColumnDef::of::<f64>("ratio"))
            .column(ColumnDef::of::<OffsetDateTime>("created"))
            .column(ColumnDef::of::<Vec<String>>("aliases"))
            .column(ColumnDef::of::<Mode>("mode"))
            .column(ColumnDef::of::<String>("topic").nullable(true))
            .build()
            .expect("The declaration is valid")
    }

    #[test]
    fn schema_export() {
        let descriptor = descriptor();
        let schema = Schema::new(&descriptor);
        let row = schema
            .export_row(vec![
                ("name", "rust".as_value()),
                ("active", true.as_value()),
                ("created", datetime!(2024-03-01 12:30:00 +02:00).as_value()),
                ("aliases", vec!["rs".to_string(), "ferris".into()].as_value()),
                ("mode", Mode::Secret.as_value()),
                ("topic", None::<String>.as_value()),
            ])
            .expect("Failed to export the row");
        assert_eq!(
            row,
            [
                ("name", Value::Varchar(Some("rust".into()))),
                ("active", Value::Int64(Some(1))),
                ("created", Value::Varchar(Some("2024-03-01T10:30:00Z".into()))),
                ("aliases", Value::Varchar(Some("rs,ferris".into()))),
                ("mode", Value::Varchar(Some("secret".into()))),
                ("topic", Value::Null),
            ]
        );
        assert_eq!(
            schema.export("aliases", Vec::<String>::new().as_value()),
            Ok(Value::Varchar(Some("".into())))
        );
        assert_eq!(
            schema.export("mode", "moderated".as_value()),
            Ok(Value::Varchar(Some("moderated".into())))
        );
    }

    #[test]
    fn schema_export_failures() {
        let descriptor = descriptor();
        let schema = Schema::new(&descriptor);
        assert_eq!(
            schema.export("name", Value::Varchar(None)),
            Err(CoercionError::Null("name".into()))
        );
        assert!(matches!(
            schema.export("ratio", 1i64.as_value()),
            Err(CoercionError::TypeMismatch { .. })
        ));
        assert_eq!(
            schema.export("mode", "invisible".as_value()),
            Err(CoercionError::UndeclaredVariant {
                column: "mode".into(),
                value: "invisible".into(),
                variants: Mode::VARIANTS,
            })
        );
        assert_eq!(
            schema.export("aliases", vec!["a,b".to_string()].as_value()),
            Err(CoercionError::ListElement {
                column: "aliases".into(),
                element: "a,b".into(),
            })
        );
        assert!(matches!(
            schema.export("aliases", vec![String::new()].as_value()),
            Err(CoercionError::ListElement { .. })
        ));
        assert!(matches!(
            schema.export("missing", 1i64.as_value()),
            Err(CoercionError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn schema_import() {
        let descriptor = descriptor();
        let schema = Schema::new(&descriptor);
        assert_eq!(
            schema.import("active", Value::Int64(Some(0))),
            Ok(Value::Boolean(Some(false)))
        );
        assert_eq!(
            schema.import("ratio", Value::Int64(Some(2))),
            Ok(Value::Float64(Some(2.0)))
        );
        assert_eq!(
            schema.import("created", Value::Varchar(Some("2024-03-01T10:30:00Z".into()))),
            Ok(Value::Timestamp(Some(datetime!(2024-03-01 10:30:00 UTC))))
        );
        assert_eq!(
            schema.import("aliases", Value::Varchar(Some("".into()))),
            Ok(Value::StringList(Some(Vec::new())))
        );
        assert_eq!(
            schema.import("topic", Value::Null),
            Ok(Value::Varchar(None))
        );
        assert!(matches!(
            schema.import("created", Value::Varchar(Some("yesterday".into()))),
            Err(CoercionError::Date { .. })
        ));
        assert!(matches!(
            schema.import("mode", Value::Varchar(Some("invisible".into()))),
            Err(CoercionError::UndeclaredVariant { .. })
        ));
        let mode = schema
            .import("mode", Value::Varchar(Some("moderated".into())))
            .expect("Failed to import the value");
        assert_eq!(
            Mode::try_from_value(mode).expect("Failed to convert the value"),
            Mode::Moderated
        );
    }

    #[test]
    fn schema_import_row() {
        let descriptor = descriptor();
        let schema = Schema::new(&descriptor);
        let labels: Arc<[String]> = ["id", "active", "aliases"].map(String::from).into();
        let row = schema
            .import_row(RowLabeled::new(
                labels,
                [
                    Value::Int64(Some(7)),
                    Value::Int64(Some(1)),
                    Value::Varchar(Some("a,b".into())),
                ]
                .into(),
            ))
            .expect("Failed to import the row");
        assert_eq!(row.get::<i64>("id").expect("The column exists"), 7);
        assert!(row.get::<bool>("active").expect("The column exists"));
        assert_eq!(
            row.get::<Vec<String>>("aliases").expect("The column exists"),
            ["a", "b"]
        );

        let labels: Arc<[String]> = ["id", "extra"].map(String::from).into();
        let error = schema
            .import_row(RowLabeled::new(
                labels,
                [Value::Int64(Some(7)), Value::Int64(Some(1))].into(),
            ))
            .expect_err("The column is not declared");
        assert_eq!(
            error,
            CoercionError::UnknownColumn {
                entity: "Channel",
                column: "extra".into(),
            }
        );
    }
}
