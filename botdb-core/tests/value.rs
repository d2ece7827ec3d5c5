#[cfg(test)]
mod tests {
    use botdb_core::{AsEnum, AsValue, Value, enum_as_value};
    use time::{OffsetDateTime, macros::datetime};

    #[test]
    fn value_none() {
        assert_eq!(Value::Null, Value::Null);
        assert_eq!(Value::default(), Value::Null);
        assert_ne!(Value::Float64(Some(1.0)), Value::Null);
        assert!(Value::Varchar(None).is_null());
        assert!(!Value::Varchar(Some("".into())).is_null());
    }

    #[test]
    fn value_bool() {
        let val = true.as_value();
        assert_eq!(val, Value::Boolean(Some(true)));
        assert_ne!(val, Value::Boolean(Some(false)));
        assert_ne!(val, Value::Boolean(None));
        assert_ne!(val, Value::Varchar(Some("true".into())));
        assert!(bool::try_from_value(val).unwrap());
        assert!(bool::try_from_value(1i64.as_value()).is_err());
    }

    #[test]
    fn value_integers() {
        assert_eq!(42i64.as_value(), Value::Int64(Some(42)));
        assert_eq!((-7i32).as_value(), Value::Int64(Some(-7)));
        assert_eq!(65535u16.as_value(), Value::Int64(Some(65535)));
        assert_eq!(u32::MAX.as_value(), Value::Int64(Some(u32::MAX as i64)));
        assert_eq!(i64::try_from_value(Value::Int64(Some(3))).unwrap(), 3);
        assert_eq!(i32::try_from_value(Value::Int64(Some(-3))).unwrap(), -3);
        assert!(i16::try_from_value(Value::Int64(Some(40000))).is_err());
        assert!(u32::try_from_value(Value::Int64(Some(-1))).is_err());
        assert!(i64::try_from_value(Value::Float64(Some(1.0))).is_err());
        assert_eq!(i32::as_empty_value(), Value::Int64(None));
    }

    #[test]
    fn value_float() {
        let val = 0.5f64.as_value();
        assert_eq!(val, Value::Float64(Some(0.5)));
        assert_eq!(f64::try_from_value(val).unwrap(), 0.5);
        assert!(f64::try_from_value(Value::Varchar(Some("0.5".into()))).is_err());
    }

    #[test]
    fn value_text() {
        assert_eq!("hello".as_value(), Value::Varchar(Some("hello".into())));
        assert_eq!(
            String::from("world").as_value(),
            Value::Varchar(Some("world".into()))
        );
        assert_eq!(
            String::try_from_value("hello".as_value()).unwrap(),
            "hello"
        );
        assert!(<&str>::try_from_value("hello".as_value()).is_err());
        let list = vec!["a".to_string(), "b".into()];
        assert_eq!(
            list.clone().as_value(),
            Value::StringList(Some(list.clone()))
        );
        assert_eq!(Vec::<String>::try_from_value(list.clone().as_value()).unwrap(), list);
    }

    #[test]
    fn value_blob_and_date() {
        let blob: Box<[u8]> = [1u8, 2, 3].into();
        assert_eq!(blob.clone().as_value(), Value::Blob(Some(blob.clone())));
        let date = datetime!(2025-01-31 23:59:59 UTC);
        assert_eq!(date.as_value(), Value::Timestamp(Some(date)));
        assert_eq!(
            OffsetDateTime::try_from_value(date.as_value()).unwrap(),
            date
        );
    }

    #[test]
    fn value_option() {
        assert_eq!(Some(5i64).as_value(), Value::Int64(Some(5)));
        assert_eq!(None::<i64>.as_value(), Value::Int64(None));
        assert_eq!(Option::<i64>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<String>::try_from_value(Value::Varchar(None)).unwrap(),
            None
        );
        assert_eq!(
            Option::<i64>::try_from_value(Value::Int64(Some(1))).unwrap(),
            Some(1)
        );
    }

    #[derive(Debug, PartialEq)]
    enum Level {
        Low,
        High,
    }

    impl AsEnum for Level {
        const VARIANTS: &'static [&'static str] = &["low", "high"];
        fn name(&self) -> &'static str {
            match self {
                Level::Low => "low",
                Level::High => "high",
            }
        }
        fn from_name(name: &str) -> Option<Self> {
            match name {
                "low" => Some(Level::Low),
                "high" => Some(Level::High),
                _ => None,
            }
        }
    }

    enum_as_value!(Level);

    #[test]
    fn value_enum() {
        let val = Level::High.as_value();
        assert_eq!(val, Value::Enum(Some("high".into()), Level::VARIANTS));
        assert_eq!(Level::try_from_value(val).unwrap(), Level::High);
        assert_eq!(
            Level::try_from_value(Value::Varchar(Some("low".into()))).unwrap(),
            Level::Low
        );
        assert!(Level::try_from_value(Value::Varchar(Some("mid".into()))).is_err());
        assert!(Level::try_from_value(Value::Int64(Some(0))).is_err());
        assert_eq!(Level::as_empty_value(), Value::Enum(None, Level::VARIANTS));
    }

    #[test]
    fn value_prototypes() {
        let val = Value::Enum(Some("low".into()), Level::VARIANTS);
        assert!(val.same_type(&Level::as_empty_value()));
        assert!(!val.same_type(&Value::Varchar(None)));
        assert_eq!(val.as_prototype(), Value::Enum(None, Level::VARIANTS));
        assert_eq!(Value::Float64(Some(1.5)).as_prototype(), Value::Float64(None));
        assert_eq!(Value::StringList(None).type_name(), "string array");
    }
}
