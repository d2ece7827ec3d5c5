use time::OffsetDateTime;

/// A single value, either in its domain form or in its storage form.
///
/// Every variant wraps an `Option`: the `None` form is used as the type
/// prototype of a column, the `Some` form carries an actual value.
/// Storage rows only ever contain `Null`, `Int64`, `Float64`, `Varchar` and `Blob`.
#[derive(Default, Debug, Clone)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int64(Option<i64>),
    Float64(Option<f64>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    /// Date and time, stored as RFC 3339 text in UTC.
    Timestamp(Option<OffsetDateTime>),
    /// Stored as comma separated text.
    StringList(Option<Vec<String>>),
    /// Text restricted to the declared variants.
    Enum(Option<String>, &'static [&'static str]),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Int64(l), Self::Int64(r)) => l == r,
            (Self::Float64(l), Self::Float64(r)) => l == r,
            (Self::Varchar(l), Self::Varchar(r)) => l == r,
            (Self::Blob(l), Self::Blob(r)) => l == r,
            (Self::Timestamp(l), Self::Timestamp(r)) => l == r,
            (Self::StringList(l), Self::StringList(r)) => l == r,
            (Self::Enum(l, ..), Self::Enum(r, ..)) => l == r,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Value::Null
                | Value::Boolean(None)
                | Value::Int64(None)
                | Value::Float64(None)
                | Value::Varchar(None)
                | Value::Blob(None)
                | Value::Timestamp(None)
                | Value::StringList(None)
                | Value::Enum(None, ..)
        )
    }

    pub fn same_type(&self, other: &Self) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }

    /// The `None` form of the same variant.
    pub fn as_prototype(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            Value::Boolean(..) => Value::Boolean(None),
            Value::Int64(..) => Value::Int64(None),
            Value::Float64(..) => Value::Float64(None),
            Value::Varchar(..) => Value::Varchar(None),
            Value::Blob(..) => Value::Blob(None),
            Value::Timestamp(..) => Value::Timestamp(None),
            Value::StringList(..) => Value::StringList(None),
            Value::Enum(.., variants) => Value::Enum(None, variants),
        }
    }

    /// Human readable name of the domain type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(..) => "boolean",
            Value::Int64(..) => "integer",
            Value::Float64(..) => "float",
            Value::Varchar(..) => "string",
            Value::Blob(..) => "blob",
            Value::Timestamp(..) => "date",
            Value::StringList(..) => "string array",
            Value::Enum(..) => "enum",
        }
    }
}
