use crate::{Error, Result, Value};
use time::OffsetDateTime;

/// Conversion between Rust types and [`Value`].
pub trait AsValue {
    /// The type prototype, used for column declarations.
    fn as_empty_value() -> Value;
    fn as_value(self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

macro_rules! impl_as_value {
    ($source:ty, $variant:ident) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                Value::$variant(None)
            }
            fn as_value(self) -> Value {
                Value::$variant(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    Value::$variant(Some(v)) => Ok(v),
                    _ => Err(Error::msg(format!(
                        "Cannot convert {:?} into {}",
                        value,
                        stringify!($source)
                    ))),
                }
            }
        }
    };
}

impl_as_value!(bool, Boolean);
impl_as_value!(i64, Int64);
impl_as_value!(f64, Float64);
impl_as_value!(String, Varchar);
impl_as_value!(Box<[u8]>, Blob);
impl_as_value!(OffsetDateTime, Timestamp);
impl_as_value!(Vec<String>, StringList);

macro_rules! impl_as_value_narrow {
    ($source:ty) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                Value::Int64(None)
            }
            fn as_value(self) -> Value {
                Value::Int64(Some(self.into()))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    Value::Int64(Some(v)) => <$source>::try_from(v).map_err(|_| {
                        Error::msg(format!(
                            "Integer {} does not fit into {}",
                            v,
                            stringify!($source)
                        ))
                    }),
                    _ => Err(Error::msg(format!(
                        "Cannot convert {:?} into {}",
                        value,
                        stringify!($source)
                    ))),
                }
            }
        }
    };
}

impl_as_value_narrow!(i32);
impl_as_value_narrow!(u32);
impl_as_value_narrow!(i16);
impl_as_value_narrow!(u16);

impl AsValue for &str {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.into()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Err(Error::msg(format!(
            "Cannot borrow a &str out of {:?}, use String instead",
            value
        )))
    }
}

impl AsValue for Value {
    fn as_empty_value() -> Value {
        Value::Null
    }
    fn as_value(self) -> Value {
        self
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_value(value).map(Some)
        }
    }
}

/// Rust enums persisted as text columns.
///
/// Pair it with [`enum_as_value!`](crate::enum_as_value) to get the [`AsValue`]
/// implementation mapping the enum to [`Value::Enum`].
pub trait AsEnum: Sized {
    const VARIANTS: &'static [&'static str];
    fn name(&self) -> &'static str;
    fn from_name(name: &str) -> Option<Self>;
}

#[macro_export]
macro_rules! enum_as_value {
    ($type:ty) => {
        impl $crate::AsValue for $type {
            fn as_empty_value() -> $crate::Value {
                $crate::Value::Enum(None, <$type as $crate::AsEnum>::VARIANTS)
            }
            fn as_value(self) -> $crate::Value {
                $crate::Value::Enum(
                    Some($crate::AsEnum::name(&self).into()),
                    <$type as $crate::AsEnum>::VARIANTS,
                )
            }
            fn try_from_value(value: $crate::Value) -> $crate::Result<Self> {
                match &value {
                    $crate::Value::Enum(Some(v), ..) | $crate::Value::Varchar(Some(v)) => {
                        <$type as $crate::AsEnum>::from_name(v).ok_or_else(|| {
                            $crate::Error::msg(format!(
                                "`{}` is not a variant of {}",
                                v,
                                stringify!($type)
                            ))
                        })
                    }
                    _ => Err($crate::Error::msg(format!(
                        "Cannot convert {:?} into {}",
                        value,
                        stringify!($type)
                    ))),
                }
            }
        }
    };
}
