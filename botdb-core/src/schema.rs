use crate::{CoercionError, ColumnDef, EntityDescriptor, Row, RowLabeled, Value};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

/// Column name and value pairs, as produced by [`Entity::row`](crate::Entity::row).
pub type NamedRow = Vec<(&'static str, Value)>;

/// Dates are stored as RFC 3339 text in UTC.
pub fn format_timestamp(value: &OffsetDateTime) -> Result<String, time::error::Format> {
    value.to_offset(UtcOffset::UTC).format(&Rfc3339)
}

/// Coerces values between the domain form and the storage form of a table.
///
/// Storage forms are limited to null, integers, floats, text and blobs.
#[derive(Debug, Clone, Copy)]
pub struct Schema<'a> {
    entity: &'a EntityDescriptor,
}

fn mismatch(column: &ColumnDef, value: &Value) -> CoercionError {
    CoercionError::TypeMismatch {
        column: column.name.to_string(),
        expected: column.value.type_name(),
        found: format!("{} {:?}", value.type_name(), value),
    }
}

fn check_variant(
    column: &ColumnDef,
    value: &str,
    variants: &'static [&'static str],
) -> Result<(), CoercionError> {
    if variants.contains(&value) {
        Ok(())
    } else {
        Err(CoercionError::UndeclaredVariant {
            column: column.name.to_string(),
            value: value.into(),
            variants,
        })
    }
}

impl<'a> Schema<'a> {
    pub fn new(entity: &'a EntityDescriptor) -> Self {
        Self { entity }
    }

    pub fn entity(&self) -> &'a EntityDescriptor {
        self.entity
    }

    pub fn columns(&self) -> &'a [ColumnDef] {
        &self.entity.columns
    }

    pub fn column(&self, name: &str) -> Result<&'a ColumnDef, CoercionError> {
        self.entity
            .column(name)
            .ok_or_else(|| CoercionError::UnknownColumn {
                entity: self.entity.type_name,
                column: name.into(),
            })
    }

    /// Storage value to domain value.
    pub fn import_value(column: &ColumnDef, value: Value) -> Result<Value, CoercionError> {
        if value.is_null() {
            return Ok(column.value.clone());
        }
        Ok(match (&column.value, value) {
            (Value::Boolean(..), Value::Int64(Some(v))) => Value::Boolean(Some(v == 1)),
            (Value::Float64(..), Value::Int64(Some(v))) => Value::Float64(Some(v as f64)),
            (Value::Timestamp(..), Value::Varchar(Some(v))) => {
                match OffsetDateTime::parse(&v, &Rfc3339) {
                    Ok(date) => Value::Timestamp(Some(date)),
                    Err(e) => {
                        return Err(CoercionError::Date {
                            column: column.name.to_string(),
                            value: v,
                            message: e.to_string(),
                        });
                    }
                }
            }
            (Value::StringList(..), Value::Varchar(Some(v))) => Value::StringList(Some(
                if v.is_empty() {
                    Vec::new()
                } else {
                    v.split(',').map(Into::into).collect()
                },
            )),
            (Value::Enum(.., variants), Value::Varchar(Some(v)) | Value::Enum(Some(v), ..)) => {
                check_variant(column, &v, *variants)?;
                Value::Enum(Some(v), *variants)
            }
            (prototype, value) if prototype.same_type(&value) => value,
            (.., value) => return Err(mismatch(column, &value)),
        })
    }

    /// Domain value to storage value, never coerces silently.
    pub fn export_value(column: &ColumnDef, value: Value) -> Result<Value, CoercionError> {
        if value.is_null() {
            return if column.nullable || column.auto_increment {
                Ok(Value::Null)
            } else {
                Err(CoercionError::Null(column.name.to_string()))
            };
        }
        Ok(match (&column.value, value) {
            (Value::Boolean(..), Value::Boolean(Some(v))) => Value::Int64(Some(v as i64)),
            (Value::Timestamp(..), Value::Timestamp(Some(v))) => {
                Value::Varchar(Some(format_timestamp(&v).map_err(|e| {
                    CoercionError::Date {
                        column: column.name.to_string(),
                        value: v.to_string(),
                        message: e.to_string(),
                    }
                })?))
            }
            (Value::StringList(..), Value::StringList(Some(v))) => {
                if let Some(element) = v
                    .iter()
                    .find(|e| e.contains(',') || (v.len() == 1 && e.is_empty()))
                {
                    return Err(CoercionError::ListElement {
                        column: column.name.to_string(),
                        element: element.clone(),
                    });
                }
                Value::Varchar(Some(v.join(",")))
            }
            (Value::Enum(.., variants), Value::Enum(Some(v), ..) | Value::Varchar(Some(v))) => {
                check_variant(column, &v, *variants)?;
                Value::Varchar(Some(v))
            }
            (prototype, value) if prototype.same_type(&value) => value,
            (.., value) => return Err(mismatch(column, &value)),
        })
    }

    pub fn import(&self, name: &str, value: Value) -> Result<Value, CoercionError> {
        Self::import_value(self.column(name)?, value)
    }

    pub fn export(&self, name: &str, value: Value) -> Result<Value, CoercionError> {
        Self::export_value(self.column(name)?, value)
    }

    /// Converts every value of a fetched row, fails on columns unknown to the entity.
    pub fn import_row(&self, row: RowLabeled) -> Result<RowLabeled, CoercionError> {
        let values = row
            .labels
            .iter()
            .zip(row.values.into_vec())
            .map(|(name, value)| self.import(name, value))
            .collect::<Result<Row, _>>()?;
        Ok(RowLabeled::new(row.labels, values))
    }

    pub fn export_row(&self, row: NamedRow) -> Result<NamedRow, CoercionError> {
        row.into_iter()
            .map(|(name, value)| Ok((name, self.export(name, value)?)))
            .collect()
    }
}
