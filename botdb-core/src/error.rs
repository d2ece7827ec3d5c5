use std::fmt::{self, Display};
use thiserror::Error;

/// Invalid entity declaration, detected when the descriptor is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Entity `{0}` declares more than one id column")]
    DuplicateId(&'static str),
    #[error("Entity `{0}` does not declare an id column")]
    MissingId(&'static str),
    #[error("Entity `{entity}` declares the column `{column}` more than once")]
    DuplicateColumn {
        entity: &'static str,
        column: String,
    },
    #[error("Column `{column}` of entity `{entity}` does not have a type")]
    UntypedColumn {
        entity: &'static str,
        column: String,
    },
    #[error("Entity `{0}` does not declare a table name function")]
    MissingTable(&'static str),
    #[error("Entity `{entity}` uses the name `{name}` more than once")]
    DuplicateName { entity: &'static str, name: String },
    #[error("Entity `{entity}` refers to the unknown column `{column}`")]
    UnknownColumn {
        entity: &'static str,
        column: String,
    },
    #[error("Entity `{0}` already has an id column, it cannot declare a primary key constraint")]
    PrimaryKeyConflict(&'static str),
    #[error("Entity `{entity}` does not declare a relationship named `{name}`")]
    UnknownRelationship { entity: &'static str, name: String },
    #[error(
        "Relationship `{name}` of entity `{entity}` is declared as {expected}, it was used as {found}"
    )]
    RelationshipMismatch {
        entity: &'static str,
        name: String,
        expected: String,
        found: String,
    },
}

/// A statement builder was used incorrectly or received inconsistent rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryBuilderError {
    #[error("`{0}` must be called after at least one column was added")]
    NoColumn(&'static str),
    #[error("Every row of a batch must have the same columns, expected {expected:?} found {found:?}")]
    MismatchedRow {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("The query does not have a parameter named `{0}`")]
    UnknownParameter(String),
    #[error("A table must have at least one column")]
    EmptyTable,
    #[error("An update must set at least one column")]
    EmptyUpdate,
    #[error("The column `{0}` appears more than once in the row")]
    DuplicateColumn(String),
    #[error("The column `{0}` references an entity, use `CreateTable::for_entity` to resolve it")]
    UnresolvedReference(String),
}

/// A value could not be converted between its domain and storage form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("Entity `{entity}` does not have a column named `{column}`")]
    UnknownColumn {
        entity: &'static str,
        column: String,
    },
    #[error("`{value}` is not one of the values {variants:?} allowed for column `{column}`")]
    UndeclaredVariant {
        column: String,
        value: String,
        variants: &'static [&'static str],
    },
    #[error("Column `{column}` expects a value of type {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: String,
    },
    #[error("Column `{0}` cannot be null")]
    Null(String),
    #[error("The element `{element}` of column `{column}` cannot be stored in a list")]
    ListElement { column: String, element: String },
    #[error("Could not parse `{value}` as a date for column `{column}`: {message}")]
    Date {
        column: String,
        value: String,
        message: String,
    },
}

/// Error reported by the database engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct DriverError {
    /// Engine specific (extended) result code, `0` when not applicable.
    pub code: i32,
    /// The failure was caused by a constraint violation.
    pub constraint: bool,
    pub message: String,
}

impl DriverError {
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            code: 0,
            constraint: false,
            message: message.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.constraint && self.message.contains("UNIQUE")
    }
}

impl Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code != 0 {
            write!(f, "{} (code {})", self.message, self.code)
        } else {
            f.write_str(&self.message)
        }
    }
}

/// A statement failed, carries the SQL that was being executed.
#[derive(Error, Debug, Clone)]
#[error("{source}\nWhile executing the query:\n{sql}")]
pub struct QueryError {
    pub sql: String,
    #[source]
    pub source: DriverError,
}

impl QueryError {
    pub fn new(sql: impl Into<String>, error: anyhow::Error) -> Self {
        let source = match error.downcast::<DriverError>() {
            Ok(e) => e,
            Err(e) => DriverError::other(format!("{:#}", e)),
        };
        Self {
            sql: sql.into(),
            source,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.source.is_unique_violation()
    }
}

/// Misuse of an entity instance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    #[error("The instance of `{0}` was already deleted")]
    Deleted(&'static str),
    #[error("The instance of `{0}` was never saved")]
    Unbound(&'static str),
}

/// The error (or any of its causes) is a unique constraint violation.
pub fn is_unique_violation(error: &anyhow::Error) -> bool {
    error.chain().any(|e| {
        if let Some(e) = e.downcast_ref::<QueryError>() {
            e.is_unique_violation()
        } else if let Some(e) = e.downcast_ref::<DriverError>() {
            e.is_unique_violation()
        } else {
            false
        }
    })
}
