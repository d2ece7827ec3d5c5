use crate::{AsValue, Entity, EntityDescriptor, Result, TenantContext, Value, register};
use std::{borrow::Cow, fmt};

/// Target table of an inline `REFERENCES` clause.
#[derive(Clone)]
pub enum ReferenceTarget {
    /// A fixed physical table.
    Table(Cow<'static, str>),
    /// Another entity, resolved with the same tenant context as the referencing table.
    Entity(fn() -> Result<&'static EntityDescriptor>),
}

impl fmt::Debug for ReferenceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(name) => f.debug_tuple("Table").field(name).finish(),
            Self::Entity(..) => f.debug_tuple("Entity").finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reference {
    pub target: ReferenceTarget,
    pub column: Cow<'static, str>,
}

impl Reference {
    /// Physical table name for the given context.
    pub fn table_name(&self, context: &TenantContext) -> Result<Cow<'static, str>> {
        Ok(match &self.target {
            ReferenceTarget::Table(name) => name.clone(),
            ReferenceTarget::Entity(descriptor) => descriptor()?.table_name(context)?.into(),
        })
    }
}

/// Declaration of a single column.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: Cow<'static, str>,
    /// Type prototype, always a `None` value.
    pub value: Value,
    pub nullable: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub auto_increment: bool,
    pub references: Option<Reference>,
}

impl ColumnDef {
    pub fn new(name: impl Into<Cow<'static, str>>, value: Value) -> Self {
        Self {
            name: name.into(),
            value: value.as_prototype(),
            nullable: false,
            primary_key: false,
            unique: false,
            auto_increment: false,
            references: None,
        }
    }

    /// Column typed after the Rust type `T`.
    pub fn of<T: AsValue>(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, T::as_empty_value())
    }

    /// The implicit `id` column every entity has.
    pub fn id() -> Self {
        Self::new("id", Value::Int64(None))
            .primary_key(true)
            .auto_increment(true)
            .unique(true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }

    /// Inline `REFERENCES table(column)`.
    pub fn references_table(
        mut self,
        table: impl Into<Cow<'static, str>>,
        column: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.references = Some(Reference {
            target: ReferenceTarget::Table(table.into()),
            column: column.into(),
        });
        self
    }

    /// Inline reference to the tenant table of another entity.
    pub fn references<E: Entity>(mut self, column: impl Into<Cow<'static, str>>) -> Self {
        self.references = Some(Reference {
            target: ReferenceTarget::Entity(register::<E>),
            column: column.into(),
        });
        self
    }
}
