use crate::{
    ColumnDef, ConfigurationError, Constraint, ConstraintKind, Entity, JoinDef, RelationshipDef,
    RelationshipKind, Result, Schema, TableNameFn, TenantContext,
};
use std::{any::type_name, borrow::Cow, collections::HashSet};

/// Metadata of an entity type, built once and kept for the process lifetime.
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    pub type_name: &'static str,
    /// Columns in declaration order, `id` first.
    pub columns: Vec<ColumnDef>,
    pub constraints: Vec<Constraint>,
    pub relationships: Vec<RelationshipDef>,
    pub table_name: Option<TableNameFn>,
}

impl EntityDescriptor {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn relationship(&self, name: &str) -> Result<&RelationshipDef> {
        self.relationships
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| {
                ConfigurationError::UnknownRelationship {
                    entity: self.type_name,
                    name: name.into(),
                }
                .into()
            })
    }

    /// Physical table of this entity for the context.
    pub fn table_name(&self, context: &TenantContext) -> Result<String> {
        let f = self
            .table_name
            .ok_or(ConfigurationError::MissingTable(self.type_name))?;
        Ok(f(context.service(), context.tenant(), context.suffix()))
    }

    pub fn schema(&self) -> Schema<'_> {
        Schema::new(self)
    }
}

/// Collects the declarations of an entity, see [`Entity::describe`].
///
/// Errors are recorded and reported by [`build`](EntityBuilder::build), the first one wins.
#[derive(Debug)]
pub struct EntityBuilder {
    type_name: &'static str,
    id: Option<ColumnDef>,
    columns: Vec<ColumnDef>,
    constraints: Vec<Constraint>,
    relationships: Vec<RelationshipDef>,
    table_name: Option<TableNameFn>,
    errors: Vec<ConfigurationError>,
}

impl EntityBuilder {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            id: None,
            columns: Vec::new(),
            constraints: Vec::new(),
            relationships: Vec::new(),
            table_name: None,
            errors: Vec::new(),
        }
    }

    pub fn of<E: Entity>() -> Self {
        Self::new(type_name::<E>())
    }

    /// Declares the implicit auto increment primary key `id`.
    pub fn id(mut self) -> Self {
        if self.id.is_some() {
            self.errors
                .push(ConfigurationError::DuplicateId(self.type_name));
        } else {
            self.id = Some(ColumnDef::id());
        }
        self
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn table(mut self, table_name: TableNameFn) -> Self {
        self.table_name = Some(table_name);
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    fn relationship(
        mut self,
        name: impl Into<Cow<'static, str>>,
        kind: RelationshipKind,
        target: &'static str,
        local_key: impl Into<Cow<'static, str>>,
        foreign_key: impl Into<Cow<'static, str>>,
        join: Option<JoinDef>,
    ) -> Self {
        self.relationships.push(RelationshipDef {
            name: name.into(),
            kind,
            target,
            local_key: local_key.into(),
            foreign_key: foreign_key.into(),
            join,
        });
        self
    }

    /// The single `R` whose `foreign_key` equals the local `local_key`.
    pub fn one_to_one<R: Entity>(
        self,
        name: impl Into<Cow<'static, str>>,
        local_key: impl Into<Cow<'static, str>>,
        foreign_key: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.relationship(
            name,
            RelationshipKind::OneToOne,
            type_name::<R>(),
            local_key,
            foreign_key,
            None,
        )
    }

    /// Every `R` whose `foreign_key` equals the local `local_key`.
    pub fn one_to_many<R: Entity>(
        self,
        name: impl Into<Cow<'static, str>>,
        local_key: impl Into<Cow<'static, str>>,
        foreign_key: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.relationship(
            name,
            RelationshipKind::OneToMany,
            type_name::<R>(),
            local_key,
            foreign_key,
            None,
        )
    }

    /// Every `R` linked through the join entity `J`: rows of `J` having
    /// `join_local == local_key` give the values of `join_remote` that are
    /// matched against `foreign_key` of `R`.
    pub fn many_to_many<J: Entity, R: Entity>(
        self,
        name: impl Into<Cow<'static, str>>,
        local_key: impl Into<Cow<'static, str>>,
        join_local: impl Into<Cow<'static, str>>,
        join_remote: impl Into<Cow<'static, str>>,
        foreign_key: impl Into<Cow<'static, str>>,
    ) -> Self {
        let join = JoinDef {
            entity: type_name::<J>(),
            local_column: join_local.into(),
            remote_column: join_remote.into(),
        };
        self.relationship(
            name,
            RelationshipKind::ManyToMany,
            type_name::<R>(),
            local_key,
            foreign_key,
            Some(join),
        )
    }

    /// The `R` whose id is stored in `local_key`.
    pub fn import<R: Entity>(
        self,
        name: impl Into<Cow<'static, str>>,
        local_key: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.relationship(
            name,
            RelationshipKind::Import,
            type_name::<R>(),
            local_key,
            "id",
            None,
        )
    }

    pub fn build(self) -> std::result::Result<EntityDescriptor, ConfigurationError> {
        let entity = self.type_name;
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        let id = self.id.ok_or(ConfigurationError::MissingId(entity))?;
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(id);
        for column in self.columns {
            if column.value.same_type(&crate::Value::Null) {
                return Err(ConfigurationError::UntypedColumn {
                    entity,
                    column: column.name.into(),
                });
            }
            if columns.iter().any(|c: &ColumnDef| c.name == column.name) {
                return Err(ConfigurationError::DuplicateColumn {
                    entity,
                    column: column.name.into(),
                });
            }
            columns.push(column);
        }
        let has_column = |name: &str| columns.iter().any(|c| c.name == name);
        let mut names = HashSet::new();
        for constraint in &self.constraints {
            if constraint.kind == ConstraintKind::PrimaryKey {
                return Err(ConfigurationError::PrimaryKeyConflict(entity));
            }
            if !names.insert(constraint.name.clone()) {
                return Err(ConfigurationError::DuplicateName {
                    entity,
                    name: constraint.name.clone().into(),
                });
            }
            if let Some(column) = constraint.columns.iter().find(|c| !has_column(c)) {
                return Err(ConfigurationError::UnknownColumn {
                    entity,
                    column: column.clone().into(),
                });
            }
        }
        let mut names = HashSet::new();
        for relationship in &self.relationships {
            if !names.insert(relationship.name.clone()) {
                return Err(ConfigurationError::DuplicateName {
                    entity,
                    name: relationship.name.clone().into(),
                });
            }
            if !has_column(&relationship.local_key) {
                return Err(ConfigurationError::UnknownColumn {
                    entity,
                    column: relationship.local_key.clone().into(),
                });
            }
        }
        Ok(EntityDescriptor {
            type_name: entity,
            columns,
            constraints: self.constraints,
            relationships: self.relationships,
            table_name: self.table_name,
        })
    }
}
