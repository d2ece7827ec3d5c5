use crate::{
    AsValue, CoercionError, ConfigurationError, Conflict, Entity, Executor, Insert,
    InstanceError, NamedRow, RelationCache, RelationshipDef, RelationshipKind, Result,
    RowLabeled, Schema, Select, TenantContext, Value, Where,
};
use futures::future::try_join_all;
use std::{
    any::type_name,
    fmt,
    ops::{Deref, DerefMut},
    sync::Arc,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    /// Never saved, the id is `0`.
    #[default]
    Unbound,
    /// Corresponds to a row.
    Bound,
    /// The row was deleted, the instance can no longer be written.
    Deleted,
}

/// An entity value together with its id, tenant context and relationship cache.
pub struct Instance<T: Entity> {
    id: i64,
    context: TenantContext,
    state: InstanceState,
    data: T,
    relations: RelationCache,
}

impl<T: Entity> Instance<T> {
    pub fn new(context: TenantContext, data: T) -> Self {
        Self {
            id: 0,
            context,
            state: InstanceState::Unbound,
            data,
            relations: Default::default(),
        }
    }

    /// From a row already imported through the schema of `T`.
    pub fn from_row(context: TenantContext, row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            context,
            state: InstanceState::Bound,
            data: T::from_row(row)?,
            relations: Default::default(),
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn context(&self) -> &TenantContext {
        &self.context
    }

    pub fn state(&self) -> InstanceState {
        self.state
    }

    pub fn into_inner(self) -> T {
        self.data
    }

    pub fn table_name(&self) -> Result<String> {
        T::table_name(&self.context)
    }

    pub fn schema(&self) -> Result<Schema<'static>> {
        T::schema()
    }

    /// Domain value of a column, `id` included.
    pub fn value(&self, column: &str) -> Result<Value> {
        if column == "id" {
            return Ok(self.id.as_value());
        }
        self.data
            .row()
            .into_iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
            .ok_or_else(|| {
                CoercionError::UnknownColumn {
                    entity: type_name::<T>(),
                    column: column.into(),
                }
                .into()
            })
    }

    /// The row of the entity, with the id once bound.
    pub fn row(&self) -> NamedRow {
        let mut row = self.data.row();
        if self.state == InstanceState::Bound {
            row.insert(0, ("id", self.id.as_value()));
        }
        row
    }

    fn writable(&self) -> Result<()> {
        if self.state == InstanceState::Deleted {
            return Err(InstanceError::Deleted(type_name::<T>()).into());
        }
        Ok(())
    }

    /// `INSERT OR REPLACE` keyed by id, an unbound instance gets its id assigned.
    pub async fn save<E: Executor>(&mut self, executor: &mut E) -> Result<()> {
        self.writable()?;
        let id = Insert::new(self.table_name()?)
            .conflict(Conflict::Replace)
            .schema(T::schema()?)
            .run(executor, self.row())
            .await?
            .ok_or_else(|| crate::Error::msg("The row was not saved"))?;
        if self.state == InstanceState::Unbound {
            self.id = id;
        }
        self.state = InstanceState::Bound;
        Ok(())
    }

    /// Reloads the entity from its row, returns whether the row exists.
    pub async fn load<E: Executor>(&mut self, executor: &mut E) -> Result<bool> {
        self.writable()?;
        if self.id == 0 {
            return Ok(false);
        }
        let row = Select::new(self.table_name()?)
            .filter(Where::new().eq("id", self.id))
            .schema(T::schema()?)
            .first(executor)
            .await?;
        let Some(row) = row else {
            return Ok(false);
        };
        self.data = T::from_row(&row)?;
        self.state = InstanceState::Bound;
        self.relations.clear();
        Ok(true)
    }

    pub async fn delete<E: Executor>(&mut self, executor: &mut E) -> Result<()> {
        match self.state {
            InstanceState::Unbound => {
                return Err(InstanceError::Unbound(type_name::<T>()).into());
            }
            InstanceState::Deleted => {
                return Err(InstanceError::Deleted(type_name::<T>()).into());
            }
            InstanceState::Bound => {}
        }
        T::remove_entries(executor, &self.context, Where::new().eq("id", self.id)).await?;
        self.state = InstanceState::Deleted;
        Ok(())
    }

    fn relationship<R: Entity>(
        &self,
        name: &str,
        kind: RelationshipKind,
    ) -> Result<&'static RelationshipDef> {
        let descriptor = T::descriptor()?;
        let relationship = descriptor.relationship(name)?;
        let target = type_name::<R>();
        if relationship.kind != kind || relationship.target != target {
            return Err(ConfigurationError::RelationshipMismatch {
                entity: descriptor.type_name,
                name: name.into(),
                expected: format!("{} of {}", relationship.kind, relationship.target),
                found: format!("{} of {}", kind, target),
            }
            .into());
        }
        Ok(relationship)
    }

    /// The related `R` whose foreign key matches the local key.
    pub async fn one_to_one<R: Entity, E: Executor>(
        &self,
        executor: &mut E,
        name: &str,
    ) -> Result<Option<Arc<Instance<R>>>> {
        let relationship = self.relationship::<R>(name, RelationshipKind::OneToOne)?;
        if let Some(cached) = self.relations.get(name) {
            return Ok(cached);
        }
        let filter = Where::new().eq(
            relationship.foreign_key.to_string(),
            self.value(&relationship.local_key)?,
        );
        let result = R::retrieve(executor, &self.context, filter)
            .await?
            .map(Arc::new);
        self.relations
            .insert(relationship.name.clone(), result.clone());
        Ok(result)
    }

    /// Every related `R` whose foreign key matches the local key.
    pub async fn one_to_many<R: Entity, E: Executor>(
        &self,
        executor: &mut E,
        name: &str,
    ) -> Result<Arc<[Instance<R>]>> {
        let relationship = self.relationship::<R>(name, RelationshipKind::OneToMany)?;
        if let Some(cached) = self.relations.get(name) {
            return Ok(cached);
        }
        let filter = Where::new().eq(
            relationship.foreign_key.to_string(),
            self.value(&relationship.local_key)?,
        );
        let result: Arc<[Instance<R>]> = R::retrieve_all(executor, &self.context, filter)
            .await?
            .into();
        self.relations
            .insert(relationship.name.clone(), result.clone());
        Ok(result)
    }

    /// Every `R` linked through the join entity `J`.
    ///
    /// The join rows are fetched first, then every target is fetched
    /// concurrently on a clone of the executor.
    pub async fn many_to_many<J: Entity, R: Entity, E: Executor + Clone>(
        &self,
        executor: &E,
        name: &str,
    ) -> Result<Arc<[Instance<R>]>> {
        let relationship = self.relationship::<R>(name, RelationshipKind::ManyToMany)?;
        let Some(join) = relationship.join.as_ref().filter(|j| j.entity == type_name::<J>())
        else {
            return Err(ConfigurationError::RelationshipMismatch {
                entity: type_name::<T>(),
                name: name.into(),
                expected: format!(
                    "join through {}",
                    relationship.join.as_ref().map_or("nothing", |j| j.entity)
                ),
                found: format!("join through {}", type_name::<J>()),
            }
            .into());
        };
        if let Some(cached) = self.relations.get(name) {
            return Ok(cached);
        }
        let filter = Where::new().eq(
            join.local_column.to_string(),
            self.value(&relationship.local_key)?,
        );
        let links = J::retrieve_all(&mut executor.clone(), &self.context, filter).await?;
        let remotes = links
            .iter()
            .map(|link| link.value(&join.remote_column))
            .collect::<Result<Vec<_>>>()?;
        let targets = try_join_all(remotes.into_iter().map(|remote| {
            let mut executor = executor.clone();
            let filter = Where::new().eq(relationship.foreign_key.to_string(), remote);
            async move { R::retrieve(&mut executor, &self.context, filter).await }
        }))
        .await?;
        let result: Arc<[Instance<R>]> = targets.into_iter().flatten().collect();
        self.relations
            .insert(relationship.name.clone(), result.clone());
        Ok(result)
    }

    /// The `R` whose id is stored in the local key, `None` when the key is null.
    pub async fn import<R: Entity, E: Executor>(
        &self,
        executor: &mut E,
        name: &str,
    ) -> Result<Option<Arc<Instance<R>>>> {
        let relationship = self.relationship::<R>(name, RelationshipKind::Import)?;
        if let Some(cached) = self.relations.get(name) {
            return Ok(cached);
        }
        let id = self.value(&relationship.local_key)?;
        let result = if id.is_null() {
            None
        } else {
            R::retrieve(executor, &self.context, Where::new().eq("id", id))
                .await?
                .map(Arc::new)
        };
        self.relations
            .insert(relationship.name.clone(), result.clone());
        Ok(result)
    }
}

impl<T: Entity> Deref for Instance<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T: Entity> DerefMut for Instance<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

impl<T: Entity + fmt::Debug> fmt::Debug for Instance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("context", &self.context)
            .field("state", &self.state)
            .field("data", &self.data)
            .field("relations", &self.relations)
            .finish()
    }
}
