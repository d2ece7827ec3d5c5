use crate::{
    Conflict, Count, CreateTable, Delete, DropTable, EntityBuilder, EntityDescriptor, Executor,
    Exists, Insert, Instance, NamedRow, Order, Result, RowLabeled, RowsAffected, Schema, Select,
    TenantContext, Update, Where, is_unique_violation, register,
};
use std::future::Future;

/// A domain type persisted in one table per tenant context.
///
/// Implementors declare their metadata in [`describe`](Entity::describe) and
/// convert from and to rows, everything else is provided.
/// ```rust,ignore
/// impl Entity for Account {
///     fn describe(builder: EntityBuilder) -> EntityBuilder {
///         builder
///             .id()
///             .column(ColumnDef::of::<String>("name").unique(true))
///             .column(ColumnDef::of::<bool>("banned"))
///             .table(|service, tenant, _| format!("{}_{}_accounts", service, tenant.unwrap_or("")))
///     }
///     fn from_row(row: &RowLabeled) -> Result<Self> {
///         Ok(Self { name: row.get("name")?, banned: row.get("banned")? })
///     }
///     fn row(&self) -> NamedRow {
///         vec![("name", self.name.clone().as_value()), ("banned", self.banned.as_value())]
///     }
/// }
/// ```
pub trait Entity: Sized + Send + Sync + 'static {
    fn describe(builder: EntityBuilder) -> EntityBuilder;

    /// Builds the value from a row already converted to domain values.
    fn from_row(row: &RowLabeled) -> Result<Self>;

    /// The declared columns and their domain values, `id` excluded.
    fn row(&self) -> NamedRow;

    fn descriptor() -> Result<&'static EntityDescriptor> {
        register::<Self>()
    }

    fn schema() -> Result<Schema<'static>> {
        Ok(Self::descriptor()?.schema())
    }

    /// Physical table name, the same for the same context.
    fn table_name(context: &TenantContext) -> Result<String> {
        Self::descriptor()?.table_name(context)
    }

    fn create_table<E: Executor>(
        executor: &mut E,
        context: &TenantContext,
        if_not_exists: bool,
    ) -> impl Future<Output = Result<()>> + Send {
        async move {
            CreateTable::for_entity(Self::descriptor()?, context)?
                .if_not_exists(if_not_exists)
                .run(executor)
                .await
        }
    }

    fn drop_table<E: Executor>(
        executor: &mut E,
        context: &TenantContext,
        if_exists: bool,
    ) -> impl Future<Output = Result<()>> + Send {
        async move {
            DropTable::new(Self::table_name(context)?)
                .if_exists(if_exists)
                .run(executor)
                .await
        }
    }

    fn get<E: Executor>(
        executor: &mut E,
        context: &TenantContext,
        id: i64,
    ) -> impl Future<Output = Result<Option<Instance<Self>>>> + Send {
        Self::retrieve(executor, context, Where::new().eq("id", id))
    }

    fn get_all<E: Executor>(
        executor: &mut E,
        context: &TenantContext,
    ) -> impl Future<Output = Result<Vec<Instance<Self>>>> + Send {
        Self::retrieve_all(executor, context, Where::new())
    }

    /// The first matching entity, if any.
    fn retrieve<E: Executor>(
        executor: &mut E,
        context: &TenantContext,
        filter: Where,
    ) -> impl Future<Output = Result<Option<Instance<Self>>>> + Send {
        async move {
            let row = Select::new(Self::table_name(context)?)
                .filter(filter)
                .order_by("id", Order::Asc)
                .schema(Self::schema()?)
                .first(executor)
                .await?;
            row.map(|row| Instance::from_row(context.clone(), &row))
                .transpose()
        }
    }

    /// Every matching entity ordered by id, every entity when the filter is empty.
    fn retrieve_all<E: Executor>(
        executor: &mut E,
        context: &TenantContext,
        filter: Where,
    ) -> impl Future<Output = Result<Vec<Instance<Self>>>> + Send {
        async move {
            Select::new(Self::table_name(context)?)
                .filter(filter)
                .order_by("id", Order::Asc)
                .schema(Self::schema()?)
                .all(executor)
                .await?
                .iter()
                .map(|row| Instance::from_row(context.clone(), row))
                .collect()
        }
    }

    /// Inserts `value`, `None` when it violates a unique constraint.
    fn make<E: Executor>(
        executor: &mut E,
        context: &TenantContext,
        value: Self,
    ) -> impl Future<Output = Result<Option<Instance<Self>>>> + Send {
        async move {
            let inserted = Insert::new(Self::table_name(context)?)
                .conflict(Conflict::Abort)
                .schema(Self::schema()?)
                .run(executor, value.row())
                .await;
            match inserted {
                Ok(Some(id)) => Self::get(executor, context, id).await,
                Ok(None) => Ok(None),
                Err(e) if is_unique_violation(&e) => {
                    log::debug!(
                        "{} already exists in the context {:?}",
                        std::any::type_name::<Self>(),
                        context
                    );
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        }
    }

    /// Find or create: the first entity matching `filter`, otherwise `seed` once inserted.
    ///
    /// When the insertion loses a race against an identical one, the winner is returned.
    fn retrieve_or_make<E: Executor>(
        executor: &mut E,
        context: &TenantContext,
        filter: Where,
        seed: Self,
    ) -> impl Future<Output = Result<Option<Instance<Self>>>> + Send {
        async move {
            if let Some(found) = Self::retrieve(executor, context, filter.clone()).await? {
                return Ok(Some(found));
            }
            match Self::make(executor, context, seed).await? {
                Some(made) => Ok(Some(made)),
                None => Self::retrieve(executor, context, filter).await,
            }
        }
    }

    fn count<E: Executor>(
        executor: &mut E,
        context: &TenantContext,
        filter: Where,
    ) -> impl Future<Output = Result<i64>> + Send {
        async move {
            Count::new(Self::table_name(context)?)
                .filter(filter)
                .get(executor)
                .await
        }
    }

    fn exists<E: Executor>(
        executor: &mut E,
        context: &TenantContext,
        filter: Where,
    ) -> impl Future<Output = Result<bool>> + Send {
        async move {
            Exists::new(Self::table_name(context)?)
                .filter(filter)
                .get(executor)
                .await
        }
    }

    /// Sets the columns of `row` on every entity matching the filter built by `filter`.
    fn update_entries<E: Executor>(
        executor: &mut E,
        context: &TenantContext,
        row: NamedRow,
        filter: impl FnOnce(Where) -> Where + Send,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        async move {
            let schema = Self::schema()?;
            Update::new(Self::table_name(context)?, row, Some(&schema))?
                .filter(filter)
                .run(executor)
                .await
        }
    }

    /// Deletes every matching entity, every entity when the filter is empty.
    fn remove_entries<E: Executor>(
        executor: &mut E,
        context: &TenantContext,
        filter: Where,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        async move {
            Delete::new(Self::table_name(context)?)
                .filter(filter)
                .run(executor)
                .await
        }
    }
}
