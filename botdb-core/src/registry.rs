use crate::{Entity, EntityBuilder, EntityDescriptor, Result};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{LazyLock, PoisonError, RwLock},
};

static REGISTRY: LazyLock<RwLock<HashMap<TypeId, &'static EntityDescriptor>>> =
    LazyLock::new(Default::default);

/// Builds and stores the descriptor of `E`, or returns the one already stored.
///
/// Idempotent: the first successful build wins and lives for the rest of the process.
pub fn register<E: Entity>() -> Result<&'static EntityDescriptor> {
    let key = TypeId::of::<E>();
    if let Some(descriptor) = REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Ok(*descriptor);
    }
    let descriptor = E::describe(EntityBuilder::of::<E>())
        .build()
        .inspect_err(|e| log::error!("Could not register the entity: {}", e))?;
    let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    Ok(*registry
        .entry(key)
        .or_insert_with(|| Box::leak(Box::new(descriptor))))
}

/// The descriptor of `E` when it was already registered.
pub fn lookup<E: Entity>() -> Option<&'static EntityDescriptor> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&TypeId::of::<E>())
        .copied()
}
