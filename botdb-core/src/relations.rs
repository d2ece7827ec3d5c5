use std::{
    any::Any,
    borrow::Cow,
    collections::HashMap,
    fmt::{self, Display},
    sync::{Mutex, PoisonError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    /// At most one target whose foreign key equals the local key.
    OneToOne,
    /// Every target whose foreign key equals the local key.
    OneToMany,
    /// Targets reached through a join entity.
    ManyToMany,
    /// The target whose id is stored in a local column.
    Import,
}

impl Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelationshipKind::OneToOne => "one to one",
            RelationshipKind::OneToMany => "one to many",
            RelationshipKind::ManyToMany => "many to many",
            RelationshipKind::Import => "import",
        })
    }
}

/// The join entity of a many to many relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinDef {
    pub entity: &'static str,
    /// Column of the join entity matching the local key.
    pub local_column: Cow<'static, str>,
    /// Column of the join entity matching the target foreign key.
    pub remote_column: Cow<'static, str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipDef {
    pub name: Cow<'static, str>,
    pub kind: RelationshipKind,
    /// Type name of the target entity.
    pub target: &'static str,
    pub local_key: Cow<'static, str>,
    pub foreign_key: Cow<'static, str>,
    pub join: Option<JoinDef>,
}

/// Memoized relationship results of a single instance, keyed by relationship name.
#[derive(Default)]
pub struct RelationCache {
    entries: Mutex<HashMap<Cow<'static, str>, Box<dyn Any + Send + Sync>>>,
}

impl RelationCache {
    pub fn get<T: Any + Clone>(&self, name: &str) -> Option<T> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .and_then(|v| v.downcast_ref::<T>())
            .cloned()
    }

    pub fn insert<T: Any + Send + Sync>(&self, name: Cow<'static, str>, value: T) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, Box::new(value));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl fmt::Debug for RelationCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_set().entries(entries.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::RelationCache;
    use std::sync::Arc;

    #[test]
    fn cache_memoizes_by_name() {
        let cache = RelationCache::default();
        assert_eq!(cache.get::<Arc<[i64]>>("owners"), None);
        cache.insert("owners".into(), Arc::<[i64]>::from(vec![1, 2]));
        assert!(cache.contains("owners"));
        assert_eq!(cache.get::<Arc<[i64]>>("owners").as_deref(), Some(&[1, 2][..]));
        // Wrong type is a miss
        assert_eq!(cache.get::<String>("owners"), None);
        cache.clear();
        assert!(!cache.contains("owners"));
    }
}
