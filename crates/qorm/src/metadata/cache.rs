use super::Metadata;
use crate::error::OrmResult;
use crate::model::Record;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Per-type metadata cache.
///
/// Owned by the caller (usually [`Orm`](crate::Orm)) rather than global, so
/// tests can use a fresh cache. Building is idempotent: two threads racing on
/// the same type both compute equal metadata and one insert wins.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<TypeId, Arc<Metadata>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached metadata for `T`, building it on first use.
    pub fn get_or_build<T: Record>(&self) -> OrmResult<Arc<Metadata>> {
        let key = TypeId::of::<T>();
        if let Some(meta) = self.get_by_id(key) {
            return Ok(meta);
        }

        let built = Arc::new(Metadata::build(&T::descriptor())?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.entry(key).or_insert(built).clone())
    }

    /// Cached metadata for `T`, if already built.
    pub fn get<T: Record>(&self) -> Option<Arc<Metadata>> {
        self.get_by_id(TypeId::of::<T>())
    }

    fn get_by_id(&self, key: TypeId) -> Option<Arc<Metadata>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
