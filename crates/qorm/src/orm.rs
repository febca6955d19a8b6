//! Composition root.
//!
//! [`Orm`] owns the configuration and the two caches (metadata per record
//! type, query builder per driver). Nothing here is global: build one `Orm`
//! at startup and share it, or build a fresh one per test.
//!
//! ```ignore
//! let orm = Orm::new(OrmConfig::load("qorm.toml")?);
//! let (client, conn) = orm.config().database("main")?.pg_config()?.connect(NoTls).await?;
//! tokio::spawn(conn);
//!
//! let active = orm.query::<User>()?.filter(("status", "=", "active"))?;
//! let users = active.fetch(&client).await?;
//! ```

use crate::config::OrmConfig;
use crate::dialect::normalize_driver;
use crate::error::OrmResult;
use crate::metadata::{Metadata, MetadataCache};
use crate::model::{Model, Record};
use crate::qb::QueryBuilder;
use crate::query_set::QuerySet;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Query builders keyed by normalized driver name.
#[derive(Debug, Default)]
pub struct DialectRegistry {
    builders: RwLock<HashMap<String, QueryBuilder>>,
}

impl DialectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The builder for `driver`, resolving and caching it on first use.
    /// Unknown drivers get the common dialect.
    pub fn get(&self, driver: &str) -> QueryBuilder {
        let key = normalize_driver(driver);
        if let Some(builder) = self
            .builders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return builder.clone();
        }
        let mut builders = self.builders.write().unwrap_or_else(PoisonError::into_inner);
        builders
            .entry(key)
            .or_insert_with(|| QueryBuilder::for_driver(driver))
            .clone()
    }

    /// Use `builder` for `driver` from now on.
    pub fn register(&self, driver: &str, builder: QueryBuilder) {
        self.builders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(normalize_driver(driver), builder);
    }

    pub fn len(&self) -> usize {
        self.builders.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Configuration plus the metadata and dialect caches.
#[derive(Debug, Default)]
pub struct Orm {
    config: OrmConfig,
    metadata: MetadataCache,
    dialects: DialectRegistry,
}

impl Orm {
    pub fn new(config: OrmConfig) -> Self {
        Self {
            config,
            metadata: MetadataCache::new(),
            dialects: DialectRegistry::new(),
        }
    }

    pub fn config(&self) -> &OrmConfig {
        &self.config
    }

    pub fn metadata_cache(&self) -> &MetadataCache {
        &self.metadata
    }

    pub fn dialects(&self) -> &DialectRegistry {
        &self.dialects
    }

    /// Cached metadata for `T`.
    pub fn metadata<T: Record>(&self) -> OrmResult<Arc<Metadata>> {
        self.metadata.get_or_build::<T>()
    }

    /// The builder for the driver configured for `database`.
    pub fn builder_for(&self, database: &str) -> OrmResult<QueryBuilder> {
        let db = self.config.database(database)?;
        Ok(self.dialects.get(&db.driver))
    }

    pub fn model<T: Record>(&self) -> OrmResult<Model<T>> {
        let meta = self.metadata::<T>()?;
        let builder = self.builder_for(meta.database())?;
        Ok(Model::new(meta, builder))
    }

    pub fn query<T: Record>(&self) -> OrmResult<QuerySet<T>> {
        Ok(self.model::<T>()?.query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::dialect::CommonDialect;

    #[test]
    fn registry_caches_by_normalized_driver() {
        let registry = DialectRegistry::new();
        assert_eq!(registry.get("pgsql").dialect().name(), "postgres");
        assert_eq!(registry.get(" PGSQL ").dialect().name(), "postgres");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("mariadb").dialect().name(), "mysql");
        assert_eq!(registry.get("oracle").dialect().name(), "common");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn registered_builder_overrides_default() {
        let registry = DialectRegistry::new();
        registry.register("pgsql", QueryBuilder::new(Arc::new(CommonDialect)));
        assert_eq!(registry.get("pgsql").dialect().name(), "common");
    }

    #[test]
    fn builder_for_unknown_database_is_config_error() {
        let orm = Orm::new(
            OrmConfig::default().with_database("main", DatabaseConfig::new("mysql", "mysql://x")),
        );
        assert_eq!(orm.builder_for("main").unwrap().dialect().name(), "mysql");
        assert!(matches!(
            orm.builder_for("other"),
            Err(crate::OrmError::Config(_))
        ));
    }
}
