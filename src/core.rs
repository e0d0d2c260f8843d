//! Core RowHaus functionality
//!
//! `RowHaus` holds one executor and one mapper configuration and hands out
//! entities, gateways and lookups that all share them.

use active_record::{
    Entity, Executor, LogExecutor, Persistable, Statement, StatementBuilder, StoreError,
    TableGateway,
};
use config::{AppConfig, MapperConfig};
use std::sync::Arc;
use type_mapping::ColumnValue;

use crate::debug_log;
use crate::errors::RowHausError;

/// Main RowHaus coordinator that binds entities to a shared executor
#[derive(Clone)]
pub struct RowHaus {
    executor: Arc<dyn Executor>,
    mapper: MapperConfig,
}

impl std::fmt::Debug for RowHaus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowHaus")
            .field("mapper", &self.mapper)
            .finish_non_exhaustive()
    }
}

impl RowHaus {
    /// Create RowHaus around an executor with the default mapper configuration
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self::with_mapper(executor, MapperConfig::default())
    }

    pub fn with_mapper(executor: Arc<dyn Executor>, mapper: MapperConfig) -> Self {
        Self { executor, mapper }
    }

    /// RowHaus that only logs the statements it would run
    pub fn logging() -> Self {
        Self::new(Arc::new(LogExecutor::new()))
    }

    /// Build from loaded configuration
    ///
    /// A `[database]` section connects a PostgreSQL executor; without one,
    /// statements are only logged.
    pub fn from_config(config: &AppConfig) -> Result<Self, RowHausError> {
        match &config.database {
            None => Ok(Self::with_mapper(
                Arc::new(LogExecutor::new()),
                config.mapper,
            )),
            #[cfg(feature = "postgres")]
            Some(database) => {
                let executor = active_record::PgExecutor::connect(database, &config.mapper)?;
                tracing::info!(host = %database.host, database = %database.database, "Connected to PostgreSQL");
                Ok(Self::with_mapper(Arc::new(executor), config.mapper))
            }
            #[cfg(not(feature = "postgres"))]
            Some(_) => Err(RowHausError::DatabaseUnavailable),
        }
    }

    /// Load configuration from `ROWHAUS_CONFIG` or `./rowhaus.toml` and build from it
    pub fn from_env() -> Result<Self, RowHausError> {
        Self::from_config(&AppConfig::load()?)
    }

    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }

    pub fn mapper(&self) -> &MapperConfig {
        &self.mapper
    }

    pub fn builder(&self) -> StatementBuilder {
        StatementBuilder::from_config(&self.mapper)
    }

    /// Gateway for the table of `E`
    pub fn gateway<E: Entity>(&self) -> TableGateway {
        TableGateway::for_entity::<E>(self.executor.clone(), self.builder())
    }

    /// New transient entity bound to this executor
    pub fn entity<E: Persistable>(&self) -> E {
        E::bind_with(self.executor.clone(), self.builder())
    }

    /// Load the entity stored under `id`
    pub fn find<E: Persistable>(&self, id: &E::Id) -> Result<E, StoreError> {
        debug_log!("[FIND] {} id={:?}", E::entity_name(), id);
        E::find_with(self.gateway::<E>(), id)
    }

    /// Statement text and parameters in the configured placeholder style
    pub fn render(&self, statement: &Statement) -> (String, Vec<ColumnValue>) {
        statement.to_sql(self.mapper.placeholder_style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::Orders;
    use active_record::{MemoryExecutor, StatementKind};
    use config::{PlaceholderStyle, UnsetPolicy};

    #[test]
    fn test_entities_share_the_executor() {
        let executor = Arc::new(MemoryExecutor::new());
        let rowhaus = RowHaus::new(executor.clone());

        let mut order: Orders = rowhaus.entity();
        order.set_item_id(3);
        order.set_quantity(1);
        order.create().unwrap();

        let id = order.id().unwrap();
        let found: Orders = rowhaus.find(&id).unwrap();
        assert_eq!(found.item_id(), Some(3));
        assert_eq!(found.item_price(), None);
        assert_eq!(executor.statements().len(), 2);
    }

    #[test]
    fn test_mapper_config_reaches_statements() {
        let executor = Arc::new(MemoryExecutor::new());
        let mapper = MapperConfig {
            unset_policy: UnsetPolicy::Null,
            placeholder_style: PlaceholderStyle::Question,
            log_statements: false,
        };
        let rowhaus = RowHaus::with_mapper(executor.clone(), mapper);

        let mut order: Orders = rowhaus.entity();
        order.set_quantity(2);
        order.create().unwrap();

        let statement = &executor.statements()[0];
        assert_eq!(statement.kind(), StatementKind::Insert);
        let (sql, params) = rowhaus.render(statement);
        assert_eq!(
            sql,
            "INSERT INTO orders (item_id, item_price, quantity) VALUES (NULL, NULL, ?);"
        );
        assert_eq!(params, vec![ColumnValue::BigInt(2)]);
    }

    #[test]
    fn test_from_config_without_database_logs() {
        let config = AppConfig::from_toml_str("[mapper]\nunset_policy = \"reject\"\n").unwrap();
        let rowhaus = RowHaus::from_config(&config).unwrap();
        assert_eq!(rowhaus.mapper().unset_policy, UnsetPolicy::Reject);

        let mut order: Orders = rowhaus.entity();
        order.set_quantity(1);
        let err = order.create().unwrap_err();
        assert!(matches!(err, StoreError::Mapping(_)));
    }
}
