use crate::binding::ColumnBinding;
use crate::debug_log;
use crate::descriptor::TableDescriptor;
use crate::errors::StoreError;
use crate::executor::{default_executor, Executor};
use crate::gateway::TableGateway;
use crate::introspect::{columns, identity_binding, identity_value, introspect};
use crate::record::{EntityState, RecordCore};
use crate::statement::{StatementBuilder, StatementKind};
use crate::traits::Entity;
use std::sync::Arc;
use type_mapping::{ColumnValue, FromColumnValue, ToColumnValue};

/// Lifecycle operations shared by every entity
///
/// Implemented for every [`Entity`]; entity types never implement it by hand.
/// All operations run synchronously against the executor bound at
/// construction and leave the entity untouched when they fail.
pub trait Persistable: Entity {
    /// New transient entity bound to `executor`
    fn bind(executor: Arc<dyn Executor>) -> Self {
        Self::bind_with(executor, StatementBuilder::default())
    }

    fn bind_with(executor: Arc<dyn Executor>, builder: StatementBuilder) -> Self {
        let gateway = TableGateway::for_entity::<Self>(executor, builder);
        Self::from_record(RecordCore::new(gateway))
    }

    /// New transient entity bound to the default logging executor
    fn detached() -> Self {
        Self::bind(default_executor())
    }

    fn table(&self) -> &TableDescriptor {
        self.record().table()
    }

    fn state(&self) -> EntityState {
        if self.record().is_deleted() {
            EntityState::Deleted
        } else if self.record().is_stored() && self.identity().is_some() {
            EntityState::Persisted
        } else {
            EntityState::Transient
        }
    }

    /// Column bindings `create` would submit right now
    fn bindings(&self) -> Result<Vec<ColumnBinding>, StoreError> {
        Ok(introspect(self)?)
    }

    /// Insert the entity's current field values
    ///
    /// An identity assigned before `create` is inserted with the row. Without
    /// one, the executor generates an integer identity, which is written back
    /// only after the insert succeeded. With an executor that generates none,
    /// the entity stays transient until [`Entity::set_identity`] is called.
    fn create(&mut self) -> Result<(), StoreError> {
        if self.record().is_deleted() {
            return Err(stale(&*self, StatementKind::Insert));
        }
        if self.record().is_stored() {
            return Err(StoreError::AlreadyPersisted {
                table: self.table().name().to_string(),
            });
        }

        let mut bindings = introspect(&*self)?;
        match identity_binding(&*self)? {
            Some(identity) => bindings.insert(0, identity),
            // Generated identities are integers; other identity types must be assigned
            None if Self::Id::from_column_value(&ColumnValue::BigInt(1)).is_err() => {
                return Err(StoreError::MissingIdentity {
                    table: self.table().name().to_string(),
                    operation: StatementKind::Insert,
                });
            }
            None => {}
        }
        let outcome = self.record().gateway().insert(bindings)?;
        self.record_mut().mark_stored();

        if let Some(generated) = outcome.generated_identity {
            let id = Self::Id::from_column_value(&generated)
                .map_err(|e| e.for_column(Self::identity_column()))?;
            debug_log!("[CREATE] {} id={:?}", Self::entity_name(), id);
            self.set_identity(id);
        }
        Ok(())
    }

    /// Write the entity's current field values to its row
    fn update(&self) -> Result<(), StoreError> {
        let identity = live_identity(self, StatementKind::Update)?;
        let bindings = introspect(self)?;
        let outcome = self
            .record()
            .gateway()
            .update(Some(identity.clone()), bindings)?;
        ensure_found(self, outcome.rows_affected, &identity)
    }

    /// Delete the entity's row; the entity is unusable afterwards
    fn delete(&mut self) -> Result<(), StoreError> {
        let identity = live_identity(&*self, StatementKind::Delete)?;
        let outcome = self.record().gateway().delete(Some(identity.clone()))?;
        ensure_found(&*self, outcome.rows_affected, &identity)?;
        self.record_mut().mark_deleted();
        Ok(())
    }

    /// Replace the field values with what is currently stored
    fn reload(&mut self) -> Result<(), StoreError> {
        let identity = live_identity(&*self, StatementKind::Select)?;
        let row = self
            .record()
            .gateway()
            .find(Some(identity.clone()), &columns::<Self>())?
            .ok_or_else(|| not_found(self.table(), &identity))?;
        self.load_row(&row)?;
        Ok(())
    }

    /// Load the entity stored under `id`
    fn find_by_id(executor: Arc<dyn Executor>, id: &Self::Id) -> Result<Self, StoreError> {
        Self::find_with(
            TableGateway::for_entity::<Self>(executor, StatementBuilder::default()),
            id,
        )
    }

    /// Load the entity stored under `id` through `gateway`, which the loaded
    /// entity stays bound to
    fn find_with(gateway: TableGateway, id: &Self::Id) -> Result<Self, StoreError> {
        let identity = id
            .to_column_value()
            .map_err(|e| e.for_column(Self::identity_column()))?;
        let row = gateway
            .find(Some(identity.clone()), &columns::<Self>())?
            .ok_or_else(|| not_found(gateway.table(), &identity))?;

        let mut entity = Self::from_record(RecordCore::new(gateway));
        entity.load_row(&row)?;
        if entity.identity().is_none() {
            entity.set_identity(id.clone());
        }
        entity.record_mut().mark_stored();
        Ok(entity)
    }
}

impl<E: Entity> Persistable for E {}

/// Identity of an entity that may still reach its row
fn live_identity<E: Entity>(entity: &E, operation: StatementKind) -> Result<ColumnValue, StoreError> {
    if entity.record().is_deleted() {
        return Err(stale(entity, operation));
    }
    let identity = if entity.record().is_stored() {
        identity_value(entity)?
    } else {
        None
    };
    identity.ok_or_else(|| StoreError::MissingIdentity {
        table: entity.record().table().name().to_string(),
        operation,
    })
}

fn stale<E: Entity>(entity: &E, operation: StatementKind) -> StoreError {
    StoreError::StaleEntity {
        table: entity.record().table().name().to_string(),
        operation,
    }
}

fn ensure_found<E: Entity>(
    entity: &E,
    rows_affected: u64,
    identity: &ColumnValue,
) -> Result<(), StoreError> {
    if rows_affected == 0 {
        return Err(not_found(entity.record().table(), identity));
    }
    Ok(())
}

fn not_found(table: &TableDescriptor, identity: &ColumnValue) -> StoreError {
    StoreError::NotFound {
        table: table.name().to_string(),
        identity: identity.to_string(),
    }
}
