//! Embedded persistence state
//!
//! Every entity carries a [`RecordCore`]: the gateway bound to its table at
//! construction and the lifecycle flags. The gateway has no setter, so the
//! binding cannot change for the lifetime of the instance.

use crate::descriptor::TableDescriptor;
use crate::gateway::TableGateway;

/// Lifecycle state of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// Not stored yet, or stored without a known identity
    Transient,
    /// Stored and identified
    Persisted,
    /// Its row was deleted; every further operation fails
    Deleted,
}

#[derive(Debug, Clone)]
pub struct RecordCore {
    gateway: TableGateway,
    stored: bool,
    deleted: bool,
}

impl RecordCore {
    pub fn new(gateway: TableGateway) -> Self {
        Self {
            gateway,
            stored: false,
            deleted: false,
        }
    }

    pub fn gateway(&self) -> &TableGateway {
        &self.gateway
    }

    pub fn table(&self) -> &TableDescriptor {
        self.gateway.table()
    }

    /// Whether a row was inserted for, or loaded into, this entity
    pub fn is_stored(&self) -> bool {
        self.stored
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub(crate) fn mark_stored(&mut self) {
        self.stored = true;
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}
