//! Traits for entity persistence
//!
//! `Entity` is derived per type and describes its fields; `Persistable` is the
//! lifecycle every entity gets for free on top of it.

pub mod entity;
pub mod persistable;

pub use entity::{Entity, FieldDescriptor};
pub use persistable::Persistable;
