//! Field introspection
//!
//! Reads the persistable state of any [`Entity`] through its derived field
//! registry. Adding a field to an entity struct adds a column here without
//! any change to this module.

use crate::binding::ColumnBinding;
use crate::trace_log;
use crate::traits::Entity;
use type_mapping::{ColumnValue, MappingError, ToColumnValue};

/// Column bindings for every persistable field of `entity`, in declaration order
///
/// Unassigned fields come back as [`ColumnValue::Unset`], except fields declared
/// `#[field(nullable)]`, which come back as [`ColumnValue::Null`]. The
/// statement builder decides what happens to the remaining unset values.
pub fn introspect<E: Entity>(entity: &E) -> Result<Vec<ColumnBinding>, MappingError> {
    let fields = E::fields();
    let values = entity.field_values()?;

    if values.len() != fields.len() {
        return Err(MappingError::RegistryMismatch {
            entity: E::entity_name(),
            expected: fields.len(),
            found: values.len(),
        });
    }

    trace_log!("[INTROSPECT] {} fields={}", E::entity_name(), fields.len());

    Ok(fields
        .iter()
        .zip(values)
        .map(|(field, value)| {
            let value = if field.nullable && value.is_unset() {
                ColumnValue::Null
            } else {
                value
            };
            ColumnBinding::new(field.name, value)
        })
        .collect())
}

/// Names of the persistable columns of `E`
pub fn columns<E: Entity>() -> Vec<&'static str> {
    E::fields().iter().map(|field| field.name).collect()
}

/// Identity of `entity` as a binding on its identity column
pub fn identity_binding<E: Entity>(entity: &E) -> Result<Option<ColumnBinding>, MappingError> {
    Ok(identity_value(entity)?.map(|value| ColumnBinding::new(E::identity_column(), value)))
}

/// Identity of `entity` as a column value, `None` while it has none
pub fn identity_value<E: Entity>(entity: &E) -> Result<Option<ColumnValue>, MappingError> {
    let Some(id) = entity.identity() else {
        return Ok(None);
    };
    let value = id
        .to_column_value()
        .map_err(|e| e.for_column(E::identity_column()))?;
    Ok((!value.is_absent()).then_some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordCore;
    use crate::traits::Persistable;
    use proptest::prelude::*;
    use table_derive::Entity;

    #[derive(Debug, Clone, Entity)]
    struct Shipment {
        id: Option<i64>,
        carrier: Option<String>,
        weight_grams: Option<u32>,
        #[field(nullable)]
        tracking: Option<String>,
        express: bool,
        record: RecordCore,
    }

    #[test]
    fn test_bindings_follow_declaration_order() {
        let shipment = Shipment::detached();
        let names: Vec<_> = introspect(&shipment)
            .unwrap()
            .iter()
            .map(|b| b.column().to_string())
            .collect();
        assert_eq!(names, vec!["carrier", "weight_grams", "tracking", "express"]);
        assert_eq!(columns::<Shipment>(), names);
    }

    #[test]
    fn test_unset_and_nullable_values() {
        let shipment = Shipment::detached();
        let bindings = introspect(&shipment).unwrap();
        assert_eq!(bindings[0].value(), &ColumnValue::Unset);
        assert_eq!(bindings[2].value(), &ColumnValue::Null);
        assert_eq!(bindings[3].value(), &ColumnValue::Boolean(false));
    }

    #[test]
    fn test_identity_binding() {
        let mut shipment = Shipment::detached();
        assert_eq!(identity_binding(&shipment).unwrap(), None);

        shipment.set_identity(4);
        let binding = identity_binding(&shipment).unwrap().unwrap();
        assert_eq!(binding.column(), "id");
        assert_eq!(binding.value(), &ColumnValue::BigInt(4));
    }

    proptest! {
        #[test]
        fn introspection_is_idempotent(
            carrier in proptest::option::of("[a-z' ]{0,12}"),
            weight in proptest::option::of(any::<u32>()),
            tracking in proptest::option::of("[A-Z0-9]{0,10}"),
            express in any::<bool>(),
        ) {
            let mut shipment = Shipment::detached();
            shipment.carrier = carrier;
            shipment.weight_grams = weight;
            shipment.tracking = tracking;
            shipment.express = express;

            let first = introspect(&shipment).unwrap();
            let second = introspect(&shipment).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
