//! Table descriptors
//!
//! The table name of an entity is its concrete type name, lower-cased
//! (`Orders` -> `orders`). This is the schema contract between rowhaus and
//! whatever created the table, so it never depends on anything but the type.

use crate::traits::Entity;
use std::fmt;
use type_mapping::{validate_identifier, ValidationError};

/// Resolved table name plus the column holding the identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableDescriptor {
    name: String,
    identity_column: String,
}

/// Lower-cased last path segment of a type name, generics stripped
///
/// `table_name_for_type(std::any::type_name::<shop::Orders>())` is `"orders"`.
pub fn table_name_for_type(type_name: &str) -> String {
    let without_generics = type_name.split('<').next().unwrap_or(type_name);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
        .to_lowercase()
}

impl TableDescriptor {
    pub const DEFAULT_IDENTITY_COLUMN: &'static str = "id";

    /// Descriptor for `name` with the default `id` identity column
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        validate_identifier(name)?;
        Ok(Self {
            name: name.to_string(),
            identity_column: Self::DEFAULT_IDENTITY_COLUMN.to_string(),
        })
    }

    /// Descriptor named after the runtime type name of `T`
    pub fn of_type<T: ?Sized>() -> Result<Self, ValidationError> {
        Self::new(&table_name_for_type(std::any::type_name::<T>()))
    }

    /// Descriptor for an entity type. Names were validated when the entity was derived.
    pub fn for_entity<E: Entity>() -> Self {
        Self {
            name: E::table_name().to_string(),
            identity_column: E::identity_column().to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identity_column(&self) -> &str {
        &self.identity_column
    }
}

impl fmt::Display for TableDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LineItem;

    #[test]
    fn test_table_name_is_lowercased_type_name() {
        assert_eq!(table_name_for_type("shop::model::Orders"), "orders");
        assert_eq!(table_name_for_type("Orders"), "orders");
        assert_eq!(
            table_name_for_type("shop::Wrapper<shop::Orders>"),
            "wrapper"
        );
        assert_eq!(TableDescriptor::of_type::<LineItem>().unwrap().name(), "lineitem");
    }

    #[test]
    fn test_descriptor_is_stable() {
        let first = TableDescriptor::of_type::<LineItem>().unwrap();
        let second = TableDescriptor::of_type::<LineItem>().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.identity_column(), "id");
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        assert!(TableDescriptor::new("order").is_err());
        assert!(TableDescriptor::new("orders; DROP TABLE x").is_err());
        assert!(TableDescriptor::new("1orders").is_err());
    }
}
