use crate::binding::Row;
use crate::record::RecordCore;
use std::fmt::Debug;
use type_mapping::{ColumnValue, FromColumnValue, MappingError, ToColumnValue};

/// One persistable field in the registry of an entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name, which is also the column name
    pub name: &'static str,
    /// An unassigned value is written as NULL instead of being reported as unset
    pub nullable: bool,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, nullable: bool) -> Self {
        Self { name, nullable }
    }
}

/// Mapping metadata of an entity type
///
/// This trait should be derived with `#[derive(Entity)]`, which builds the field
/// registry from the struct declaration:
///
/// ```ignore
/// #[derive(Debug, Clone, Entity)]
/// pub struct Orders {
///     #[identity]
///     id: Option<i64>,
///     item_id: Option<i64>,
///     item_price: Option<i64>,
///     quantity: Option<u32>,
///     #[record]
///     record: RecordCore,
/// }
/// ```
///
/// Every field except the identity, the record and `#[field(skip)]` fields is
/// persisted, under its own name, in declaration order.
pub trait Entity: Sized + Send {
    /// Type of the identity, the `T` in the `Option<T>` identity field
    type Id: ToColumnValue + FromColumnValue + Clone + Debug + Send + Sync;

    /// Rust type name of the entity
    fn entity_name() -> &'static str;

    /// Lower-cased type name unless overridden with `#[table(name = "...")]`
    fn table_name() -> &'static str;

    fn identity_column() -> &'static str;

    /// Persistable fields in declaration order
    fn fields() -> &'static [FieldDescriptor];

    /// Current values of the persistable fields, aligned with [`Entity::fields`]
    fn field_values(&self) -> Result<Vec<ColumnValue>, MappingError>;

    fn identity(&self) -> Option<&Self::Id>;

    /// Normally called only by the persistence layer after a successful create
    fn set_identity(&mut self, id: Self::Id);

    fn record(&self) -> &RecordCore;

    fn record_mut(&mut self) -> &mut RecordCore;

    /// Transient instance around `record`, every other field at its default
    fn from_record(record: RecordCore) -> Self;

    /// Overwrite identity and fields from a fetched row
    ///
    /// Either every column decodes and the entity is updated, or the entity
    /// is left untouched and the first failure is returned.
    fn load_row(&mut self, row: &Row) -> Result<(), MappingError>;
}
