//! Conversions between field types and column values
//!
//! `ToColumnValue` is what the entity derive calls for every persistable field,
//! `FromColumnValue` is what it calls when an entity is rebuilt from a row.

use crate::errors::MappingError;
use crate::types::ColumnValue;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Normalize a field value into its transport-safe representation
pub trait ToColumnValue {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError>;
}

/// Rebuild a field value from a column value read back from storage
pub trait FromColumnValue: Sized {
    fn from_column_value(value: &ColumnValue) -> Result<Self, MappingError>;
}

impl ToColumnValue for ColumnValue {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        Ok(self.clone())
    }
}

impl FromColumnValue for ColumnValue {
    fn from_column_value(value: &ColumnValue) -> Result<Self, MappingError> {
        Ok(value.clone())
    }
}

impl ToColumnValue for String {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        Ok(ColumnValue::Text(self.clone()))
    }
}

impl ToColumnValue for str {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        Ok(ColumnValue::Text(self.to_string()))
    }
}

impl ToColumnValue for bool {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        Ok(ColumnValue::Boolean(*self))
    }
}

impl ToColumnValue for i8 {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        Ok(ColumnValue::SmallInt(i16::from(*self)))
    }
}

impl ToColumnValue for i16 {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        Ok(ColumnValue::SmallInt(*self))
    }
}

impl ToColumnValue for u8 {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        Ok(ColumnValue::SmallInt(i16::from(*self)))
    }
}

impl ToColumnValue for i32 {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        Ok(ColumnValue::Integer(*self))
    }
}

impl ToColumnValue for u16 {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        Ok(ColumnValue::Integer(i32::from(*self)))
    }
}

impl ToColumnValue for i64 {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        Ok(ColumnValue::BigInt(*self))
    }
}

impl ToColumnValue for u32 {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        Ok(ColumnValue::BigInt(i64::from(*self)))
    }
}

// No native unsigned 64-bit column type; values past i64::MAX travel as decimals
impl ToColumnValue for u64 {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        Ok(match i64::try_from(*self) {
            Ok(v) => ColumnValue::BigInt(v),
            Err(_) => ColumnValue::Decimal(self.to_string()),
        })
    }
}

impl ToColumnValue for f64 {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        if !self.is_finite() {
            return Err(MappingError::NonFinite {
                column: String::new(),
                value: *self,
            });
        }
        Ok(ColumnValue::Float(*self))
    }
}

impl ToColumnValue for f32 {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        f64::from(*self).to_column_value()
    }
}

impl ToColumnValue for Uuid {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        Ok(ColumnValue::Uuid(*self))
    }
}

impl ToColumnValue for DateTime<Utc> {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        Ok(ColumnValue::Timestamp(*self))
    }
}

impl ToColumnValue for serde_json::Value {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        Ok(ColumnValue::Json(self.clone()))
    }
}

/// An unassigned optional field is `Unset`, not `Null`
impl<T: ToColumnValue> ToColumnValue for Option<T> {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        match self {
            Some(v) => v.to_column_value(),
            None => Ok(ColumnValue::Unset),
        }
    }
}

impl<T: ToColumnValue + ?Sized> ToColumnValue for &T {
    fn to_column_value(&self) -> Result<ColumnValue, MappingError> {
        (**self).to_column_value()
    }
}

fn integer_of(value: &ColumnValue, target: &'static str) -> Result<i64, MappingError> {
    match value {
        ColumnValue::SmallInt(v) => Ok(i64::from(*v)),
        ColumnValue::Integer(v) => Ok(i64::from(*v)),
        ColumnValue::BigInt(v) => Ok(*v),
        ColumnValue::Decimal(s) => s
            .parse::<i64>()
            .map_err(|_| MappingError::out_of_range(target, s)),
        other => Err(MappingError::type_mismatch(target, other.type_name())),
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl FromColumnValue for $ty {
                fn from_column_value(value: &ColumnValue) -> Result<Self, MappingError> {
                    let wide = integer_of(value, $name)?;
                    <$ty>::try_from(wide).map_err(|_| MappingError::out_of_range($name, wide))
                }
            }
        )*
    };
}

impl_from_integer! {
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
}

impl FromColumnValue for i64 {
    fn from_column_value(value: &ColumnValue) -> Result<Self, MappingError> {
        integer_of(value, "i64")
    }
}

impl FromColumnValue for u64 {
    fn from_column_value(value: &ColumnValue) -> Result<Self, MappingError> {
        match value {
            ColumnValue::Decimal(s) => s
                .parse::<u64>()
                .map_err(|_| MappingError::out_of_range("u64", s)),
            other => {
                let wide = integer_of(other, "u64")?;
                u64::try_from(wide).map_err(|_| MappingError::out_of_range("u64", wide))
            }
        }
    }
}

impl FromColumnValue for f64 {
    fn from_column_value(value: &ColumnValue) -> Result<Self, MappingError> {
        match value {
            ColumnValue::Float(v) => Ok(*v),
            ColumnValue::SmallInt(v) => Ok(f64::from(*v)),
            ColumnValue::Integer(v) => Ok(f64::from(*v)),
            ColumnValue::BigInt(v) => Ok(*v as f64),
            ColumnValue::Decimal(s) => s
                .parse::<f64>()
                .map_err(|_| MappingError::out_of_range("f64", s)),
            other => Err(MappingError::type_mismatch("f64", other.type_name())),
        }
    }
}

impl FromColumnValue for f32 {
    fn from_column_value(value: &ColumnValue) -> Result<Self, MappingError> {
        f64::from_column_value(value).map(|v| v as f32)
    }
}

impl FromColumnValue for bool {
    fn from_column_value(value: &ColumnValue) -> Result<Self, MappingError> {
        match value {
            ColumnValue::Boolean(v) => Ok(*v),
            other => Err(MappingError::type_mismatch("bool", other.type_name())),
        }
    }
}

impl FromColumnValue for String {
    fn from_column_value(value: &ColumnValue) -> Result<Self, MappingError> {
        match value {
            ColumnValue::Text(v) => Ok(v.clone()),
            other => Err(MappingError::type_mismatch("String", other.type_name())),
        }
    }
}

impl FromColumnValue for Uuid {
    fn from_column_value(value: &ColumnValue) -> Result<Self, MappingError> {
        match value {
            ColumnValue::Uuid(v) => Ok(*v),
            ColumnValue::Text(s) => {
                Uuid::parse_str(s).map_err(|_| MappingError::type_mismatch("Uuid", "text"))
            }
            other => Err(MappingError::type_mismatch("Uuid", other.type_name())),
        }
    }
}

impl FromColumnValue for DateTime<Utc> {
    fn from_column_value(value: &ColumnValue) -> Result<Self, MappingError> {
        match value {
            ColumnValue::Timestamp(v) => Ok(*v),
            ColumnValue::Text(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| MappingError::type_mismatch("DateTime<Utc>", "text")),
            other => Err(MappingError::type_mismatch(
                "DateTime<Utc>",
                other.type_name(),
            )),
        }
    }
}

impl FromColumnValue for serde_json::Value {
    fn from_column_value(value: &ColumnValue) -> Result<Self, MappingError> {
        match value {
            ColumnValue::Json(v) => Ok(v.clone()),
            ColumnValue::Text(s) => serde_json::from_str(s)
                .map_err(|_| MappingError::type_mismatch("serde_json::Value", "text")),
            other => Err(MappingError::type_mismatch(
                "serde_json::Value",
                other.type_name(),
            )),
        }
    }
}

impl<T: FromColumnValue> FromColumnValue for Option<T> {
    fn from_column_value(value: &ColumnValue) -> Result<Self, MappingError> {
        if value.is_absent() {
            return Ok(None);
        }
        T::from_column_value(value).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unassigned_option_is_unset_not_null() {
        let quantity: Option<i32> = None;
        assert_eq!(quantity.to_column_value().unwrap(), ColumnValue::Unset);

        let quantity = Some(2);
        assert_eq!(quantity.to_column_value().unwrap(), ColumnValue::Integer(2));
    }

    #[test]
    fn test_non_finite_floats_are_rejected() {
        let err = f64::NAN.to_column_value().unwrap_err();
        assert!(matches!(err, MappingError::NonFinite { .. }));
        assert!(f64::INFINITY.to_column_value().is_err());
        assert_eq!(
            1.5f64.to_column_value().unwrap(),
            ColumnValue::Float(1.5)
        );
    }

    #[test]
    fn test_large_u64_travels_as_decimal() {
        assert_eq!(7u64.to_column_value().unwrap(), ColumnValue::BigInt(7));
        assert_eq!(
            u64::MAX.to_column_value().unwrap(),
            ColumnValue::Decimal(u64::MAX.to_string())
        );
        assert_eq!(
            u64::from_column_value(&ColumnValue::Decimal(u64::MAX.to_string())).unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn test_integer_narrowing_checks_range() {
        assert_eq!(i32::from_column_value(&ColumnValue::BigInt(42)).unwrap(), 42);
        let err = i32::from_column_value(&ColumnValue::BigInt(i64::MAX)).unwrap_err();
        assert!(matches!(err, MappingError::OutOfRange { target: "i32", .. }));
        assert!(u32::from_column_value(&ColumnValue::Integer(-1)).is_err());
    }

    #[test]
    fn test_null_requires_option() {
        assert!(i64::from_column_value(&ColumnValue::Null).is_err());
        assert_eq!(
            Option::<i64>::from_column_value(&ColumnValue::Null).unwrap(),
            None
        );
        assert_eq!(
            Option::<i64>::from_column_value(&ColumnValue::BigInt(3)).unwrap(),
            Some(3)
        );
    }

    #[test]
    fn test_type_mismatch_names_both_sides() {
        let err = bool::from_column_value(&ColumnValue::Text("yes".into()))
            .unwrap_err()
            .for_column("active");
        assert_eq!(
            err,
            MappingError::TypeMismatch {
                column: "active".to_string(),
                expected: "bool",
                found: "text",
            }
        );
        assert_eq!(err.column(), "active");
    }
}
