//! Field registry used by field search, and the absent-value rule of partial updates.
//!
//! Every entity registers its readable fields once, as a mapping from the public
//! field name to the Sea-ORM column that stores it. Lookups are exact and
//! case-sensitive.

use sea_orm::{ColumnTrait, Value};

/// Name to column mapping for one entity type.
#[derive(Debug, Clone)]
pub struct FieldRegistry<C> {
    fields: Vec<(String, C)>,
}

impl<C: ColumnTrait> FieldRegistry<C> {
    /// Registers every column of the entity under its column name.
    #[must_use]
    pub fn from_columns() -> Self {
        Self {
            fields: C::iter()
                .map(|column| (column.as_str().to_owned(), column))
                .collect(),
        }
    }

    /// Registers only the given fields, under the given names.
    #[must_use]
    pub fn with_fields(fields: impl IntoIterator<Item = (&'static str, C)>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, column)| (name.to_owned(), column))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<C> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, column)| *column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, C)> {
        self.fields
            .iter()
            .map(|(name, column)| (name.as_str(), *column))
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// Returns true when a value is the default sentinel of its type.
///
/// Partial updates treat these values as "not supplied": null of any type, zero,
/// `false`, empty strings and byte arrays, the NUL character and the nil UUID.
/// There is no way to tell a deliberately cleared field from a missing one, so
/// an update can never reset a field to its default.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_absent(value: &Value) -> bool {
    match value {
        Value::Bool(v) => v.is_none_or(|b| !b),
        Value::TinyInt(v) => v.is_none_or(|n| n == 0),
        Value::SmallInt(v) => v.is_none_or(|n| n == 0),
        Value::Int(v) => v.is_none_or(|n| n == 0),
        Value::BigInt(v) => v.is_none_or(|n| n == 0),
        Value::TinyUnsigned(v) => v.is_none_or(|n| n == 0),
        Value::SmallUnsigned(v) => v.is_none_or(|n| n == 0),
        Value::Unsigned(v) => v.is_none_or(|n| n == 0),
        Value::BigUnsigned(v) => v.is_none_or(|n| n == 0),
        Value::Float(v) => v.is_none_or(|n| n == 0.0),
        Value::Double(v) => v.is_none_or(|n| n == 0.0),
        Value::Char(v) => v.is_none_or(|c| c == '\0'),
        Value::String(v) => v.as_ref().is_none_or(|s| s.is_empty()),
        Value::Bytes(v) => v.as_ref().is_none_or(|b| b.is_empty()),
        Value::Uuid(v) => v.as_ref().is_none_or(|id| id.is_nil()),
        Value::Json(v) => v.as_ref().is_none_or(|json| json.is_null()),
        Value::ChronoDate(v) => v.is_none(),
        Value::ChronoTime(v) => v.is_none(),
        Value::ChronoDateTime(v) => v.is_none(),
        Value::ChronoDateTimeUtc(v) => v.is_none(),
        Value::ChronoDateTimeLocal(v) => v.is_none(),
        Value::ChronoDateTimeWithTimeZone(v) => v.is_none(),
        // Variants behind sea-query features this crate does not enable itself.
        #[allow(unreachable_patterns)]
        _ => false,
    }
}
