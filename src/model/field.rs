//! The `Field` type for extractor output values.
//!
//! The field extractor returns every value either as a populated string or as
//! the literal sentinel `"NA"`. `Field` lifts that convention into a proper
//! sum type so the rest of the crate never branches on string comparisons.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The sentinel string the extractor uses for values it could not find.
const NOT_AVAILABLE: &str = "NA";

/// A value from an extracted document: either present, or marked "NA".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field {
    Present(String),
    #[default]
    NotAvailable,
}

impl Field {
    /// Returns the value if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::Present(s) => Some(s),
            Field::NotAvailable => None,
        }
    }

    /// Returns the value, or the literal `"NA"` for echoing into reports.
    pub fn echo(&self) -> &str {
        self.as_str().unwrap_or(NOT_AVAILABLE)
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Field::Present(_))
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        if s == NOT_AVAILABLE {
            Field::NotAvailable
        } else {
            Field::Present(s.to_string())
        }
    }
}

impl Serialize for Field {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.echo())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FieldVisitor)
    }
}

struct FieldVisitor;

impl<'de> Visitor<'de> for FieldVisitor {
    type Value = Field;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, \"NA\", or null")
    }

    fn visit_str<E>(self, v: &str) -> Result<Field, E>
    where
        E: de::Error,
    {
        if v.eq_ignore_ascii_case(NOT_AVAILABLE) {
            Ok(Field::NotAvailable)
        } else {
            Ok(Field::Present(v.to_string()))
        }
    }

    fn visit_none<E>(self) -> Result<Field, E>
    where
        E: de::Error,
    {
        Ok(Field::NotAvailable)
    }

    fn visit_unit<E>(self) -> Result<Field, E>
    where
        E: de::Error,
    {
        Ok(Field::NotAvailable)
    }

    // Anything else (numbers, booleans, arrays, objects) violates the
    // extractor contract and is rejected rather than coerced.
}
