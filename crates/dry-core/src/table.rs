//! Predicted and live table schemas
//!
//! A [`Table`] is an ordered list of [`Field`]s. Field order matters when a
//! schema is rendered back into SQL (literal substitution), while schema
//! comparisons are keyed by field name and ignore order.

use crate::sql_utils::quote_ident;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Nullability / repetition of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldMode {
    /// Column may contain NULL (default)
    #[default]
    Nullable,
    /// Column is declared NOT NULL
    Required,
    /// Column holds a list of `data_type` values
    Repeated,
}

/// A single column of a table schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name
    pub name: String,

    /// Engine type name as reported by the SQL engine (e.g. `INTEGER`,
    /// `DECIMAL(10,2)`, `STRUCT(a INTEGER)`)
    pub data_type: String,

    /// Nullability / repetition
    #[serde(default)]
    pub mode: FieldMode,

    /// Members of a struct column
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

impl Field {
    /// Create a nullable scalar field
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            mode: FieldMode::Nullable,
            fields: Vec::new(),
        }
    }

    /// Create a struct field from its members
    pub fn nested(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            data_type: "STRUCT".to_string(),
            mode: FieldMode::Nullable,
            fields,
        }
    }

    /// Return a copy of this field with a different mode
    pub fn with_mode(mut self, mode: FieldMode) -> Self {
        self.mode = mode;
        self
    }

    /// Render the SQL type used to cast a NULL literal to this field's type.
    ///
    /// Struct members are rendered recursively; repeated fields become lists.
    pub fn sql_type(&self) -> String {
        let base = if self.fields.is_empty() {
            self.data_type.clone()
        } else {
            let members = self
                .fields
                .iter()
                .map(|f| format!("{} {}", quote_ident(&f.name), f.sql_type()))
                .collect::<Vec<_>>()
                .join(", ");
            format!("STRUCT({})", members)
        };

        match self.mode {
            FieldMode::Repeated => format!("{}[]", base),
            FieldMode::Nullable | FieldMode::Required => base,
        }
    }
}

/// An ordered table schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Table {
    /// Columns in engine order
    pub fields: Vec<Field>,
}

impl Table {
    /// Create a table from its fields
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Field names as an order-independent set
    pub fn field_names(&self) -> BTreeSet<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the table has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<Field> for Table {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
