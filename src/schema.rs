//! Column schema registry and row storage for the flattened table.
//!
//! The schema is an append-only ordered registry: every column name
//! discovered across all processed documents gets a stable ordinal in
//! first-discovery order, and ordinals are never reused or compacted. Rows
//! are sparse; a row only stores values for the columns its own document
//! produced, and the emitter fills the gaps with empty fields.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Reserved name of the synthetic first column holding each document's
/// 1-based position in the input stream.
pub const ROWNUM_COLUMN: &str = "rownum";

/// Append-only ordered registry of column names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    columns: IndexSet<String>,
}

impl ColumnSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self {
            columns: IndexSet::new(),
        }
    }

    /// Return the ordinal for `name`, registering it at the next unused
    /// ordinal if it has not been seen before. All schema mutation funnels
    /// through here.
    pub fn intern(&mut self, name: &str) -> usize {
        match self.columns.get_index_of(name) {
            Some(index) => index,
            None => self.columns.insert_full(name.to_string()).0,
        }
    }

    /// Ordinal of an already-registered column.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    /// Column name at the given ordinal.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.columns.get_index(index).map(String::as_str)
    }

    /// Column names in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Number of registered columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no column has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One flattened record: a sparse mapping from column name to extracted text.
///
/// A stored `None` means the child element existed but carried no text; a
/// name absent from the map means no such child existed at all. Both render
/// as an empty output field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    values: IndexMap<String, Option<String>>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }

    /// Set the value for a column, replacing any earlier value.
    pub fn set(&mut self, column: String, value: Option<String>) {
        self.values.insert(column, value);
    }

    /// The stored text for a column, if present and non-null.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).and_then(|value| value.as_deref())
    }

    /// Whether the row stores anything (even a null) for the column.
    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Column names stored in this row, in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of columns stored in this row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row stores no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Monotonic counters describing one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    /// Documents seen, including ones that produced no row.
    pub total: u64,
    /// Documents flattened into a row.
    pub extracted: u64,
    /// Documents that were not well-formed XML.
    pub parse_failures: u64,
    /// Well-formed documents where no candidate path matched.
    pub not_found: u64,
}

impl RunCounters {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every processed document must be accounted for by exactly one outcome.
    pub fn is_consistent(&self) -> bool {
        self.total == self.extracted + self.parse_failures + self.not_found
    }

    /// Whether any document failed to produce a row.
    pub fn has_failures(&self) -> bool {
        self.parse_failures > 0 || self.not_found > 0
    }
}
