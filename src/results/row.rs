use std::collections::HashMap;
use std::sync::Arc;

use crate::types::RowValues;

/// Column layout shared by every row of one statement.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    names: Arc<Vec<String>>,
    // keys are lower-cased so lookups ignore case
    by_name: Arc<HashMap<String, usize>>,
}

impl ColumnIndex {
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        let mut by_name = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            // first occurrence wins for duplicated column names
            by_name.entry(name.to_lowercase()).or_insert(i);
        }
        Self {
            names: Arc::new(names),
            by_name: Arc::new(by_name),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Get the index of a column by name, ignoring ASCII and Unicode case.
    #[must_use]
    pub fn position(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.by_name.get(column_name) {
            return Some(idx);
        }
        self.by_name.get(&column_name.to_lowercase()).copied()
    }
}

/// A row from a query result
///
/// Row mappers read fields by name; lookups are case-insensitive and columns a
/// mapper does not ask for are simply ignored.
#[derive(Debug, Clone)]
pub struct DbRow {
    columns: ColumnIndex,
    /// The values for this row, in column order
    pub values: Vec<RowValues>,
}

impl DbRow {
    /// Create a new database row
    ///
    /// # Arguments
    ///
    /// * `columns` - The column layout shared with sibling rows
    /// * `values` - The values for this row
    #[must_use]
    pub fn new(columns: ColumnIndex, values: Vec<RowValues>) -> Self {
        Self { columns, values }
    }

    /// Build a standalone row from column names and values.
    #[must_use]
    pub fn from_pairs(names: &[&str], values: Vec<RowValues>) -> Self {
        let columns = ColumnIndex::new(names.iter().map(|n| (*n).to_owned()).collect());
        Self { columns, values }
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.columns.names()
    }

    /// Get a value from the row by column name
    ///
    /// # Returns
    ///
    /// The value at the column, or None if the column wasn't found
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.columns
            .position(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    /// Read an identifier column. Absent, NULL, non-numeric and non-positive
    /// values all yield `None`, which mappers treat as "no entity".
    #[must_use]
    pub fn id(&self, column_name: &str) -> Option<i64> {
        self.get(column_name)
            .and_then(RowValues::to_i64)
            .filter(|id| *id > 0)
    }

    /// Read a column as text; NULL and absent columns yield `None`.
    #[must_use]
    pub fn text(&self, column_name: &str) -> Option<String> {
        self.get(column_name).and_then(RowValues::to_text)
    }
}
