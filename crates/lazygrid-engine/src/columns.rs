use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Declared grid column: identifier, header title and the record field the
/// default cell renderer reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub id: String,
    pub title: String,
    pub accessor: String,
}

impl ColumnSpec {
    /// Column whose accessor matches its id
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            accessor: id.clone(),
            id,
            title: title.into(),
        }
    }

    pub fn with_accessor(mut self, accessor: impl Into<String>) -> Self {
        self.accessor = accessor.into();
        self
    }
}

/// Tracks which declared columns are rendered. Independent of data: hiding a
/// column never touches fetch or sort state.
///
/// Persisting the visible set across sessions is the embedding application's
/// concern.
#[derive(Debug, Clone, Default)]
pub struct ColumnVisibility {
    declared: Vec<ColumnSpec>,
    hidden: HashSet<String>,
}

impl ColumnVisibility {
    pub fn new(declared: Vec<ColumnSpec>) -> Self {
        Self {
            declared,
            hidden: HashSet::new(),
        }
    }

    /// Flip visibility of a column. Unknown ids are ignored so that stored
    /// toggle state survives schema changes.
    pub fn toggle(&mut self, column_id: &str) {
        if !self.is_declared(column_id) {
            return;
        }
        if !self.hidden.remove(column_id) {
            self.hidden.insert(column_id.to_string());
        }
    }

    pub fn is_visible(&self, column_id: &str) -> bool {
        self.is_declared(column_id) && !self.hidden.contains(column_id)
    }

    /// Visible columns in declared order
    pub fn visible_columns(&self) -> Vec<&ColumnSpec> {
        self.declared
            .iter()
            .filter(|column| !self.hidden.contains(&column.id))
            .collect()
    }

    pub fn declared_columns(&self) -> &[ColumnSpec] {
        &self.declared
    }

    pub fn column(&self, column_id: &str) -> Option<&ColumnSpec> {
        self.declared.iter().find(|column| column.id == column_id)
    }

    fn is_declared(&self, column_id: &str) -> bool {
        self.declared.iter().any(|column| column.id == column_id)
    }
}
