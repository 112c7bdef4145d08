use serde::{Deserialize, Serialize};

/// Sort direction for the client-side sort engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sort specification applied to the in-memory row set only.
///
/// `key: None` means "leave rows in insertion order"; it is the identity,
/// not a sort with arbitrary order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortSpec {
    /// No sorting; rows keep insertion order
    pub fn unsorted() -> Self {
        Self {
            key: None,
            direction: SortDirection::Ascending,
        }
    }

    pub fn by(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: Some(key.into()),
            direction,
        }
    }

    /// Toggle behavior for column-header clicks: same key flips direction,
    /// a new key starts ascending.
    pub fn toggled(&self, key: &str) -> Self {
        match &self.key {
            Some(current) if current == key => Self {
                key: Some(key.to_string()),
                direction: match self.direction {
                    SortDirection::Ascending => SortDirection::Descending,
                    SortDirection::Descending => SortDirection::Ascending,
                },
            },
            _ => Self::by(key, SortDirection::Ascending),
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::unsorted()
    }
}
