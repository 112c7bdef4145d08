use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-defined record identity, unique within a loaded set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create a new RecordId from a string or numeric source
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Scalar value a record exposes for a sort key.
///
/// This is the coercion surface for the comparator: a record with a missing
/// field reports `Null` rather than failing.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Null,
    Number(f64),
    Text(String),
    Flag(bool),
}

impl SortValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SortValue::Null)
    }

    /// Numeric coercion used for cross-type comparisons.
    /// `Flag` maps to 0/1, numeric-looking text parses, `Null` never coerces.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SortValue::Null => None,
            SortValue::Number(n) => Some(*n),
            SortValue::Text(s) => s.trim().parse::<f64>().ok(),
            SortValue::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
        }
    }

    /// Display form used by the default cell renderer and the textual
    /// comparison fallback. `Null` renders empty.
    pub fn display(&self) -> String {
        match self {
            SortValue::Null => String::new(),
            SortValue::Number(n) => n.to_string(),
            SortValue::Text(s) => s.clone(),
            SortValue::Flag(b) => b.to_string(),
        }
    }
}

impl From<&serde_json::Value> for SortValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => SortValue::Null,
            serde_json::Value::Bool(b) => SortValue::Flag(*b),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(SortValue::Number)
                .unwrap_or(SortValue::Null),
            serde_json::Value::String(s) => SortValue::Text(s.clone()),
            other => SortValue::Text(other.to_string()),
        }
    }
}

/// An opaque grid row.
///
/// The grid never inspects record contents beyond this trait: identity for
/// deduplication, and per-key scalar values for sorting and default cell
/// rendering.
pub trait GridRecord: Clone + Send + Sync + 'static {
    /// Stable identity, unique within a loaded set
    fn record_id(&self) -> RecordId;

    /// Scalar value for a sort key; `SortValue::Null` for unknown keys
    fn sort_value(&self, key: &str) -> SortValue;
}

/// One fetched page of records, as requested from the data source
#[derive(Debug, Clone)]
pub struct Page<R> {
    /// 1-based page index
    pub index: u32,
    /// Page size that was requested (not necessarily `records.len()`)
    pub size: usize,
    pub records: Vec<R>,
}

impl<R> Page<R> {
    pub fn new(index: u32, size: usize, records: Vec<R>) -> Self {
        Self {
            index,
            size,
            records,
        }
    }

    /// A short page signals the end of the result set
    pub fn is_full(&self) -> bool {
        self.records.len() == self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_from_numeric_and_text_sources() {
        assert_eq!(RecordId::from(42u64).as_str(), "42");
        assert_eq!(RecordId::from(-7i64).as_str(), "-7");
        assert_eq!(RecordId::from("abc").as_str(), "abc");
    }

    #[test]
    fn sort_value_numeric_coercion() {
        assert_eq!(SortValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(SortValue::Text(" 17 ".to_string()).as_number(), Some(17.0));
        assert_eq!(SortValue::Text("abc".to_string()).as_number(), None);
        assert_eq!(SortValue::Flag(true).as_number(), Some(1.0));
        assert_eq!(SortValue::Flag(false).as_number(), Some(0.0));
        assert_eq!(SortValue::Null.as_number(), None);
    }

    #[test]
    fn sort_value_display_forms() {
        assert_eq!(SortValue::Null.display(), "");
        assert_eq!(SortValue::Number(42.0).display(), "42");
        assert_eq!(SortValue::Number(1.5).display(), "1.5");
        assert_eq!(SortValue::Text("x".into()).display(), "x");
        assert_eq!(SortValue::Flag(true).display(), "true");
    }

    #[test]
    fn page_fullness() {
        let full: Page<u32> = Page::new(1, 3, vec![1, 2, 3]);
        let short: Page<u32> = Page::new(2, 3, vec![4]);
        assert!(full.is_full());
        assert!(!short.is_full());
    }
}
