use lazygrid_types::{GridRecord, SortDirection, SortSpec, SortValue};
use std::cmp::Ordering;

/// Produce a re-ordered copy of the loaded rows without touching fetch state.
///
/// With no sort key this is the identity: rows come back in insertion order.
/// The sort is stable, so rows with equal keys keep their relative order and
/// repeated application is idempotent.
pub fn sort_records<R: GridRecord>(records: &[R], spec: &SortSpec) -> Vec<R> {
    let Some(key) = spec.key.as_deref() else {
        return records.to_vec();
    };

    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare_values(&a.sort_value(key), &b.sort_value(key));
        match spec.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    sorted
}

/// Type-independent comparison policy for sort key values.
///
/// Nulls sort after every non-null value (so ascending puts them last and
/// descending, being the exact reverse, puts them first). Two textual values
/// compare case-insensitively with the case-sensitive order as tie-breaker.
/// Everything else coerces to numbers; if either side refuses the coercion,
/// the display forms are compared textually instead.
fn compare_values(a: &SortValue, b: &SortValue) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    if let (SortValue::Text(left), SortValue::Text(right)) = (a, b) {
        return compare_text(left, right);
    }

    match (a.as_number(), b.as_number()) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        _ => compare_text(&a.display(), &b.display()),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
