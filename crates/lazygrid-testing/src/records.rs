use lazygrid_types::{GridRecord, RecordId, SortValue};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Sample record shaped like a typical directory entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub score: Option<f64>,
}

impl SampleRecord {
    pub fn new(id: u64, name: &str, status: &str, score: Option<f64>) -> Self {
        Self {
            id,
            name: name.to_string(),
            status: status.to_string(),
            score,
        }
    }
}

impl GridRecord for SampleRecord {
    fn record_id(&self) -> RecordId {
        RecordId::from(self.id)
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "id" => SortValue::Number(self.id as f64),
            "name" => SortValue::Text(self.name.clone()),
            "status" => SortValue::Text(self.status.clone()),
            "score" => self.score.map(SortValue::Number).unwrap_or(SortValue::Null),
            _ => SortValue::Null,
        }
    }
}

const STATUSES: [&str; 3] = ["active", "pending", "archived"];
const FIRST_NAMES: [&str; 10] = [
    "Avery", "Blake", "Casey", "Drew", "Emery", "Finley", "Gray", "Harper", "Indigo", "Jules",
];
const LAST_NAMES: [&str; 10] = [
    "Alder", "Birch", "Cedar", "Dahl", "Elm", "Fir", "Grove", "Hazel", "Ivy", "Juniper",
];

/// Generate `count` deterministic records starting at id 1
pub fn sample_records(count: usize) -> Vec<SampleRecord> {
    (1..=count as u64)
        .map(|id| {
            let idx = (id - 1) as usize;
            let name = format!(
                "{} {}",
                FIRST_NAMES[idx % FIRST_NAMES.len()],
                LAST_NAMES[(idx / FIRST_NAMES.len()) % LAST_NAMES.len()]
            );
            let score = if id % 7 == 0 {
                None
            } else {
                Some((id % 50) as f64 + (id % 3) as f64 / 10.0)
            };
            SampleRecord::new(id, &name, STATUSES[idx % STATUSES.len()], score)
        })
        .collect()
}

/// Fixed 100-record dataset shared by tests
pub static FIXTURE_RECORDS: Lazy<Vec<SampleRecord>> = Lazy::new(|| sample_records(100));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_is_deterministic() {
        assert_eq!(sample_records(100), *FIXTURE_RECORDS);
    }

    #[test]
    fn identities_are_unique() {
        let records = sample_records(100);
        let mut ids: Vec<_> = records.iter().map(|r| r.record_id()).collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn every_seventh_record_lacks_a_score() {
        let records = sample_records(21);
        assert!(records[6].score.is_none());
        assert!(records[13].score.is_none());
        assert!(records[0].score.is_some());
    }
}
