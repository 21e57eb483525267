//! Records and record sets
//!
//! A dataset is loaded once per session as an immutable [`RecordSet`];
//! everything downstream refers to records by id.

use ahash::AHashMap;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier of a record within a loaded dataset
pub type RecordId = u64;

/// Ordered set of record ids with O(1) membership tests.
///
/// Insertion order is record order, so brush selections stay in the
/// order the records appear in the dataset.
pub type IdSet = IndexSet<RecordId, ahash::RandomState>;

/// A single data record: projection coordinates plus named feature values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,

    /// Projection coordinate on the overview scatterplot
    pub x: f64,

    /// Projection coordinate on the overview scatterplot
    pub y: f64,

    /// Feature values keyed by column name
    #[serde(flatten)]
    pub columns: IndexMap<String, f64>,
}

impl Record {
    /// Create a record from its projection coordinates and feature values
    pub fn new(id: RecordId, x: f64, y: f64, columns: IndexMap<String, f64>) -> Self {
        Self { id, x, y, columns }
    }
}

/// Errors raised while assembling a record set
#[derive(Error, Debug)]
pub enum RecordSetError {
    #[error("duplicate record id {0}")]
    DuplicateId(RecordId),
}

/// The immutable record collection loaded once per dataset.
///
/// Ids are unique and stable for the lifetime of the set; uniqueness is
/// enforced at construction rather than on every lookup.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<Record>,
    by_id: AHashMap<RecordId, usize>,
}

impl RecordSet {
    /// Build a record set, rejecting duplicate ids
    pub fn new(records: Vec<Record>) -> Result<Self, RecordSetError> {
        let mut by_id = AHashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if by_id.insert(record.id, index).is_some() {
                return Err(RecordSetError::DuplicateId(record.id));
            }
        }
        Ok(Self { records, by_id })
    }

    /// All records in dataset order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.by_id.get(&id).map(|index| &self.records[*index])
    }

    pub fn contains_id(&self, id: RecordId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Feature column names in first-seen order across the set
    pub fn feature_columns(&self) -> Vec<String> {
        let mut seen: IndexSet<&str> = IndexSet::new();
        for record in &self.records {
            for column in record.columns.keys() {
                seen.insert(column.as_str());
            }
        }
        seen.into_iter().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: RecordId, value: f64) -> Record {
        let mut columns = IndexMap::new();
        columns.insert("colA".to_string(), value);
        Record::new(id, value, -value, columns)
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = RecordSet::new(vec![record(1, 0.0), record(1, 1.0)]);
        assert!(matches!(result, Err(RecordSetError::DuplicateId(1))));
    }

    #[test]
    fn test_lookup_by_id() {
        let set = RecordSet::new(vec![record(3, 0.5), record(7, 1.5)]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(7).map(|r| r.x), Some(1.5));
        assert!(set.get(4).is_none());
        assert!(set.contains_id(3));
    }

    #[test]
    fn test_feature_columns_first_seen_order() {
        let mut first = IndexMap::new();
        first.insert("b".to_string(), 1.0);
        let mut second = IndexMap::new();
        second.insert("a".to_string(), 2.0);
        second.insert("b".to_string(), 3.0);

        let set = RecordSet::new(vec![
            Record::new(0, 0.0, 0.0, first),
            Record::new(1, 0.0, 0.0, second),
        ])
        .unwrap();

        assert_eq!(set.feature_columns(), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_record_flat_json_shape() {
        let json = r#"{"id": 4, "x": 0.1, "y": 0.2, "alcohol": 9.4, "pH": 3.51}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 4);
        assert_eq!(record.columns.get("alcohol"), Some(&9.4));
        assert_eq!(record.columns.get("pH"), Some(&3.51));
    }
}
