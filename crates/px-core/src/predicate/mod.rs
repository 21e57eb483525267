//! Predicates: named conjunctions of per-column range clauses

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::record::Record;

mod store;
pub use store::PredicateStore;

/// Identifier of a predicate
pub type PredicateId = String;

/// Reserved id of the synthetic draft predicate; never assigned to a
/// stored predicate
pub const DRAFT_PREDICATE_ID: &str = "draft";

/// An inclusive range constraint on a single feature column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub column: String,
    pub min: f64,
    pub max: f64,
}

impl Clause {
    /// Create a clause, normalizing the bounds so `min <= max`
    pub fn new(column: impl Into<String>, min: f64, max: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            column: column.into(),
            min,
            max,
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Clauses keyed by column name; the key guarantees at most one clause
/// per column
pub type ClauseSet = IndexMap<String, Clause>;

/// How a predicate came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredicateKind {
    /// Promoted from a user-edited draft
    Manual,
    /// Supplied by the recommender service
    Generated,
    /// The synthetic in-progress predicate
    Draft,
}

/// A named conjunction of clauses identifying a subset of records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub id: PredicateId,
    pub kind: PredicateKind,
    pub clauses: ClauseSet,

    /// Display-only score attached by the scorer service; never read by
    /// the reconciliation engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Predicate {
    pub fn new(id: PredicateId, kind: PredicateKind, clauses: ClauseSet) -> Self {
        Self {
            id,
            kind,
            clauses,
            score: None,
        }
    }

    /// Conjunction over all clauses.
    ///
    /// A clause naming a column the record lacks fails that clause
    /// rather than erroring. With zero clauses every record matches.
    pub fn matches(&self, record: &Record) -> bool {
        self.clauses.values().all(|clause| {
            record
                .columns
                .get(&clause.column)
                .map_or(false, |value| clause.contains(*value))
        })
    }

    /// Whether the predicate has no clauses
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use indexmap::IndexMap;

    fn record_with(columns: &[(&str, f64)]) -> Record {
        let columns: IndexMap<String, f64> = columns
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        Record::new(0, 0.0, 0.0, columns)
    }

    fn predicate_with(clauses: &[Clause]) -> Predicate {
        let clauses: ClauseSet = clauses
            .iter()
            .map(|clause| (clause.column.clone(), clause.clone()))
            .collect();
        Predicate::new("p".to_string(), PredicateKind::Manual, clauses)
    }

    #[test]
    fn test_clause_normalizes_bounds() {
        let clause = Clause::new("colA", 10.0, 2.0);
        assert_eq!(clause.min, 2.0);
        assert_eq!(clause.max, 10.0);
    }

    #[test]
    fn test_clause_bounds_inclusive() {
        let clause = Clause::new("colA", 0.0, 10.0);
        assert!(clause.contains(0.0));
        assert!(clause.contains(10.0));
        assert!(!clause.contains(10.000001));
    }

    #[test]
    fn test_matches_is_a_conjunction() {
        let predicate = predicate_with(&[
            Clause::new("a", 0.0, 1.0),
            Clause::new("b", 0.0, 1.0),
        ]);
        assert!(predicate.matches(&record_with(&[("a", 0.5), ("b", 0.5)])));
        assert!(!predicate.matches(&record_with(&[("a", 0.5), ("b", 2.0)])));
    }

    #[test]
    fn test_missing_column_fails_the_clause() {
        let predicate = predicate_with(&[Clause::new("absent", 0.0, 1.0)]);
        assert!(!predicate.matches(&record_with(&[("a", 0.5)])));
    }

    #[test]
    fn test_empty_predicate_matches_everything() {
        let predicate = predicate_with(&[]);
        assert!(predicate.matches(&record_with(&[("a", 123.0)])));
    }
}
