//! Interfaces to the external dataset and predicate services
//!
//! The core only consumes the *results* of these collaborators; the
//! network client behind them lives elsewhere. Responses may arrive
//! after the state that triggered the request has changed, so callers
//! are responsible for discarding stale ones.

use std::sync::Arc;

use ahash::AHashMap;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::predicate::{Clause, ClauseSet, Predicate, PredicateId, PredicateKind};
use crate::record::{IdSet, RecordSet};

/// Which dataset and projection a provider call refers to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRequest {
    pub dataset: String,

    /// Name of the projection algorithm that produced the x/y coordinates
    pub projection_algorithm: String,
}

impl DatasetRequest {
    pub fn new(dataset: impl Into<String>, projection_algorithm: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            projection_algorithm: projection_algorithm.into(),
        }
    }
}

/// Supplies the immutable record array once per session
#[async_trait]
pub trait DatasetProvider: Send + Sync {
    async fn load_records(&self, request: &DatasetRequest) -> anyhow::Result<Arc<RecordSet>>;

    /// The source name or path for display and logging
    fn source_name(&self) -> &str;
}

/// Produces candidate predicates explaining the target subset relative
/// to the comparison subset
#[async_trait]
pub trait PredicateRecommender: Send + Sync {
    async fn recommend(
        &self,
        request: &DatasetRequest,
        target: &IdSet,
        comparison: Option<&IdSet>,
    ) -> anyhow::Result<Vec<Predicate>>;
}

/// Scores predicates against the brushed subsets; scores are display
/// metadata only
#[async_trait]
pub trait PredicateScorer: Send + Sync {
    async fn score(
        &self,
        request: &DatasetRequest,
        target: &IdSet,
        comparison: Option<&IdSet>,
        predicates: &[Predicate],
    ) -> anyhow::Result<AHashMap<PredicateId, f64>>;
}

/// Wire shape of one recommender candidate: clauses are bare ranges
/// keyed by column
#[derive(Debug, Deserialize)]
struct WirePredicate {
    id: PredicateId,
    #[serde(default)]
    score: Option<f64>,
    clauses: IndexMap<String, WireRange>,
}

#[derive(Debug, Deserialize)]
struct WireRange {
    min: f64,
    max: f64,
}

/// Decode a recommender JSON payload into generated predicates
pub fn parse_generated_predicates(payload: &str) -> anyhow::Result<Vec<Predicate>> {
    let wire: Vec<WirePredicate> = serde_json::from_str(payload)?;
    Ok(wire
        .into_iter()
        .map(|candidate| {
            let clauses: ClauseSet = candidate
                .clauses
                .into_iter()
                .map(|(column, range)| {
                    let clause = Clause::new(column, range.min, range.max);
                    (clause.column.clone(), clause)
                })
                .collect();
            let mut predicate =
                Predicate::new(candidate.id, PredicateKind::Generated, clauses);
            predicate.score = candidate.score;
            predicate
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recommender_payload() {
        let payload = r#"[
            {"id": "c1", "clauses": {"alcohol": {"min": 9.0, "max": 11.2}}, "score": 0.71},
            {"id": "c2", "clauses": {"pH": {"min": 3.6, "max": 3.2}}}
        ]"#;

        let predicates = parse_generated_predicates(payload).unwrap();
        assert_eq!(predicates.len(), 2);

        assert_eq!(predicates[0].kind, PredicateKind::Generated);
        assert_eq!(predicates[0].score, Some(0.71));
        assert_eq!(predicates[0].clauses["alcohol"].max, 11.2);

        // Inverted wire bounds are normalized on decode
        assert_eq!(predicates[1].score, None);
        assert_eq!(predicates[1].clauses["pH"].min, 3.2);
        assert_eq!(predicates[1].clauses["pH"].max, 3.6);
    }

    #[test]
    fn test_parse_rejects_malformed_payload() {
        assert!(parse_generated_predicates("not json").is_err());
        assert!(parse_generated_predicates(r#"[{"id": "c1"}]"#).is_err());
    }
}
