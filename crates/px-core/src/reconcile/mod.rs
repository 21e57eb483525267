//! Per-record classification combining predicate and brush membership
//!
//! The engine is a pure function over `(records, predicate, target
//! brush)`; it recomputes in full on every call and a memoizing wrapper
//! skips the work while that input tuple is unchanged.

use std::sync::Arc;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::predicate::Predicate;
use crate::record::{IdSet, RecordId, RecordSet};

/// The mutually exclusive classification assigned to every record.
///
/// Which tags appear depends on the mode: `Unfiltered` when no clauses
/// are active, `InPredicate`/`OutOfPredicate` when only the predicate
/// is, and the four-way partition once the target brush joins it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionTag {
    /// No clauses active; nothing to relate
    Unfiltered,
    /// Satisfies every clause of the active predicate
    InPredicate,
    /// Fails at least one clause of the active predicate
    OutOfPredicate,
    /// In both the predicate subset and the target brush
    Intersection,
    /// In the predicate subset but outside the target brush
    PredicateOnly,
    /// In the target brush but outside the predicate subset
    BrushOnly,
    /// In neither subset
    Neither,
}

/// Classify every record against the active predicate and target brush.
///
/// Pure and total: the output is index-aligned with `records` and each
/// record receives exactly one tag. An absent brush and an active brush
/// enclosing zero points run different modes.
pub fn classify(
    records: &RecordSet,
    predicate: &Predicate,
    target: Option<&IdSet>,
) -> Vec<SelectionTag> {
    // No clauses: pass-through, regardless of brush state
    if predicate.is_empty() {
        return vec![SelectionTag::Unfiltered; records.len()];
    }

    match target {
        None => records
            .records()
            .iter()
            .map(|record| {
                if predicate.matches(record) {
                    SelectionTag::InPredicate
                } else {
                    SelectionTag::OutOfPredicate
                }
            })
            .collect(),
        Some(brushed) => {
            let matched: AHashSet<RecordId> = records
                .records()
                .iter()
                .filter(|record| predicate.matches(record))
                .map(|record| record.id)
                .collect();

            records
                .records()
                .iter()
                .map(
                    |record| match (matched.contains(&record.id), brushed.contains(&record.id)) {
                        (true, true) => SelectionTag::Intersection,
                        (true, false) => SelectionTag::PredicateOnly,
                        (false, true) => SelectionTag::BrushOnly,
                        (false, false) => SelectionTag::Neither,
                    },
                )
                .collect()
        }
    }
}

struct CacheEntry {
    /// Pointer identity of the record set the tags were computed for
    records: usize,
    predicate: Predicate,
    target: Option<IdSet>,
    tags: Arc<Vec<SelectionTag>>,
}

/// Memoizing wrapper around [`classify`].
///
/// Classification reruns on every brush or clause edit against the full
/// record set, so the last result is kept and shared while the input
/// tuple is unchanged.
#[derive(Default)]
pub struct Reconciler {
    cached: Option<CacheEntry>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the classification for the given inputs, reusing the
    /// cached result when nothing changed
    pub fn annotate(
        &mut self,
        records: &Arc<RecordSet>,
        predicate: &Predicate,
        target: Option<&IdSet>,
    ) -> Arc<Vec<SelectionTag>> {
        let identity = Arc::as_ptr(records) as usize;
        if let Some(entry) = &self.cached {
            if entry.records == identity
                && entry.predicate == *predicate
                && entry.target.as_ref() == target
            {
                debug!("reconciliation unchanged, reusing cached tags");
                return Arc::clone(&entry.tags);
            }
        }

        let tags = Arc::new(classify(records, predicate, target));
        debug!(rows = tags.len(), "reconciliation recomputed");
        self.cached = Some(CacheEntry {
            records: identity,
            predicate: predicate.clone(),
            target: target.cloned(),
            tags: Arc::clone(&tags),
        });
        tags
    }

    /// Drop the cached result (e.g. when a dataset is unloaded)
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
