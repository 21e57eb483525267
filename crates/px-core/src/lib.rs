//! Core predicate/selection reconciliation for the explorer
//!
//! This crate provides the state containers and pure logic that relate
//! predicate-defined subsets to brush-defined subsets of a projected
//! dataset: clauses and predicates, the draft/selection state machine,
//! the two brush id-sets, the pixel-to-data brush mapping, and the
//! per-record classification the charts render from.

pub mod brush;
pub mod events;
pub mod predicate;
pub mod reconcile;
pub mod record;
pub mod services;
pub mod state;

// Re-export commonly used types
pub use brush::{
    brush_interval, brushed_ids, BrushKind, BrushTracker, LinearScale, PixelRect,
};
pub use predicate::{
    Clause, ClauseSet, Predicate, PredicateId, PredicateKind, PredicateStore,
    DRAFT_PREDICATE_ID,
};
pub use reconcile::{classify, Reconciler, SelectionTag};
pub use record::{IdSet, Record, RecordId, RecordSet, RecordSetError};
pub use services::{
    parse_generated_predicates, DatasetProvider, DatasetRequest, PredicateRecommender,
    PredicateScorer,
};
pub use state::SessionState;
