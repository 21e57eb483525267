//! Shared session state wiring the core components together

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::brush::{brush_interval, brushed_ids, BrushKind, BrushTracker, LinearScale, PixelRect};
use crate::events::{events, EventBus};
use crate::predicate::{Clause, Predicate, PredicateId, PredicateStore};
use crate::reconcile::{Reconciler, SelectionTag};
use crate::record::{IdSet, RecordSet};

/// The long-lived session state.
///
/// All mutations are synchronous; gesture handlers call the methods
/// here and rendering reads the annotated output afterwards. Each
/// mutation publishes a typed event so collaborators can react without
/// polling.
pub struct SessionState {
    /// Saved predicates, the selection, and the draft
    pub predicates: Arc<RwLock<PredicateStore>>,

    /// The two brush-derived id sets
    pub brushes: Arc<RwLock<BrushTracker>>,

    /// The loaded record set, if any
    pub records: Arc<RwLock<Option<Arc<RecordSet>>>>,

    /// The event bus
    pub event_bus: Arc<EventBus>,

    /// Memoized reconciliation output
    reconciler: Arc<RwLock<Reconciler>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            predicates: Arc::new(RwLock::new(PredicateStore::new())),
            brushes: Arc::new(RwLock::new(BrushTracker::new())),
            records: Arc::new(RwLock::new(None)),
            event_bus: Arc::new(EventBus::new()),
            reconciler: Arc::new(RwLock::new(Reconciler::new())),
        }
    }

    /// Install the record set for this session
    pub fn load_records(&self, name: &str, records: Arc<RecordSet>) {
        let row_count = records.len();
        let column_count = records.feature_columns().len();
        *self.records.write() = Some(records);
        self.reconciler.write().invalidate();

        info!(dataset = name, rows = row_count, columns = column_count, "dataset loaded");
        self.event_bus.publish(events::DatasetLoaded {
            name: name.to_string(),
            row_count,
            column_count,
        });
    }

    /// Upsert a draft clause (feature-axis brush or manual range edit)
    pub fn set_draft_clause(&self, clause: Clause) {
        let mut store = self.predicates.write();
        store.set_draft_clause(clause);
        let clause_count = store.draft_clauses().len();
        drop(store);

        self.event_bus.publish(events::DraftChanged { clause_count });
    }

    /// Remove the draft clause for `column` if present
    pub fn remove_draft_clause(&self, column: &str) {
        let mut store = self.predicates.write();
        store.remove_draft_clause(column);
        let clause_count = store.draft_clauses().len();
        drop(store);

        self.event_bus.publish(events::DraftChanged { clause_count });
    }

    /// Apply a 1-D feature-axis brush: a live interval upserts the
    /// column's draft clause, a cleared interval removes it
    pub fn apply_feature_brush(
        &self,
        column: &str,
        interval: Option<(f64, f64)>,
        scale: &LinearScale,
    ) {
        match brush_interval(interval, scale) {
            Some((min, max)) => self.set_draft_clause(Clause::new(column, min, max)),
            None => self.remove_draft_clause(column),
        }
    }

    /// Promote the draft into a stored manual predicate
    pub fn add_manual_predicate(&self) -> Option<PredicateId> {
        let id = self.predicates.write().add_manual_predicate()?;
        self.event_bus.publish(events::PredicateAdded {
            id: id.clone(),
            generated: false,
        });
        Some(id)
    }

    /// Store recommender candidates
    pub fn add_generated_predicates(&self, predicates: Vec<Predicate>) {
        let ids: Vec<PredicateId> = predicates.iter().map(|p| p.id.clone()).collect();
        self.predicates.write().add_generated_predicates(predicates);
        for id in ids {
            self.event_bus.publish(events::PredicateAdded { id, generated: true });
        }
    }

    /// Delete a predicate by id
    pub fn remove_predicate(&self, id: &str) {
        let mut store = self.predicates.write();
        let was_selected = store.selected_id() == Some(id);
        store.remove_predicate(id);
        drop(store);

        self.event_bus.publish(events::PredicateRemoved { id: id.to_string() });
        if was_selected {
            self.event_bus.publish(events::SelectionChanged { selected: None });
        }
    }

    /// Select a stored predicate, or `None` to return to drafting
    pub fn select_predicate(&self, id: Option<PredicateId>) {
        let mut store = self.predicates.write();
        store.select_predicate(id);
        let selected = store.selected_id().map(str::to_string);
        drop(store);

        self.event_bus.publish(events::SelectionChanged { selected });
    }

    /// The selected predicate, or the synthetic draft predicate
    pub fn current_predicate(&self) -> Predicate {
        self.predicates.read().current_predicate()
    }

    /// Merge scorer output into the stored predicates
    pub fn attach_scores(&self, scores: &ahash::AHashMap<PredicateId, f64>) {
        self.predicates.write().attach_scores(scores);
    }

    /// Replace a brush from projection-chart gesture output; an absent
    /// pixel rectangle clears the brush
    pub fn apply_projection_brush(
        &self,
        kind: BrushKind,
        rect: Option<PixelRect>,
        x_scale: &LinearScale,
        y_scale: &LinearScale,
    ) {
        let records = self.records.read().clone();
        let ids = match &records {
            Some(set) => brushed_ids(rect, x_scale, y_scale, set),
            None => None,
        };
        self.set_brush(kind, ids);
    }

    /// Replace a brush with already-mapped ids
    pub fn set_brush(&self, kind: BrushKind, ids: Option<IdSet>) {
        let selected_count = ids.as_ref().map(IdSet::len);
        self.brushes.write().set(kind, ids);

        debug!(?kind, ?selected_count, "brush updated");
        self.event_bus.publish(events::BrushChanged {
            kind,
            selected_count,
        });
    }

    /// Clear a brush (double-click gesture): the selection becomes
    /// inactive, not empty
    pub fn clear_brush(&self, kind: BrushKind) {
        self.set_brush(kind, None);
    }

    /// Recompute (or reuse) the per-record classification for rendering.
    ///
    /// Returns `None` until a dataset is loaded.
    pub fn annotated_tags(&self) -> Option<Arc<Vec<SelectionTag>>> {
        let records = self.records.read().clone()?;
        let predicate = self.predicates.read().current_predicate();
        let brushes = self.brushes.read();
        let tags = self
            .reconciler
            .write()
            .annotate(&records, &predicate, brushes.target());
        Some(tags)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
