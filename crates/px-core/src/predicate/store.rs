//! Stored predicates, the active selection, and the editable draft

use ahash::AHashMap;
use indexmap::IndexMap;
use tracing::warn;
use uuid::Uuid;

use super::{Clause, ClauseSet, Predicate, PredicateId, PredicateKind, DRAFT_PREDICATE_ID};

/// Saved predicates plus the selection and draft state they share.
///
/// Exactly one of two modes is active at any time: a stored predicate is
/// selected and the draft is empty, or nothing is selected and the draft
/// holds zero or more clauses. Editing while a predicate is selected
/// forks its clauses into the draft instead of mutating the stored
/// predicate.
#[derive(Debug, Default)]
pub struct PredicateStore {
    /// Stored predicates in insertion order, keyed by id
    predicates: IndexMap<PredicateId, Predicate>,

    /// Id of the selected stored predicate, if any
    selected: Option<PredicateId>,

    /// Clauses of the unsaved draft predicate
    draft: ClauseSet,
}

impl PredicateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a draft clause by column, forking the selection first
    pub fn set_draft_clause(&mut self, clause: Clause) {
        self.fork_selection_into_draft();
        self.draft.insert(clause.column.clone(), clause);
    }

    /// Remove the draft clause for `column`; absent columns are a no-op
    pub fn remove_draft_clause(&mut self, column: &str) {
        self.fork_selection_into_draft();
        self.draft.shift_remove(column);
    }

    /// Empty the draft clause set
    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    /// Promote the draft into a stored manual predicate.
    ///
    /// Returns the new id, or `None` when the draft is empty: a
    /// predicate with no clauses is never created this way.
    pub fn add_manual_predicate(&mut self) -> Option<PredicateId> {
        if self.draft.is_empty() {
            return None;
        }
        let id = Uuid::new_v4().to_string();
        let clauses = std::mem::take(&mut self.draft);
        self.predicates.insert(
            id.clone(),
            Predicate::new(id.clone(), PredicateKind::Manual, clauses),
        );
        Some(id)
    }

    /// Bulk-insert recommender candidates.
    ///
    /// Ids are assumed pre-assigned; duplicate ids overwrite the
    /// previous entry. The reserved draft id is discarded.
    pub fn add_generated_predicates(&mut self, predicates: Vec<Predicate>) {
        for mut predicate in predicates {
            if predicate.id == DRAFT_PREDICATE_ID {
                warn!("discarding generated predicate with reserved draft id");
                continue;
            }
            predicate.kind = PredicateKind::Generated;
            self.predicates.insert(predicate.id.clone(), predicate);
        }
    }

    /// Delete a predicate by id; unknown ids are a no-op.
    ///
    /// Removing the selected predicate reverts to drafting with an empty
    /// draft.
    pub fn remove_predicate(&mut self, id: &str) {
        self.predicates.shift_remove(id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
            self.draft.clear();
        }
    }

    /// Select a stored predicate, or pass `None` to return to drafting.
    ///
    /// Selecting clears the draft; deselecting seeds the draft from the
    /// previously selected clauses so editing picks up where the
    /// predicate left off. Re-selecting the current id deselects
    /// (click-to-deselect). Unknown ids are a no-op.
    pub fn select_predicate(&mut self, id: Option<PredicateId>) {
        match id {
            Some(id) if self.selected.as_ref() == Some(&id) => self.deselect(),
            Some(id) => {
                if self.predicates.contains_key(&id) {
                    self.selected = Some(id);
                    self.draft.clear();
                } else {
                    warn!(id = %id, "ignoring selection of unknown predicate");
                }
            }
            None => self.deselect(),
        }
    }

    /// The value the reconciliation engine consumes: the selected stored
    /// predicate, or a synthetic draft predicate when nothing is
    /// selected. Callers never need to know which mode is active.
    pub fn current_predicate(&self) -> Predicate {
        match self.selected.as_ref().and_then(|id| self.predicates.get(id)) {
            Some(predicate) => predicate.clone(),
            None => Predicate::new(
                DRAFT_PREDICATE_ID.to_string(),
                PredicateKind::Draft,
                self.draft.clone(),
            ),
        }
    }

    /// Merge scorer output into stored predicates; unknown ids are ignored
    pub fn attach_scores(&mut self, scores: &AHashMap<PredicateId, f64>) {
        for (id, score) in scores {
            if let Some(predicate) = self.predicates.get_mut(id) {
                predicate.score = Some(*score);
            }
        }
    }

    /// Stored predicates in insertion order
    pub fn all_predicates(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.values()
    }

    pub fn get(&self, id: &str) -> Option<&Predicate> {
        self.predicates.get(id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn draft_clauses(&self) -> &ClauseSet {
        &self.draft
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    fn deselect(&mut self) {
        if let Some(previous) = self.selected.take() {
            if let Some(predicate) = self.predicates.get(&previous) {
                self.draft = predicate.clauses.clone();
            }
        }
    }

    /// Editing a selected predicate forks it into a draft rather than
    /// mutating the stored one
    fn fork_selection_into_draft(&mut self) {
        if self.selected.is_some() {
            self.deselect();
        }
    }
}
