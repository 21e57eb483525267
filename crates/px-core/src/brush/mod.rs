//! Brush selections and pixel-to-data mapping

mod mapper;
pub use mapper::{brush_interval, brushed_ids, LinearScale, PixelRect};

use crate::record::IdSet;

/// Which of the two tracked brush selections an update refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushKind {
    /// The primary selection being explained
    Target,
    /// The reference selection used for contrast
    Comparison,
}

/// The two independently brushed record-id sets.
///
/// `None` means the brush is inactive, which is distinct from an active
/// brush enclosing zero points (`Some` of an empty set); the
/// reconciliation engine picks its mode by that difference, so the two
/// must never be coerced into each other.
#[derive(Debug, Clone, Default)]
pub struct BrushTracker {
    target: Option<IdSet>,
    comparison: Option<IdSet>,
}

impl BrushTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a brush selection; `None` marks the brush inactive
    pub fn set(&mut self, kind: BrushKind, ids: Option<IdSet>) {
        match kind {
            BrushKind::Target => self.target = ids,
            BrushKind::Comparison => self.comparison = ids,
        }
    }

    /// Clear a brush (double-click gesture): the selection becomes
    /// inactive, not empty
    pub fn clear(&mut self, kind: BrushKind) {
        self.set(kind, None);
    }

    pub fn target(&self) -> Option<&IdSet> {
        self.target.as_ref()
    }

    pub fn comparison(&self) -> Option<&IdSet> {
        self.comparison.as_ref()
    }
}
