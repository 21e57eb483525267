//! Typed event bus connecting state mutations to rendering collaborators

use std::any::{Any, TypeId};
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;

/// Event trait that all published types implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

/// Handler trait for subscribers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// System-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<TypeId, Vec<Box<dyn EventHandler>>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Publish an event to its subscribers
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

/// Domain events published by the session state
pub mod events {
    use super::Event;
    use crate::brush::BrushKind;

    /// A dataset finished loading
    #[derive(Debug, Clone)]
    pub struct DatasetLoaded {
        pub name: String,
        pub row_count: usize,
        pub column_count: usize,
    }

    /// The draft clause set changed
    #[derive(Debug, Clone)]
    pub struct DraftChanged {
        pub clause_count: usize,
    }

    /// A predicate entered the store
    #[derive(Debug, Clone)]
    pub struct PredicateAdded {
        pub id: String,
        pub generated: bool,
    }

    /// A predicate left the store
    #[derive(Debug, Clone)]
    pub struct PredicateRemoved {
        pub id: String,
    }

    /// The selected predicate changed; `None` means back to drafting
    #[derive(Debug, Clone)]
    pub struct SelectionChanged {
        pub selected: Option<String>,
    }

    /// A brush selection was replaced or cleared
    #[derive(Debug, Clone)]
    pub struct BrushChanged {
        pub kind: BrushKind,
        /// Number of enclosed records, or `None` when the brush cleared
        pub selected_count: Option<usize>,
    }

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        DatasetLoaded,
        DraftChanged,
        PredicateAdded,
        PredicateRemoved,
        SelectionChanged,
        BrushChanged
    );
}
