//! Event types and sinks for observing array set lifecycle operations.
//!
//! This module defines [`ArrayEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while [`crate::lifecycle::ArrayRunner`] creates,
//! regenerates, and deletes array sets.

/// Describes events emitted by lifecycle operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayEvent {
    /// Emitted when a new set was created and populated.
    SetCreated {
        /// Index of the set in the library.
        index: usize,
        /// Set name.
        name: String,
        /// Number of instances spawned.
        spawned: usize,
    },

    /// Emitted when an existing set was regenerated in place.
    SetUpdated {
        /// Index of the set in the library.
        index: usize,
        /// Set name.
        name: String,
        /// Number of instances spawned.
        spawned: usize,
    },

    /// Emitted after a set's recorded instances were torn down.
    ChildrenCleared {
        /// Set name.
        name: String,
        /// Instances that were live and got destroyed.
        destroyed: usize,
        /// Recorded instances that were already gone.
        stale: usize,
    },

    /// Emitted when a set and its root were removed.
    SetDeleted {
        /// Index the set occupied before removal.
        index: usize,
        /// Set name.
        name: String,
    },

    /// An operation was skipped without doing anything.
    Skipped {
        /// Context string (e.g. set name or index).
        context: String,
        /// Human-readable reason.
        reason: String,
    },

    /// Non-fatal warning raised during an operation.
    Warning {
        /// Context string (e.g. set name or index).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

impl ArrayEvent {
    pub fn kind(&self) -> ArrayEventKind {
        match self {
            ArrayEvent::SetCreated { .. } => ArrayEventKind::SetCreated,
            ArrayEvent::SetUpdated { .. } => ArrayEventKind::SetUpdated,
            ArrayEvent::ChildrenCleared { .. } => ArrayEventKind::ChildrenCleared,
            ArrayEvent::SetDeleted { .. } => ArrayEventKind::SetDeleted,
            ArrayEvent::Skipped { .. } => ArrayEventKind::Skipped,
            ArrayEvent::Warning { .. } => ArrayEventKind::Warning,
        }
    }
}

/// Discriminant of [`ArrayEvent`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayEventKind {
    SetCreated,
    SetUpdated,
    ChildrenCleared,
    SetDeleted,
    Skipped,
    Warning,
}

/// A generic event sink that accepts [`ArrayEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: ArrayEvent);

    /// Whether the sink cares about events of `kind`. Emitters skip building
    /// events nobody wants.
    #[inline]
    fn wants(&self, _kind: ArrayEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = ArrayEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: ArrayEvent) {}

    #[inline]
    fn wants(&self, _kind: ArrayEventKind) -> bool {
        false
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn send(&mut self, event: ArrayEvent) {
        (**self).send(event);
    }

    #[inline]
    fn wants(&self, kind: ArrayEventKind) -> bool {
        (**self).wants(kind)
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(ArrayEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(ArrayEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(ArrayEvent),
{
    #[inline]
    fn send(&mut self, event: ArrayEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<ArrayEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<ArrayEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[ArrayEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: ArrayEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: ArrayEvent) {
        self.events.push(event);
    }
}
