use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use prefab_array::prelude::{ArrayEvent, ArrayEventKind, EventSink};

/// Bevy message wrapping an [`ArrayEvent`] raised while applying an [`crate::ArrayCommand`].
#[derive(Message, Debug, Clone)]
pub struct ArrayMessage {
    pub event: ArrayEvent,
}

/// Channel carrying lifecycle events out of the exclusive command system.
#[derive(Resource)]
pub struct ArrayBus {
    pub tx: Sender<ArrayMessage>,
    pub rx: Receiver<ArrayMessage>,
}

impl Default for ArrayBus {
    fn default() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }
}

/// Event kinds forwarded to the bus. All kinds pass by default.
#[derive(Resource, Debug, Clone)]
pub struct ArrayEventFilter {
    pub created: bool,
    pub updated: bool,
    pub cleared: bool,
    pub deleted: bool,
    pub skipped: bool,
    pub warnings: bool,
}

impl Default for ArrayEventFilter {
    fn default() -> Self {
        Self {
            created: true,
            updated: true,
            cleared: true,
            deleted: true,
            skipped: true,
            warnings: true,
        }
    }
}

impl ArrayEventFilter {
    /// Only warnings and skipped generations.
    pub fn problems_only() -> Self {
        Self {
            created: false,
            updated: false,
            cleared: false,
            deleted: false,
            skipped: true,
            warnings: true,
        }
    }

    pub fn allows(&self, kind: ArrayEventKind) -> bool {
        match kind {
            ArrayEventKind::SetCreated => self.created,
            ArrayEventKind::SetUpdated => self.updated,
            ArrayEventKind::ChildrenCleared => self.cleared,
            ArrayEventKind::SetDeleted => self.deleted,
            ArrayEventKind::Skipped => self.skipped,
            ArrayEventKind::Warning => self.warnings,
        }
    }
}

/// Event sink that forwards events to the [`ArrayBus`].
pub struct ChannelSink {
    pub tx: Sender<ArrayMessage>,
    pub filter: ArrayEventFilter,
}

impl EventSink for ChannelSink {
    #[inline]
    fn wants(&self, kind: ArrayEventKind) -> bool {
        self.filter.allows(kind)
    }

    #[inline]
    fn send(&mut self, event: ArrayEvent) {
        let _ = self.tx.send(ArrayMessage { event });
    }
}
