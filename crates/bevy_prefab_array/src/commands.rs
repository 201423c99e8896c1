use bevy::prelude::*;
use prefab_array::prelude::{
    ArrayLibrary, ArrayRunner, ArraySettings, EventSink, RandomSource, SceneHost,
};

/// Editor-facing operations on the array set collection.
///
/// Written as Bevy messages and applied in order by the plugin's exclusive
/// system, which owns the [`crate::ArraySets`] library during application.
#[derive(Message, Debug, Clone)]
pub enum ArrayCommand {
    /// Create a set from the given settings, spawn it, and select it.
    Create(ArraySettings),
    /// Select an existing set for editing.
    Select(usize),
    /// Replace a set's settings and regenerate it in place.
    Update {
        index: usize,
        settings: ArraySettings,
    },
    /// Regenerate a set from its stored settings.
    Regenerate(usize),
    /// Destroy a set and remove it from the collection.
    Delete(usize),
    /// Destroy every set.
    DeleteAll,
    /// Persist the collection now, regardless of autosave.
    Save,
}

/// Apply one command. Returns `true` if the library changed.
pub(crate) fn apply_command<S, R, K>(
    runner: &mut ArrayRunner<'_, S, R, K>,
    library: &mut ArrayLibrary<S::Handle>,
    command: ArrayCommand,
) -> bool
where
    S: SceneHost,
    R: RandomSource + ?Sized,
    K: EventSink,
{
    match command {
        ArrayCommand::Create(settings) => match runner.create(library, settings) {
            Some(index) => {
                library.select(index);
                true
            }
            None => false,
        },
        ArrayCommand::Select(index) => {
            if !library.select(index) {
                warn!("No array set at index {} to select.", index);
            }
            false
        }
        ArrayCommand::Update { index, settings } => runner.update(library, index, settings),
        ArrayCommand::Regenerate(index) => runner.regenerate(library, index),
        ArrayCommand::Delete(index) => runner.delete(library, index),
        ArrayCommand::DeleteAll => runner.delete_all(library) > 0,
        ArrayCommand::Save => false,
    }
}
