//! Bevy plugin for prefab_array providing a world-backed scene host, command
//! messages, an event bus, and preference-backed persistence.
#![forbid(unsafe_code)]

use bevy::prelude::*;
pub use commands::ArrayCommand;
pub use events::{ArrayBus, ArrayEventFilter, ArrayMessage, ChannelSink};
pub use host::{ArrayInstance, ArrayRoot, PrefabRegistry, PrefabTemplate, WorldSceneHost};
use prefab_array::prelude::*;
pub use preferences::{ArrayPreferences, FilePreferences};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod commands;
mod events;
mod host;
mod preferences;

/// Convenient re-exports for common types. Import with `use bevy_prefab_array::prelude::*;`.
pub mod prelude {
    pub use prefab_array::prelude::*;

    pub use crate::commands::ArrayCommand;
    pub use crate::events::{ArrayBus, ArrayEventFilter, ArrayMessage, ChannelSink};
    pub use crate::host::{
        ArrayInstance, ArrayRoot, PrefabRegistry, PrefabTemplate, WorldSceneHost,
    };
    pub use crate::preferences::{ArrayPreferences, FilePreferences};
    pub use crate::{ArrayRng, ArraySets, PrefabArrayConfig, PrefabArrayPlugin};
}

/// Bevy plugin providing resources, message types, and systems for prefab arrays.
///
/// Insert a [`PrefabArrayConfig`] before adding the plugin to override the
/// defaults; its seed is read when the plugin builds.
pub struct PrefabArrayPlugin;

/// Plugin configuration.
#[derive(Resource, Debug, Clone)]
pub struct PrefabArrayConfig {
    /// Preference key the collection is stored under.
    pub preferences_key: String,
    /// Seed for randomized rotation and scale. `None` seeds from the thread-local generator.
    pub seed: Option<u64>,
    /// Persist after every command that changes the collection.
    pub autosave: bool,
}

impl Default for PrefabArrayConfig {
    fn default() -> Self {
        Self {
            preferences_key: DEFAULT_PREFERENCES_KEY.to_owned(),
            seed: None,
            autosave: true,
        }
    }
}

impl PrefabArrayConfig {
    pub fn with_preferences_key(mut self, key: impl Into<String>) -> Self {
        self.preferences_key = key.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }
}

/// The array set collection, with entity handles.
#[derive(Resource, Debug, Default)]
pub struct ArraySets(pub ArrayLibrary<Entity>);

/// Random source for randomized rotation and scale.
#[derive(Resource)]
pub struct ArrayRng(pub StdRng);

impl FromWorld for ArrayRng {
    fn from_world(world: &mut World) -> Self {
        match world
            .get_resource::<PrefabArrayConfig>()
            .and_then(|config| config.seed)
        {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_rng(&mut rand::rng())),
        }
    }
}

impl Plugin for PrefabArrayPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ArrayCommand>()
            .add_message::<ArrayMessage>()
            .init_resource::<PrefabArrayConfig>()
            .init_resource::<PrefabRegistry>()
            .init_resource::<ArraySets>()
            .init_resource::<ArrayRng>()
            .init_resource::<ArrayPreferences>()
            .init_resource::<ArrayEventFilter>()
            .init_resource::<ArrayBus>()
            .add_systems(
                Update,
                (apply_array_commands, drain_array_messages).chain(),
            );

        #[cfg(feature = "ron")]
        app.add_systems(Startup, load_array_sets)
            .add_systems(Last, save_array_sets_on_exit);
    }
}

fn apply_array_commands(world: &mut World) {
    let pending: Vec<ArrayCommand> = world
        .resource_mut::<Messages<ArrayCommand>>()
        .drain()
        .collect();
    if pending.is_empty() {
        return;
    }

    let sink = ChannelSink {
        tx: world.resource::<ArrayBus>().tx.clone(),
        filter: world.resource::<ArrayEventFilter>().clone(),
    };
    let save_requested = pending.iter().any(|c| matches!(c, ArrayCommand::Save));

    let mutated = world.resource_scope(|world, mut sets: Mut<ArraySets>| {
        world.resource_scope(|world, mut rng: Mut<ArrayRng>| {
            let mut host = WorldSceneHost::new(world);
            let mut runner = ArrayRunner::new(&mut host, &mut rng.0).with_sink(sink);
            let mut mutated = false;
            for command in pending {
                mutated |= commands::apply_command(&mut runner, &mut sets.0, command);
            }
            mutated
        })
    });

    let autosave = world.resource::<PrefabArrayConfig>().autosave;
    if save_requested || (mutated && autosave) {
        persist_array_sets(world);
    }
}

fn drain_array_messages(bus: Res<ArrayBus>, mut messages: ResMut<Messages<ArrayMessage>>) {
    while let Ok(message) = bus.rx.try_recv() {
        messages.write(message);
    }
}

/// Entity ids are only meaningful inside the world that spawned them, so
/// restored sets start without a root or children. Regenerate rebuilds them.
#[cfg(feature = "ron")]
fn load_array_sets(
    config: Res<PrefabArrayConfig>,
    prefs: Res<ArrayPreferences>,
    mut sets: ResMut<ArraySets>,
) {
    let stored: ArrayLibrary<Entity> = load_library(prefs.store(), &config.preferences_key);
    let library = ArrayLibrary::from_sets(
        stored
            .iter()
            .map(|set| ArraySet::new(set.settings().clone()))
            .collect(),
    );
    if !library.is_empty() {
        info!(
            "Restored {} array sets from '{}'.",
            library.len(),
            config.preferences_key
        );
    }
    sets.0 = library;
}

#[cfg(feature = "ron")]
fn persist_array_sets(world: &mut World) {
    let key = world.resource::<PrefabArrayConfig>().preferences_key.clone();
    world.resource_scope(|world, mut prefs: Mut<ArrayPreferences>| {
        write_array_sets(&world.resource::<ArraySets>().0, &mut prefs, &key);
    });
}

#[cfg(not(feature = "ron"))]
fn persist_array_sets(_world: &mut World) {
    debug!("Persistence requires the `ron` feature; array sets were not saved.");
}

#[cfg(feature = "ron")]
fn save_array_sets_on_exit(
    mut exits: MessageReader<AppExit>,
    config: Res<PrefabArrayConfig>,
    sets: Res<ArraySets>,
    mut prefs: ResMut<ArrayPreferences>,
) {
    if exits.read().next().is_none() {
        return;
    }
    write_array_sets(&sets.0, &mut prefs, &config.preferences_key);
}

#[cfg(feature = "ron")]
fn write_array_sets(library: &ArrayLibrary<Entity>, prefs: &mut ArrayPreferences, key: &str) {
    match save_library(library, prefs.store_mut(), key) {
        Ok(()) => debug!("Persisted {} array sets under '{}'.", library.len(), key),
        Err(err) => error!("Failed to persist array sets under '{}': {}", key, err),
    }
}
