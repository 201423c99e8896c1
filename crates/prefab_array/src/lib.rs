#![forbid(unsafe_code)]
//! prefab_array: grid and circle prefab arrays for scene editors.
//!
//! Modules:
//! - layout: deterministic placement generation for grid and circle layouts
//! - compose: per-instance transform compositing (offsets, multipliers, randomization)
//! - set: array set data model and the library of sets
//! - scene: host scene contract and an in-memory scene
//! - lifecycle: create, regenerate, and delete sets without leaking objects
//! - events: lifecycle events and sinks
//! - persist: snapshots and preference-store persistence
pub mod compose;
pub mod error;
pub mod events;
pub mod layout;
pub mod lifecycle;
pub mod persist;
pub mod scene;
pub mod set;

/// Convenient re-exports for common types. Import with `use prefab_array::prelude::*;`.
pub mod prelude {
    pub use crate::compose::{
        compose_instance, euler_degrees_to_quat, InstanceTransform, Modifiers, RandomSource,
        RANDOM_ROTATION_RANGE, RANDOM_SCALE_RANGE,
    };
    pub use crate::error::{Error, Result};
    pub use crate::events::{ArrayEvent, ArrayEventKind, EventSink, FnSink, VecSink};
    pub use crate::layout::{
        generate_placements, CircleLayout, GridLayout, Layout, Placement, PlacementPattern,
    };
    pub use crate::lifecycle::{ArrayRunner, ClearReport};
    #[cfg(feature = "ron")]
    pub use crate::persist::{decode_snapshot, encode_snapshot, load_library, save_library};
    pub use crate::persist::{
        LibrarySnapshot, MemoryPreferences, PreferenceStore, DEFAULT_PREFERENCES_KEY,
    };
    pub use crate::scene::{MemoryScene, ObjectId, SceneHost, SceneObject};
    pub use crate::set::{ArrayLibrary, ArraySet, ArraySettings, PrefabId};
}
