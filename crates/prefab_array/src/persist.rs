//! Persistence of the array set collection.
//!
//! The core never reaches into global editor state. Callers take a
//! [`LibrarySnapshot`] of an [`ArrayLibrary`] and hand it to a
//! [`PreferenceStore`], a string-keyed store such as editor preferences. With
//! the `ron` feature enabled, [`save_library`] and [`load_library`] do both
//! steps using RON text.
use std::collections::HashMap;

use crate::error::Result;
use crate::set::{ArrayLibrary, ArraySet};

/// Key the array set collection is stored under by default.
pub const DEFAULT_PREFERENCES_KEY: &str = "prefab_array.sets";

/// Serializable copy of every array set in a library, in order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LibrarySnapshot<H> {
    pub sets: Vec<ArraySet<H>>,
}

impl<H> Default for LibrarySnapshot<H> {
    fn default() -> Self {
        Self { sets: Vec::new() }
    }
}

impl<H: Copy> LibrarySnapshot<H> {
    pub fn into_library(self) -> ArrayLibrary<H> {
        ArrayLibrary::from_sets(self.sets)
    }
}

impl<H: Copy> ArrayLibrary<H> {
    /// Snapshot of every set. Selection state is not part of the snapshot.
    pub fn snapshot(&self) -> LibrarySnapshot<H> {
        LibrarySnapshot {
            sets: self.sets().to_vec(),
        }
    }
}

/// String-keyed persistent store.
pub trait PreferenceStore {
    fn get_string(&self, key: &str) -> Option<String>;

    fn set_string(&mut self, key: &str, value: String) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// [`PreferenceStore`] backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(feature = "ron")]
pub use ron_codec::{decode_snapshot, encode_snapshot, load_library, save_library};

#[cfg(feature = "ron")]
mod ron_codec {
    use serde::de::DeserializeOwned;
    use serde::Serialize;
    use tracing::{debug, warn};

    use super::{LibrarySnapshot, PreferenceStore};
    use crate::error::{Error, Result};
    use crate::set::ArrayLibrary;

    /// Encode a snapshot as pretty-printed RON.
    pub fn encode_snapshot<H: Serialize>(snapshot: &LibrarySnapshot<H>) -> Result<String> {
        ron::ser::to_string_pretty(snapshot, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Serialize(e.to_string()))
    }

    pub fn decode_snapshot<H: DeserializeOwned>(text: &str) -> Result<LibrarySnapshot<H>> {
        ron::from_str(text).map_err(|e| Error::Deserialize(e.to_string()))
    }

    /// Write `library` under `key`. An empty library removes the key entirely.
    pub fn save_library<H, P>(library: &ArrayLibrary<H>, store: &mut P, key: &str) -> Result<()>
    where
        H: Serialize + Copy,
        P: PreferenceStore + ?Sized,
    {
        if library.is_empty() {
            debug!("No array sets to persist; removing '{}'.", key);
            return store.remove(key);
        }
        let text = encode_snapshot(&library.snapshot())?;
        store.set_string(key, text)
    }

    /// Read the library stored under `key`.
    ///
    /// A missing key yields an empty library. Malformed data is logged and
    /// also yields an empty library.
    pub fn load_library<H, P>(store: &P, key: &str) -> ArrayLibrary<H>
    where
        H: DeserializeOwned + Copy,
        P: PreferenceStore + ?Sized,
    {
        let Some(text) = store.get_string(key) else {
            return ArrayLibrary::new();
        };
        match decode_snapshot(&text) {
            Ok(snapshot) => snapshot.into_library(),
            Err(err) => {
                warn!("Discarding persisted array sets under '{}': {}.", key, err);
                ArrayLibrary::new()
            }
        }
    }
}
