use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bevy::prelude::*;
use prefab_array::prelude::{MemoryPreferences, PreferenceStore};

/// Preference store the plugin persists the array set collection into.
///
/// Defaults to an in-memory store. Insert one wrapping [`FilePreferences`] to
/// keep sets across sessions.
#[derive(Resource)]
pub struct ArrayPreferences(pub Box<dyn PreferenceStore + Send + Sync>);

impl ArrayPreferences {
    pub fn new(store: impl PreferenceStore + Send + Sync + 'static) -> Self {
        Self(Box::new(store))
    }

    pub fn store(&self) -> &(dyn PreferenceStore + Send + Sync) {
        self.0.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut (dyn PreferenceStore + Send + Sync) {
        self.0.as_mut()
    }
}

impl Default for ArrayPreferences {
    fn default() -> Self {
        Self::new(MemoryPreferences::new())
    }
}

/// [`PreferenceStore`] writing one `<key>.ron` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    dir: PathBuf,
}

impl FilePreferences {
    /// Use `dir` as the store, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating preferences directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9._-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file}.ron"))
    }
}

impl PreferenceStore for FilePreferences {
    fn get_string(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!("Failed to read preferences file {}: {}", path.display(), err);
                None
            }
        }
    }

    fn set_string(&mut self, key: &str, value: String) -> prefab_array::error::Result<()> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> prefab_array::error::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}
