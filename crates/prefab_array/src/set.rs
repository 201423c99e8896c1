//! Array set data model: generation settings, spawned-object bookkeeping, and
//! the ordered library of sets an editor session works with.
use std::fmt;

use glam::Vec3;

use crate::compose::Modifiers;
use crate::error::{Error, Result};
use crate::layout::{CircleLayout, GridLayout, Layout};

/// Identity of a prefab (reference asset), resolved by the scene host.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct PrefabId(String);

impl PrefabId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrefabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrefabId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for PrefabId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Everything the user edits about an array set.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArraySettings {
    /// Display label; also the name given to the spawned root.
    pub name: String,
    /// Layout mode and its parameters.
    pub layout: Layout,
    /// Per-instance transform modifiers.
    pub modifiers: Modifiers,
    /// Prefab to instantiate. Generation is a no-op without one.
    pub prefab: Option<PrefabId>,
}

impl Default for ArraySettings {
    fn default() -> Self {
        Self {
            name: "Prefab Array".to_owned(),
            layout: Layout::default(),
            modifiers: Modifiers::default(),
            prefab: None,
        }
    }
}

impl ArraySettings {
    /// Creates settings with the given name and layout, default modifiers and no prefab.
    pub fn new(name: impl Into<String>, layout: impl Into<Layout>) -> Self {
        Self {
            name: name.into(),
            layout: layout.into(),
            ..Default::default()
        }
    }

    /// Shorthand for a grid array.
    pub fn grid(name: impl Into<String>, rows: i32, columns: i32, layers: i32, spacing: f32) -> Self {
        Self::new(name, GridLayout::new(rows, columns, layers, spacing))
    }

    /// Shorthand for a circle array.
    pub fn circle(name: impl Into<String>, count: i32, radius: f32) -> Self {
        Self::new(name, CircleLayout::new(count, radius))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_layout(mut self, layout: impl Into<Layout>) -> Self {
        self.layout = layout.into();
        self
    }

    pub fn with_prefab(mut self, prefab: impl Into<PrefabId>) -> Self {
        self.prefab = Some(prefab.into());
        self
    }

    pub fn without_prefab(mut self) -> Self {
        self.prefab = None;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_position_offset(mut self, offset: Vec3) -> Self {
        self.modifiers.position_offset = offset;
        self
    }

    pub fn with_rotation_offset(mut self, degrees: Vec3) -> Self {
        self.modifiers.rotation_offset = degrees;
        self
    }

    pub fn with_scale_multiplier(mut self, multiplier: Vec3) -> Self {
        self.modifiers.scale_multiplier = multiplier;
        self
    }

    pub fn with_random_rotation(mut self, enabled: bool) -> Self {
        self.modifiers.randomize_rotation = enabled;
        self
    }

    pub fn with_random_scale(mut self, enabled: bool) -> Self {
        self.modifiers.randomize_scale = enabled;
        self
    }

    /// Validates the settings, returning an error if invalid.
    ///
    /// Only non-finite geometry and modifiers are rejected. Any name, blank
    /// included, is accepted.
    pub fn validate(&self) -> Result<()> {
        match self.layout {
            Layout::Grid(grid) if !grid.spacing.is_finite() => {
                return Err(Error::InvalidConfig("grid spacing must be finite".into()));
            }
            Layout::Circle(circle) if !circle.radius.is_finite() => {
                return Err(Error::InvalidConfig("circle radius must be finite".into()));
            }
            _ => {}
        }
        let m = &self.modifiers;
        if !m.position_offset.is_finite() {
            return Err(Error::InvalidConfig("position_offset must be finite".into()));
        }
        if !m.rotation_offset.is_finite() {
            return Err(Error::InvalidConfig("rotation_offset must be finite".into()));
        }
        if !m.scale_multiplier.is_finite() {
            return Err(Error::InvalidConfig("scale_multiplier must be finite".into()));
        }

        Ok(())
    }
}

/// One configured pattern and the objects it currently owns in the scene.
///
/// `children` is cleanup bookkeeping only. Positions are always recomputed from
/// the settings, never read back from live objects.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArraySet<H> {
    settings: ArraySettings,
    root: Option<H>,
    children: Vec<H>,
}

impl<H: Copy> ArraySet<H> {
    /// An uninstantiated set.
    pub fn new(settings: ArraySettings) -> Self {
        Self {
            settings,
            root: None,
            children: Vec::new(),
        }
    }

    /// Rebuild a set from previously recorded objects.
    pub fn from_parts(settings: ArraySettings, root: Option<H>, children: Vec<H>) -> Self {
        Self {
            settings,
            root,
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn settings(&self) -> &ArraySettings {
        &self.settings
    }

    /// Container object parenting every instance, if one was created.
    pub fn root(&self) -> Option<H> {
        self.root
    }

    /// Recorded instances, in spawn order.
    pub fn children(&self) -> &[H] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn set_settings(&mut self, settings: ArraySettings) {
        self.settings = settings;
    }

    pub(crate) fn set_root(&mut self, root: Option<H>) {
        self.root = root;
    }

    pub(crate) fn record_child(&mut self, child: H) {
        self.children.push(child);
    }

    pub(crate) fn take_children(&mut self) -> Vec<H> {
        std::mem::take(&mut self.children)
    }
}

/// Ordered collection of array sets plus the set selected for editing.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLibrary<H> {
    sets: Vec<ArraySet<H>>,
    selected: Option<usize>,
}

impl<H> Default for ArrayLibrary<H> {
    fn default() -> Self {
        Self {
            sets: Vec::new(),
            selected: None,
        }
    }
}

impl<H: Copy> ArrayLibrary<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a library from existing sets with nothing selected.
    pub fn from_sets(sets: Vec<ArraySet<H>>) -> Self {
        Self {
            sets,
            selected: None,
        }
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ArraySet<H>> {
        self.sets.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut ArraySet<H>> {
        self.sets.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArraySet<H>> {
        self.sets.iter()
    }

    pub fn sets(&self) -> &[ArraySet<H>] {
        &self.sets
    }

    /// Index of the first set named `name`.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.sets.iter().position(|s| s.name() == name)
    }

    /// Select the set at `index` for editing. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.sets.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_set(&self) -> Option<&ArraySet<H>> {
        self.selected.and_then(|i| self.sets.get(i))
    }

    pub(crate) fn push(&mut self, set: ArraySet<H>) -> usize {
        self.sets.push(set);
        self.sets.len() - 1
    }

    /// Remove the set at `index`, keeping the selection pointed at the same set.
    pub(crate) fn remove(&mut self, index: usize) -> Option<ArraySet<H>> {
        if index >= self.sets.len() {
            return None;
        }
        let removed = self.sets.remove(index);
        self.selected = match self.selected {
            Some(sel) if sel == index => None,
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };
        Some(removed)
    }
}

impl<'a, H> IntoIterator for &'a ArrayLibrary<H> {
    type Item = &'a ArraySet<H>;
    type IntoIter = std::slice::Iter<'a, ArraySet<H>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter()
    }
}
