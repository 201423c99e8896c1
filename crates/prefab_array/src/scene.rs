//! Host scene contract and an in-memory scene implementation.
//!
//! The lifecycle controller only needs to create a root, instantiate a prefab
//! under it, write local transforms, and destroy objects. [`SceneHost`] captures
//! exactly that. Engine bindings implement it over their own object model;
//! [`MemoryScene`] is a self-contained host used by tests and tools.
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use glam::Vec3;

use crate::compose::InstanceTransform;
use crate::set::PrefabId;

/// Minimal scene-graph operations the lifecycle controller depends on.
pub trait SceneHost {
    /// Opaque handle to a live (or formerly live) scene object.
    type Handle: Copy + Eq + fmt::Debug;

    /// Create an empty container object named `name` at the identity transform.
    fn create_root(&mut self, name: &str) -> Self::Handle;

    /// Local scale of the prefab template, or `None` if the prefab is unknown.
    fn prefab_scale(&self, prefab: &PrefabId) -> Option<Vec3>;

    /// Instantiate `prefab` as a child of `parent`.
    ///
    /// Returns `None` when the prefab cannot be resolved or `parent` is gone.
    fn instantiate(&mut self, prefab: &PrefabId, parent: Self::Handle) -> Option<Self::Handle>;

    /// Overwrite the local transform of `object`. Ignored for dead objects.
    fn set_local_transform(&mut self, object: Self::Handle, transform: InstanceTransform);

    /// Whether `object` still exists.
    fn is_alive(&self, object: Self::Handle) -> bool;

    /// Destroy `object` and everything parented under it.
    ///
    /// Returns `false` if the object was already gone.
    fn destroy(&mut self, object: Self::Handle) -> bool;
}

/// Handle type of [`MemoryScene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An object stored in a [`MemoryScene`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub parent: Option<ObjectId>,
    /// Prefab this object was instantiated from, if any.
    pub prefab: Option<PrefabId>,
    pub transform: InstanceTransform,
}

/// In-memory scene graph implementing [`SceneHost`].
#[derive(Debug, Default)]
pub struct MemoryScene {
    next_id: u64,
    objects: BTreeMap<ObjectId, SceneObject>,
    prefabs: HashMap<PrefabId, Vec3>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prefab template with its local scale.
    pub fn with_prefab(mut self, prefab: impl Into<PrefabId>, scale: Vec3) -> Self {
        self.register_prefab(prefab, scale);
        self
    }

    pub fn register_prefab(&mut self, prefab: impl Into<PrefabId>, scale: Vec3) {
        self.prefabs.insert(prefab.into(), scale);
    }

    pub fn unregister_prefab(&mut self, prefab: &PrefabId) -> bool {
        self.prefabs.remove(prefab).is_some()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Live objects without a parent, in creation order.
    pub fn roots(&self) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, obj)| obj.parent.is_none())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Direct children of `parent`, in creation order.
    pub fn children_of(&self, parent: ObjectId) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, obj)| obj.parent == Some(parent))
            .map(|(id, _)| *id)
            .collect()
    }

    fn allocate(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, object);
        id
    }
}

impl SceneHost for MemoryScene {
    type Handle = ObjectId;

    fn create_root(&mut self, name: &str) -> ObjectId {
        self.allocate(SceneObject {
            name: name.to_owned(),
            parent: None,
            prefab: None,
            transform: InstanceTransform::default(),
        })
    }

    fn prefab_scale(&self, prefab: &PrefabId) -> Option<Vec3> {
        self.prefabs.get(prefab).copied()
    }

    fn instantiate(&mut self, prefab: &PrefabId, parent: ObjectId) -> Option<ObjectId> {
        let scale = self.prefab_scale(prefab)?;
        if !self.objects.contains_key(&parent) {
            return None;
        }
        Some(self.allocate(SceneObject {
            name: prefab.as_str().to_owned(),
            parent: Some(parent),
            prefab: Some(prefab.clone()),
            transform: InstanceTransform {
                scale,
                ..Default::default()
            },
        }))
    }

    fn set_local_transform(&mut self, object: ObjectId, transform: InstanceTransform) {
        if let Some(obj) = self.objects.get_mut(&object) {
            obj.transform = transform;
        }
    }

    fn is_alive(&self, object: ObjectId) -> bool {
        self.objects.contains_key(&object)
    }

    fn destroy(&mut self, object: ObjectId) -> bool {
        if self.objects.remove(&object).is_none() {
            return false;
        }
        let mut pending = vec![object];
        while let Some(parent) = pending.pop() {
            let children = self.children_of(parent);
            for child in children {
                self.objects.remove(&child);
                pending.push(child);
            }
        }
        true
    }
}
