use std::collections::HashMap;

use bevy::prelude::*;
use bevy::scene::SceneRoot;
use prefab_array::prelude::{InstanceTransform, PrefabId, SceneHost};

/// Marker on the container entity of an array set.
#[derive(Component, Debug, Clone, Default)]
pub struct ArrayRoot;

/// Component on every entity spawned for an array set.
#[derive(Component, Debug, Clone)]
pub struct ArrayInstance {
    /// Root entity the instance is parented under.
    pub root: Entity,
    /// Prefab the instance was spawned from.
    pub prefab: PrefabId,
}

/// Scene and template scale registered for a prefab id.
#[derive(Debug, Clone)]
pub struct PrefabTemplate {
    pub scene: Handle<Scene>,
    pub scale: Vec3,
}

impl PrefabTemplate {
    pub fn new(scene: Handle<Scene>) -> Self {
        Self {
            scene,
            scale: Vec3::ONE,
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}

/// Prefabs that array sets may reference, keyed by [`PrefabId`].
#[derive(Resource, Debug, Default, Clone)]
pub struct PrefabRegistry {
    templates: HashMap<PrefabId, PrefabTemplate>,
}

impl PrefabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<PrefabId>, template: PrefabTemplate) {
        self.templates.insert(id.into(), template);
    }

    pub fn with(mut self, id: impl Into<PrefabId>, template: PrefabTemplate) -> Self {
        self.insert(id, template);
        self
    }

    pub fn remove(&mut self, id: &PrefabId) -> Option<PrefabTemplate> {
        self.templates.remove(id)
    }

    pub fn get(&self, id: &PrefabId) -> Option<&PrefabTemplate> {
        self.templates.get(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// [`SceneHost`] over a Bevy [`World`].
///
/// Only entities carrying [`ArrayRoot`] or [`ArrayInstance`] count as alive,
/// so a stale handle never despawns an entity the plugin did not spawn.
pub struct WorldSceneHost<'w> {
    world: &'w mut World,
}

impl<'w> WorldSceneHost<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }

    fn template(&self, prefab: &PrefabId) -> Option<PrefabTemplate> {
        self.world
            .get_resource::<PrefabRegistry>()
            .and_then(|registry| registry.get(prefab))
            .cloned()
    }
}

impl SceneHost for WorldSceneHost<'_> {
    type Handle = Entity;

    fn create_root(&mut self, name: &str) -> Entity {
        self.world
            .spawn((
                Name::new(name.to_owned()),
                Transform::default(),
                Visibility::default(),
                ArrayRoot,
            ))
            .id()
    }

    fn prefab_scale(&self, prefab: &PrefabId) -> Option<Vec3> {
        self.template(prefab).map(|t| t.scale)
    }

    fn instantiate(&mut self, prefab: &PrefabId, parent: Entity) -> Option<Entity> {
        let template = self.template(prefab)?;
        if !self.is_alive(parent) {
            return None;
        }
        let entity = self
            .world
            .spawn((
                Name::new(prefab.to_string()),
                SceneRoot(template.scene),
                Transform::from_scale(template.scale),
                ArrayInstance {
                    root: parent,
                    prefab: prefab.clone(),
                },
                ChildOf(parent),
            ))
            .id();
        Some(entity)
    }

    fn set_local_transform(&mut self, object: Entity, transform: InstanceTransform) {
        if !self.is_alive(object) {
            return;
        }
        if let Ok(mut entity) = self.world.get_entity_mut(object) {
            entity.insert(Transform {
                translation: transform.translation,
                rotation: transform.rotation,
                scale: transform.scale,
            });
        }
    }

    fn is_alive(&self, object: Entity) -> bool {
        self.world
            .get_entity(object)
            .is_ok_and(|e| e.contains::<ArrayRoot>() || e.contains::<ArrayInstance>())
    }

    fn destroy(&mut self, object: Entity) -> bool {
        if !self.is_alive(object) {
            return false;
        }
        match self.world.get_entity_mut(object) {
            Ok(entity) => {
                entity.despawn();
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_prefab() -> World {
        let mut world = World::new();
        world.insert_resource(PrefabRegistry::new().with(
            "lamp",
            PrefabTemplate::new(Handle::default()).with_scale(Vec3::new(1.0, 2.0, 1.0)),
        ));
        world
    }

    #[test]
    fn root_and_instances_are_tagged_and_parented() {
        let mut world = world_with_prefab();
        let mut host = WorldSceneHost::new(&mut world);

        let root = host.create_root("street lamps");
        let lamp = host.instantiate(&"lamp".into(), root).unwrap();
        assert!(host.instantiate(&"missing".into(), root).is_none());
        assert_eq!(host.prefab_scale(&"lamp".into()), Some(Vec3::new(1.0, 2.0, 1.0)));

        assert_eq!(world.get::<Name>(root).unwrap().as_str(), "street lamps");
        assert!(world.get::<ArrayRoot>(root).is_some());
        assert_eq!(world.get::<ChildOf>(lamp).unwrap().parent(), root);
        assert_eq!(world.get::<ArrayInstance>(lamp).unwrap().root, root);
        assert_eq!(
            world.get::<Transform>(lamp).unwrap().scale,
            Vec3::new(1.0, 2.0, 1.0)
        );
    }

    #[test]
    fn set_local_transform_overwrites_transform() {
        let mut world = world_with_prefab();
        let mut host = WorldSceneHost::new(&mut world);
        let root = host.create_root("r");
        let lamp = host.instantiate(&"lamp".into(), root).unwrap();

        let transform = InstanceTransform {
            translation: Vec3::new(1.0, 0.0, 2.0),
            rotation: Quat::from_rotation_y(1.0),
            scale: Vec3::splat(0.5),
        };
        host.set_local_transform(lamp, transform);

        let t = world.get::<Transform>(lamp).unwrap();
        assert_eq!(t.translation, transform.translation);
        assert_eq!(t.rotation, transform.rotation);
        assert_eq!(t.scale, transform.scale);
    }

    #[test]
    fn destroy_despawns_hierarchy_and_ignores_foreign_entities() {
        let mut world = world_with_prefab();
        let bystander = world.spawn(Name::new("bystander")).id();
        let mut host = WorldSceneHost::new(&mut world);

        let root = host.create_root("r");
        let lamp = host.instantiate(&"lamp".into(), root).unwrap();

        assert!(!host.is_alive(bystander));
        assert!(!host.destroy(bystander));
        assert!(host.destroy(root));
        assert!(!host.is_alive(lamp));
        assert!(!host.destroy(root));

        assert!(world.get_entity(bystander).is_ok());
        assert!(world.get_entity(lamp).is_err());
    }
}
