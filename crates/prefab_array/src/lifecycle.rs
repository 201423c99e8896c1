//! Lifecycle controller: create, regenerate, and delete array sets against a
//! [`SceneHost`], keeping each set's recorded children in step with the scene.
//!
//! Every operation recovers locally. Missing prefabs, out-of-range indices and
//! objects destroyed behind the controller's back are logged and reported as
//! [`ArrayEvent`]s, never returned as errors.
use glam::Vec3;
use tracing::{debug, info, warn};

use crate::compose::{compose_instance, RandomSource};
use crate::events::{ArrayEvent, ArrayEventKind, EventSink};
use crate::layout::generate_placements;
use crate::scene::SceneHost;
use crate::set::{ArrayLibrary, ArraySet, ArraySettings, PrefabId};

/// Outcome of tearing down a set's recorded children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearReport {
    /// Children that were live and got destroyed.
    pub destroyed: usize,
    /// Recorded children that no longer existed.
    pub stale: usize,
}

impl ClearReport {
    pub fn total(&self) -> usize {
        self.destroyed + self.stale
    }
}

/// Drives array set operations against a scene host.
pub struct ArrayRunner<'a, S, R, K = ()>
where
    S: SceneHost,
    R: RandomSource + ?Sized,
    K: EventSink,
{
    scene: &'a mut S,
    rng: &'a mut R,
    sink: K,
}

impl<'a, S, R> ArrayRunner<'a, S, R, ()>
where
    S: SceneHost,
    R: RandomSource + ?Sized,
{
    pub fn new(scene: &'a mut S, rng: &'a mut R) -> Self {
        Self {
            scene,
            rng,
            sink: (),
        }
    }
}

impl<'a, S, R, K> ArrayRunner<'a, S, R, K>
where
    S: SceneHost,
    R: RandomSource + ?Sized,
    K: EventSink,
{
    /// Replace the event sink.
    pub fn with_sink<K2: EventSink>(self, sink: K2) -> ArrayRunner<'a, S, R, K2> {
        ArrayRunner {
            scene: self.scene,
            rng: self.rng,
            sink,
        }
    }

    pub fn scene(&self) -> &S {
        self.scene
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Create a new set from `settings`, spawn its instances, and append it to `library`.
    ///
    /// Returns the new set's index, or `None` if nothing was created (invalid
    /// settings, no prefab, or a prefab the host cannot resolve). In that case
    /// no root object exists either.
    pub fn create(
        &mut self,
        library: &mut ArrayLibrary<S::Handle>,
        settings: ArraySettings,
    ) -> Option<usize> {
        if let Err(err) = settings.validate() {
            self.warn(&settings.name, format!("settings rejected: {err}"));
            return None;
        }
        let (prefab, scale) = self.resolve_prefab(&settings)?;

        let root = self.scene.create_root(&settings.name);
        let mut set = ArraySet::new(settings);
        set.set_root(Some(root));
        let spawned = self.spawn_children(&mut set, root, &prefab, scale);

        let name = set.name().to_owned();
        let index = library.push(set);
        info!(
            "Array set '{}' created at index {} with {} instances.",
            name, index, spawned
        );
        self.emit(ArrayEventKind::SetCreated, || ArrayEvent::SetCreated {
            index,
            name,
            spawned,
        });
        Some(index)
    }

    /// Replace the settings of the set at `index` and regenerate it in place.
    ///
    /// Previously recorded instances are destroyed first. The root keeps its
    /// name and transform. Returns `false` if `index` is out of range or the
    /// settings are invalid; in both cases nothing changes.
    pub fn update(
        &mut self,
        library: &mut ArrayLibrary<S::Handle>,
        index: usize,
        settings: ArraySettings,
    ) -> bool {
        let Some(set) = library.get_mut(index) else {
            self.warn(
                &format!("index:{index}"),
                "no array set at this index; update ignored".into(),
            );
            return false;
        };
        if let Err(err) = settings.validate() {
            self.warn(set.name(), format!("settings rejected: {err}"));
            return false;
        }

        set.set_settings(settings);
        self.clear_children(set);

        let spawned = match self.resolve_prefab(set.settings()) {
            Some((prefab, scale)) => {
                let root = self.ensure_root(set);
                self.spawn_children(set, root, &prefab, scale)
            }
            None => 0,
        };

        let name = set.name().to_owned();
        info!(
            "Array set '{}' at index {} regenerated with {} instances.",
            name, index, spawned
        );
        self.emit(ArrayEventKind::SetUpdated, || ArrayEvent::SetUpdated {
            index,
            name,
            spawned,
        });
        true
    }

    /// Regenerate the set at `index` from its stored settings.
    pub fn regenerate(&mut self, library: &mut ArrayLibrary<S::Handle>, index: usize) -> bool {
        let Some(settings) = library.get(index).map(|s| s.settings().clone()) else {
            self.warn(
                &format!("index:{index}"),
                "no array set at this index; regenerate ignored".into(),
            );
            return false;
        };
        self.update(library, index, settings)
    }

    /// Destroy every recorded child of `set` that is still live and empty the record.
    ///
    /// Children destroyed elsewhere are skipped and counted as stale. Calling
    /// this twice in a row does nothing the second time.
    pub fn clear_children(&mut self, set: &mut ArraySet<S::Handle>) -> ClearReport {
        let children = set.take_children();
        if children.is_empty() {
            return ClearReport::default();
        }

        let mut report = ClearReport::default();
        for child in children {
            if self.scene.is_alive(child) && self.scene.destroy(child) {
                report.destroyed += 1;
            } else {
                report.stale += 1;
            }
        }

        if report.stale > 0 {
            warn!(
                "Array set '{}': {} recorded instances were already destroyed.",
                set.name(),
                report.stale
            );
        }
        debug!(
            "Array set '{}': cleared {} instances.",
            set.name(),
            report.destroyed
        );
        self.emit(ArrayEventKind::ChildrenCleared, || {
            ArrayEvent::ChildrenCleared {
                name: set.name().to_owned(),
                destroyed: report.destroyed,
                stale: report.stale,
            }
        });
        report
    }

    /// Destroy the set at `index` (children, then root) and remove it from `library`.
    pub fn delete(&mut self, library: &mut ArrayLibrary<S::Handle>, index: usize) -> bool {
        let Some(mut set) = library.remove(index) else {
            self.warn(
                &format!("index:{index}"),
                "no array set at this index; delete ignored".into(),
            );
            return false;
        };

        self.clear_children(&mut set);
        if let Some(root) = set.root() {
            if !self.scene.destroy(root) {
                debug!("Array set '{}': root was already destroyed.", set.name());
            }
        }

        let name = set.name().to_owned();
        info!("Array set '{}' at index {} deleted.", name, index);
        self.emit(ArrayEventKind::SetDeleted, || ArrayEvent::SetDeleted {
            index,
            name,
        });
        true
    }

    /// Delete every set in `library`. Returns how many were deleted.
    pub fn delete_all(&mut self, library: &mut ArrayLibrary<S::Handle>) -> usize {
        let mut deleted = 0;
        while !library.is_empty() {
            let last = library.len() - 1;
            if self.delete(library, last) {
                deleted += 1;
            }
        }
        library.clear_selection();
        deleted
    }

    /// Prefab and its template scale, or `None` (logged) if generation must be skipped.
    fn resolve_prefab(&mut self, settings: &ArraySettings) -> Option<(PrefabId, Vec3)> {
        let Some(prefab) = settings.prefab.clone() else {
            debug!(
                "Array set '{}' has no prefab; skipping generation.",
                settings.name
            );
            self.emit(ArrayEventKind::Skipped, || ArrayEvent::Skipped {
                context: settings.name.clone(),
                reason: "no prefab assigned".into(),
            });
            return None;
        };
        let Some(scale) = self.scene.prefab_scale(&prefab) else {
            self.warn(
                &settings.name,
                format!("prefab '{prefab}' cannot be resolved; skipping generation"),
            );
            return None;
        };
        Some((prefab, scale))
    }

    /// Live root of `set`, recreating it if it was destroyed externally.
    fn ensure_root(&mut self, set: &mut ArraySet<S::Handle>) -> S::Handle {
        if let Some(root) = set.root() {
            if self.scene.is_alive(root) {
                return root;
            }
            self.warn(
                set.name(),
                "root was destroyed outside the tool; recreating it".into(),
            );
        }
        let root = self.scene.create_root(set.name());
        set.set_root(Some(root));
        root
    }

    fn spawn_children(
        &mut self,
        set: &mut ArraySet<S::Handle>,
        root: S::Handle,
        prefab: &PrefabId,
        prefab_scale: Vec3,
    ) -> usize {
        let placements = generate_placements(&set.settings().layout);
        let modifiers = set.settings().modifiers;

        for placement in &placements {
            let Some(child) = self.scene.instantiate(prefab, root) else {
                self.warn(
                    set.name(),
                    format!("failed to instantiate prefab '{prefab}'; stopping"),
                );
                break;
            };
            let transform = compose_instance(placement, &modifiers, prefab_scale, &mut *self.rng);
            self.scene.set_local_transform(child, transform);
            set.record_child(child);
        }
        set.child_count()
    }

    fn emit(&mut self, kind: ArrayEventKind, build: impl FnOnce() -> ArrayEvent) {
        if self.sink.wants(kind) {
            self.sink.send(build());
        }
    }

    fn warn(&mut self, context: &str, message: String) {
        warn!("Array set '{}': {}.", context, message);
        self.emit(ArrayEventKind::Warning, || ArrayEvent::Warning {
            context: context.to_owned(),
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::compose::{compose_instance, Modifiers};
    use crate::events::VecSink;
    use crate::layout::{generate_placements, Layout};
    use crate::scene::{MemoryScene, ObjectId};

    fn scene() -> MemoryScene {
        MemoryScene::new()
            .with_prefab("crate", Vec3::ONE)
            .with_prefab("pillar", Vec3::new(1.0, 3.0, 1.0))
    }

    fn grid(name: &str) -> ArraySettings {
        ArraySettings::grid(name, 2, 3, 1, 2.0).with_prefab("crate")
    }

    fn live_children(scene: &MemoryScene, set: &ArraySet<ObjectId>) -> Vec<ObjectId> {
        scene.children_of(set.root().expect("set has a root"))
    }

    #[test]
    fn create_without_prefab_is_a_silent_no_op() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();
        let mut runner = ArrayRunner::new(&mut scene, &mut rng).with_sink(VecSink::new());

        let created = runner.create(&mut lib, ArraySettings::grid("bare", 2, 2, 1, 1.0));
        let sink = runner.into_sink();

        assert_eq!(created, None);
        assert!(lib.is_empty());
        assert!(scene.is_empty());
        assert_eq!(sink.count(ArrayEventKind::Skipped), 1);
    }

    #[test]
    fn create_with_unknown_prefab_creates_nothing() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();
        let mut runner = ArrayRunner::new(&mut scene, &mut rng);

        let settings = ArraySettings::circle("ring", 4, 2.0).with_prefab("ghost");
        assert_eq!(runner.create(&mut lib, settings), None);
        assert!(scene.is_empty());
    }

    #[test]
    fn create_rejects_invalid_settings() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();
        let mut runner = ArrayRunner::new(&mut scene, &mut rng).with_sink(VecSink::new());

        let settings = ArraySettings::grid("nan", 2, 2, 1, f32::NAN).with_prefab("crate");
        assert_eq!(runner.create(&mut lib, settings), None);
        assert_eq!(runner.sink().count(ArrayEventKind::Warning), 1);
        assert!(runner.scene().is_empty());
    }

    #[test]
    fn create_with_blank_name_still_generates() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();
        let mut runner = ArrayRunner::new(&mut scene, &mut rng);

        let index = runner.create(&mut lib, grid("")).unwrap();
        let set = lib.get(index).unwrap();
        assert_eq!(set.child_count(), 6);
        assert_eq!(scene.get(set.root().unwrap()).unwrap().name, "");
    }

    #[test]
    fn create_spawns_one_child_per_placement_under_named_root() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();
        let mut runner = ArrayRunner::new(&mut scene, &mut rng);

        let settings = grid("wall").with_position_offset(Vec3::new(0.0, 0.0, 1.0));
        let index = runner.create(&mut lib, settings.clone()).unwrap();
        let set = lib.get(index).unwrap();

        let root = set.root().unwrap();
        assert_eq!(scene.get(root).unwrap().name, "wall");
        assert_eq!(set.child_count(), 6);
        assert_eq!(live_children(&scene, set), set.children());

        let expected: Vec<Vec3> = generate_placements(&settings.layout)
            .iter()
            .map(|p| p.position + Vec3::Z)
            .collect();
        let actual: Vec<Vec3> = set
            .children()
            .iter()
            .map(|c| scene.get(*c).unwrap().transform.translation)
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn child_transforms_follow_compositing_rule() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();
        let mut runner = ArrayRunner::new(&mut scene, &mut rng);

        let modifiers = Modifiers::new()
            .with_rotation_offset(Vec3::new(0.0, 15.0, 0.0))
            .with_scale_multiplier(Vec3::splat(0.5));
        let settings = ArraySettings::circle("ring", 5, 4.0)
            .with_prefab("pillar")
            .with_modifiers(modifiers);
        let index = runner.create(&mut lib, settings.clone()).unwrap();
        let set = lib.get(index).unwrap();

        let mut unused = StdRng::seed_from_u64(99);
        for (child, placement) in set.children().iter().zip(generate_placements(&settings.layout)) {
            let expected =
                compose_instance(&placement, &modifiers, Vec3::new(1.0, 3.0, 1.0), &mut unused);
            assert_eq!(scene.get(*child).unwrap().transform, expected);
        }
    }

    #[test]
    fn update_with_same_settings_keeps_child_count_stable() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();
        let mut runner = ArrayRunner::new(&mut scene, &mut rng);

        let settings = grid("wall").with_random_rotation(true);
        let index = runner.create(&mut lib, settings.clone()).unwrap();

        for _ in 0..3 {
            assert!(runner.update(&mut lib, index, settings.clone()));
            assert_eq!(lib.get(index).unwrap().child_count(), 6);
            assert_eq!(runner.scene().len(), 7);
        }
        let set = lib.get(index).unwrap();
        assert_eq!(live_children(&scene, set), set.children());
    }

    #[test]
    fn update_keeps_root_identity_and_swaps_layout() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();
        let mut runner = ArrayRunner::new(&mut scene, &mut rng);

        let index = runner.create(&mut lib, grid("wall")).unwrap();
        let root = lib.get(index).unwrap().root().unwrap();

        let changed = ArraySettings::circle("renamed", 8, 3.0).with_prefab("pillar");
        assert!(runner.update(&mut lib, index, changed));

        let set = lib.get(index).unwrap();
        assert_eq!(set.root(), Some(root));
        assert_eq!(set.name(), "renamed");
        assert_eq!(scene.get(root).unwrap().name, "wall");
        assert_eq!(set.child_count(), 8);
        assert_eq!(scene.len(), 9);
        assert_eq!(live_children(&scene, set), set.children());
    }

    #[test]
    fn update_tolerates_children_destroyed_elsewhere() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();

        let index = ArrayRunner::new(&mut scene, &mut rng)
            .create(&mut lib, grid("wall"))
            .unwrap();
        let doomed = lib.get(index).unwrap().children()[2];
        scene.destroy(doomed);

        let mut runner = ArrayRunner::new(&mut scene, &mut rng).with_sink(VecSink::new());
        assert!(runner.update(&mut lib, index, grid("wall")));
        let events = runner.into_sink().into_inner();

        assert!(events.contains(&ArrayEvent::ChildrenCleared {
            name: "wall".into(),
            destroyed: 5,
            stale: 1,
        }));
        let set = lib.get(index).unwrap();
        assert_eq!(set.child_count(), 6);
        assert_eq!(live_children(&scene, set), set.children());
    }

    #[test]
    fn update_recreates_root_destroyed_elsewhere() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();

        let index = ArrayRunner::new(&mut scene, &mut rng)
            .create(&mut lib, grid("wall"))
            .unwrap();
        let old_root = lib.get(index).unwrap().root().unwrap();
        scene.destroy(old_root);
        assert!(scene.is_empty());

        let mut runner = ArrayRunner::new(&mut scene, &mut rng);
        assert!(runner.regenerate(&mut lib, index));

        let set = lib.get(index).unwrap();
        let new_root = set.root().unwrap();
        assert_ne!(new_root, old_root);
        assert_eq!(scene.get(new_root).unwrap().name, "wall");
        assert_eq!(live_children(&scene, set), set.children());
        assert_eq!(scene.len(), 7);
    }

    #[test]
    fn update_without_prefab_clears_and_keeps_root() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();
        let mut runner = ArrayRunner::new(&mut scene, &mut rng);

        let index = runner.create(&mut lib, grid("wall")).unwrap();
        assert!(runner.update(&mut lib, index, grid("wall").without_prefab()));

        let set = lib.get(index).unwrap();
        assert_eq!(set.child_count(), 0);
        assert_eq!(scene.roots(), vec![set.root().unwrap()]);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn update_out_of_range_is_ignored() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();
        let mut runner = ArrayRunner::new(&mut scene, &mut rng).with_sink(VecSink::new());

        assert!(!runner.update(&mut lib, 3, grid("wall")));
        assert!(!runner.regenerate(&mut lib, 0));
        assert!(!runner.delete(&mut lib, 0));
        assert_eq!(runner.sink().count(ArrayEventKind::Warning), 3);
        assert!(runner.scene().is_empty());
    }

    #[test]
    fn invalid_update_leaves_set_untouched() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();
        let mut runner = ArrayRunner::new(&mut scene, &mut rng);

        let index = runner.create(&mut lib, grid("wall")).unwrap();
        let before = lib.get(index).unwrap().clone();
        assert!(!runner.update(&mut lib, index, ArraySettings::grid("wall", 1, 1, 1, f32::NAN)));
        assert_eq!(lib.get(index), Some(&before));
    }

    #[test]
    fn clear_children_is_idempotent() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();
        let mut runner = ArrayRunner::new(&mut scene, &mut rng);

        let index = runner.create(&mut lib, grid("wall")).unwrap();
        let mut set = lib.get(index).unwrap().clone();

        let first = runner.clear_children(&mut set);
        let second = runner.clear_children(&mut set);
        assert_eq!(
            first,
            ClearReport {
                destroyed: 6,
                stale: 0
            }
        );
        assert_eq!(second, ClearReport::default());
        assert_eq!(runner.scene().len(), 1);
    }

    #[test]
    fn delete_removes_children_root_and_record() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();
        let mut runner = ArrayRunner::new(&mut scene, &mut rng);

        let wall = runner.create(&mut lib, grid("wall")).unwrap();
        runner
            .create(&mut lib, ArraySettings::circle("ring", 4, 2.0).with_prefab("pillar"))
            .unwrap();
        let ring_root = lib.get(1).unwrap().root().unwrap();

        assert!(runner.delete(&mut lib, wall));
        assert_eq!(lib.len(), 1);
        assert_eq!(lib.get(0).unwrap().name(), "ring");
        assert_eq!(scene.roots(), vec![ring_root]);
        assert_eq!(scene.len(), 5);
    }

    #[test]
    fn delete_tolerates_root_destroyed_elsewhere() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();

        let index = ArrayRunner::new(&mut scene, &mut rng)
            .create(&mut lib, grid("wall"))
            .unwrap();
        scene.destroy(lib.get(index).unwrap().root().unwrap());

        let mut runner = ArrayRunner::new(&mut scene, &mut rng).with_sink(VecSink::new());
        assert!(runner.delete(&mut lib, index));
        let sink = runner.into_sink();
        assert_eq!(sink.count(ArrayEventKind::SetDeleted), 1);
        assert!(lib.is_empty());
    }

    #[test]
    fn delete_all_empties_library_and_scene() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();
        let mut runner = ArrayRunner::new(&mut scene, &mut rng);

        assert_eq!(runner.delete_all(&mut lib), 0);

        runner.create(&mut lib, grid("a")).unwrap();
        runner.create(&mut lib, grid("b")).unwrap();
        runner
            .create(&mut lib, ArraySettings::circle("c", 3, 1.0).with_prefab("pillar"))
            .unwrap();
        lib.select(1);

        assert_eq!(runner.delete_all(&mut lib), 3);
        assert!(lib.is_empty());
        assert_eq!(lib.selected(), None);
        assert!(scene.is_empty());
    }

    #[test]
    fn randomized_sets_keep_deterministic_positions() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(5);
        let mut lib = ArrayLibrary::new();
        let mut runner = ArrayRunner::new(&mut scene, &mut rng);

        let settings = grid("jitter")
            .with_random_rotation(true)
            .with_random_scale(true);
        let a = runner.create(&mut lib, settings.clone()).unwrap();
        let b = runner.create(&mut lib, settings.clone()).unwrap();

        let positions = |index: usize| -> Vec<Vec3> {
            lib.get(index)
                .unwrap()
                .children()
                .iter()
                .map(|c| scene.get(*c).unwrap().transform.translation)
                .collect()
        };
        assert_eq!(positions(a), positions(b));
    }

    #[test]
    fn events_report_spawn_counts() {
        let mut scene = scene();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lib = ArrayLibrary::new();
        let mut runner = ArrayRunner::new(&mut scene, &mut rng).with_sink(VecSink::new());

        let index = runner.create(&mut lib, grid("wall")).unwrap();
        runner.update(
            &mut lib,
            index,
            grid("wall").with_layout(Layout::Circle(crate::layout::CircleLayout::new(3, 1.0))),
        );
        let events = runner.into_sink().into_inner();

        assert_eq!(
            events.first(),
            Some(&ArrayEvent::SetCreated {
                index: 0,
                name: "wall".into(),
                spawned: 6
            })
        );
        assert_eq!(
            events.last(),
            Some(&ArrayEvent::SetUpdated {
                index: 0,
                name: "wall".into(),
                spawned: 3
            })
        );
    }
}
