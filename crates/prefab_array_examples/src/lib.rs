#![forbid(unsafe_code)]

use prefab_array::prelude::{MemoryScene, ObjectId};

/// Install a fmt subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

/// Print every root in `scene` with its children's local transforms.
pub fn print_scene(scene: &MemoryScene) {
    for root in scene.roots() {
        let Some(object) = scene.get(root) else {
            continue;
        };
        println!("{} {}", root, object.name);
        for child in scene.children_of(root) {
            print_child(scene, child);
        }
    }
}

fn print_child(scene: &MemoryScene, id: ObjectId) {
    let Some(object) = scene.get(id) else {
        return;
    };
    let t = object.transform;
    let (yaw, _, _) = t.rotation.to_euler(glam::EulerRot::YXZ);
    println!(
        "  {} pos=({:>7.2}, {:>7.2}, {:>7.2}) yaw={:>7.1} scale=({:.2}, {:.2}, {:.2})",
        id,
        t.translation.x,
        t.translation.y,
        t.translation.z,
        yaw.to_degrees(),
        t.scale.x,
        t.scale.y,
        t.scale.z,
    );
}
