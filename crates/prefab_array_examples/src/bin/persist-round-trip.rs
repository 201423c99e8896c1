use glam::Vec3;
use prefab_array::prelude::*;
use prefab_array_examples::init_tracing;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut scene = MemoryScene::new().with_prefab("lamp", Vec3::ONE);
    let mut rng = StdRng::seed_from_u64(1);
    let mut library = ArrayLibrary::new();
    let mut prefs = MemoryPreferences::new();

    let mut runner = ArrayRunner::new(&mut scene, &mut rng);
    runner.create(
        &mut library,
        ArraySettings::grid("street lamps", 1, 5, 1, 6.0)
            .with_prefab("lamp")
            .with_rotation_offset(Vec3::new(0.0, 90.0, 0.0)),
    );

    save_library(&library, &mut prefs, DEFAULT_PREFERENCES_KEY)?;
    if let Some(text) = prefs.get_string(DEFAULT_PREFERENCES_KEY) {
        println!("{text}");
    }

    // A later session restores the sets and keeps editing the same objects.
    let mut restored: ArrayLibrary<ObjectId> = load_library(&prefs, DEFAULT_PREFERENCES_KEY);
    let mut runner = ArrayRunner::new(&mut scene, &mut rng);
    runner.regenerate(&mut restored, 0);
    println!(
        "restored {} set(s); scene holds {} objects",
        restored.len(),
        scene.len()
    );
    Ok(())
}
