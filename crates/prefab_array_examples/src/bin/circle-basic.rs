use glam::Vec3;
use prefab_array::prelude::*;
use prefab_array_examples::{init_tracing, print_scene};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut scene = MemoryScene::new().with_prefab("pillar", Vec3::new(1.0, 4.0, 1.0));
    let mut rng = StdRng::seed_from_u64(7);
    let mut library = ArrayLibrary::new();

    // Twelve pillars on a ring of radius 8, each with a little scale variation.
    let settings = ArraySettings::circle("colonnade", 12, 8.0)
        .with_prefab("pillar")
        .with_random_scale(true);
    settings.validate()?;

    let mut runner = ArrayRunner::new(&mut scene, &mut rng);
    runner.create(&mut library, settings);

    print_scene(&scene);
    Ok(())
}
