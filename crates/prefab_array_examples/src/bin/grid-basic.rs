use glam::Vec3;
use prefab_array::prelude::*;
use prefab_array_examples::{init_tracing, print_scene};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut scene = MemoryScene::new().with_prefab("crate", Vec3::ONE);
    let mut rng = StdRng::seed_from_u64(42);
    let mut library = ArrayLibrary::new();

    // Two stacked 3x4 layers, one unit apart, lifted half a unit off the ground.
    let settings = ArraySettings::grid("crate stack", 3, 4, 2, 1.0)
        .with_prefab("crate")
        .with_position_offset(Vec3::new(0.0, 0.5, 0.0));
    settings.validate()?;
    println!(
        "{} placements expected",
        settings.layout.placement_count()
    );

    let mut runner = ArrayRunner::new(&mut scene, &mut rng);
    runner.create(&mut library, settings);

    print_scene(&scene);
    Ok(())
}
