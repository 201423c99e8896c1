use glam::Vec3;
use prefab_array::prelude::*;
use prefab_array_examples::init_tracing;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut scene = MemoryScene::new()
        .with_prefab("tree", Vec3::ONE)
        .with_prefab("rock", Vec3::splat(0.5));
    let mut rng = StdRng::seed_from_u64(3);
    let mut library = ArrayLibrary::new();

    let sink = FnSink::new(|event: ArrayEvent| println!("event: {event:?}"));
    let mut runner = ArrayRunner::new(&mut scene, &mut rng).with_sink(sink);

    let Some(grove) = runner.create(
        &mut library,
        ArraySettings::grid("grove", 3, 3, 1, 4.0)
            .with_prefab("tree")
            .with_random_rotation(true),
    ) else {
        anyhow::bail!("grove was not created");
    };

    // Switch the grove to a ring of rocks; the old trees are destroyed first.
    runner.update(
        &mut library,
        grove,
        ArraySettings::circle("grove", 6, 3.0).with_prefab("rock"),
    );

    // Missing prefabs are skipped, not errors.
    runner.create(&mut library, ArraySettings::grid("empty", 2, 2, 1, 1.0));

    runner.delete_all(&mut library);
    println!("objects left in scene: {}", runner.scene().len());
    Ok(())
}
