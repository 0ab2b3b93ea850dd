use wobble::{RecordingBackend, SceneDef};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let s = include_str!("../tests/data/demo_scene.json");
    let mut built = SceneDef::from_json_str(s)?.build()?;
    let mut backend = RecordingBackend::new();

    for f in 0..4 {
        let stats = built.ctx.frame(125.0, &mut backend)?;
        let hero = built.names["hero"];
        println!(
            "frame {f}: {} batches, {} primitives, hero at {:?}",
            stats.batches,
            stats.primitives,
            built.ctx.scene.absolute_rect(hero)?.origin()
        );
    }

    Ok(())
}
