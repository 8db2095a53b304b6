use rand::rngs::StdRng;
use rand::SeedableRng;
use random_art::prelude::*;
use random_art_examples::{init_tracing, render_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let rc = RenderConfig::new((512, 512)).with_time(1.0);

    render_to_png(&presets::gradient(), &rc, "preview-gradient.png")?;
    render_to_png(&presets::cool(), &rc, "preview-cool.png")?;

    let grammar = presets::classic();
    let mut rng = StdRng::seed_from_u64(2025);
    for i in 0..4 {
        let tree = synthesize(&grammar, presets::CLASSIC_START, 12, &mut rng)?;
        render_to_png(&tree, &rc, format!("preview-classic-{}.png", i))?;
    }

    Ok(())
}
