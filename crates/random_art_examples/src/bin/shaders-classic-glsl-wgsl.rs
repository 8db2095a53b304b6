use rand::rngs::StdRng;
use rand::SeedableRng;
use random_art::prelude::*;
use random_art_examples::init_tracing;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let grammar = presets::classic();
    let synthesizer = Synthesizer::try_new(&grammar)?;

    // Same seed, same tree: only the dialect tokens differ between the two outputs.
    let mut rng = StdRng::seed_from_u64(2025);
    let tree = synthesizer.run(&SynthesisConfig::default().with_depth(8), &mut rng)?;
    tracing::info!(
        "Tree has {} nodes, depth {}.",
        tree.node_count(),
        tree.depth()
    );

    for dialect in [Dialect::glsl(), Dialect::wgsl()] {
        println!("{}: {}", dialect.name, generate(&tree, &dialect)?);
    }

    let program = compile_art(&tree, ShaderLanguage::Glsl, Canvas::new(800, 800))?;
    println!("\n{}", program.fragment);

    Ok(())
}
