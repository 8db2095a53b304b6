use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use random_art::prelude::*;
use random_art_examples::{init_tracing, load_grammar, render_to_png, RenderConfig};

#[derive(Parser)]
#[command(name = "random-art")]
#[command(about = "Synthesize a random-art expression and print it as shader source")]
struct Cli {
    /// Seed for the random source.
    #[arg(long, default_value_t = 2025)]
    seed: u64,
    /// Depth budget.
    #[arg(long, default_value_t = presets::CLASSIC_DEPTH)]
    depth: i32,
    /// Start rule.
    #[arg(long, default_value = presets::CLASSIC_START)]
    start: String,
    /// RON grammar file; the classic grammar when omitted.
    #[arg(long)]
    grammar: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Language::Wgsl)]
    language: Language,
    #[arg(long, value_enum, default_value_t = Emit::Expr)]
    emit: Emit,
    /// Canvas width and height in pixels.
    #[arg(long, default_value_t = 512)]
    size: u32,
    /// Also render a CPU preview to this PNG.
    #[arg(long)]
    png: Option<PathBuf>,
    /// Time in seconds used for the preview.
    #[arg(long, default_value_t = 0.0)]
    time: f32,
}

#[derive(Clone, Copy, ValueEnum)]
enum Language {
    Glsl,
    Wgsl,
}

impl From<Language> for ShaderLanguage {
    fn from(language: Language) -> Self {
        match language {
            Language::Glsl => ShaderLanguage::Glsl,
            Language::Wgsl => ShaderLanguage::Wgsl,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Emit {
    /// The bare expression.
    Expr,
    /// Complete vertex and fragment sources.
    Program,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let grammar = match &cli.grammar {
        Some(path) => load_grammar(path)?,
        None => presets::classic(),
    };
    let config = SynthesisConfig::new(cli.start.clone()).with_depth(cli.depth);
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let tree = Synthesizer::try_new(&grammar)?.run(&config, &mut rng)?;

    let language = ShaderLanguage::from(cli.language);
    let canvas = Canvas::new(cli.size, cli.size);
    match cli.emit {
        Emit::Expr => println!("{}", generate(&tree, &language.dialect())?),
        Emit::Program => {
            let program = compile_art(&tree, language, canvas)?;
            match language {
                ShaderLanguage::Glsl => {
                    println!("// vertex\n{}", program.vertex);
                    println!("// fragment\n{}", program.fragment);
                }
                ShaderLanguage::Wgsl => println!("{}", program.fragment),
            }
        }
    }

    if let Some(path) = &cli.png {
        let rc = RenderConfig::new((cli.size, cli.size)).with_time(cli.time);
        render_to_png(&tree, &rc, path)?;
    }

    Ok(())
}
