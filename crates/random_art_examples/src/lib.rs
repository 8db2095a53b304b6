#![forbid(unsafe_code)]

mod grammar_file;
mod rendering;

pub use grammar_file::{load_grammar, parse_grammar};
pub use rendering::{init_tracing, render_image, render_to_png, RenderConfig};
