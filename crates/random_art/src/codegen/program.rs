//! Complete shader sources around a generated expression.
//!
//! The expression produced by [`crate::codegen::generate`] refers to the free variables
//! `x`, `y`, `t`, `mouse_x`, and `mouse_y`. The templates here bind them: pixel and pointer
//! coordinates are mapped from `[0, size]` to `[-1, 1]` using the [`Canvas`] dimensions,
//! and `t = sin(time / 2)`. The expression's color in `[-1, 1]` is mapped to `[0, 1]`.
//!
//! Uniform upload and pipeline setup stay with the host renderer:
//! - GLSL expects `uniform vec2 mouse` (pixels) and `uniform float time` (seconds) and a
//!   `vec2 aPos` attribute carrying a full-screen quad.
//! - WGSL expects a read-only storage buffer `Context { mouse_x, mouse_y, time }` at
//!   `@group(0) @binding(0)` and draws six vertices with entry points `vs` and `fs`.
use glam::UVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::Node;
use crate::codegen::{generate, Dialect};
use crate::error::{Error, Result};

/// Target shading language of a complete program.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderLanguage {
    /// GLSL ES 1.00 for WebGL 1.
    Glsl,
    /// WGSL for WebGPU.
    Wgsl,
}

impl ShaderLanguage {
    /// Dialect used for expressions embedded in this language's template.
    pub fn dialect(self) -> Dialect {
        match self {
            ShaderLanguage::Glsl => Dialect::glsl(),
            ShaderLanguage::Wgsl => Dialect::wgsl(),
        }
    }
}

/// Pixel dimensions of the render target.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Canvas size as a vector.
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Validates the canvas, returning an error if either dimension is zero.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(
                "canvas must be > 0 in both dimensions".into(),
            ));
        }
        Ok(())
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(800, 800)
    }
}

impl From<UVec2> for Canvas {
    fn from(size: UVec2) -> Self {
        Self::new(size.x, size.y)
    }
}

/// Sources of a complete shader program.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderProgram {
    pub language: ShaderLanguage,
    /// Vertex stage source. For WGSL this is the same module as [`Self::fragment`].
    pub vertex: String,
    /// Fragment stage source.
    pub fragment: String,
}

impl ShaderProgram {
    /// Wraps an expression written in `language`'s dialect into a complete program.
    pub fn assemble(language: ShaderLanguage, expr: &str, canvas: Canvas) -> Result<Self> {
        canvas.validate()?;
        let program = match language {
            ShaderLanguage::Glsl => Self {
                language,
                vertex: GLSL_VERTEX.to_string(),
                fragment: glsl_fragment(expr, canvas),
            },
            ShaderLanguage::Wgsl => {
                let module = wgsl_module(expr, canvas);
                Self {
                    language,
                    vertex: module.clone(),
                    fragment: module,
                }
            }
        };
        Ok(program)
    }
}

/// Generates the expression for `node` and wraps it into a complete program.
pub fn compile_art(node: &Node, language: ShaderLanguage, canvas: Canvas) -> Result<ShaderProgram> {
    let expr = generate(node, &language.dialect())?;
    let program = ShaderProgram::assemble(language, &expr, canvas)?;
    debug!(
        "Assembled {:?} program for a {}x{} canvas.",
        language, canvas.width, canvas.height
    );
    Ok(program)
}

const GLSL_VERTEX: &str = r#"attribute vec2 aPos;
void main() {
    gl_Position = vec4(aPos, 0.0, 1.0);
}
"#;

fn glsl_fragment(expr: &str, canvas: Canvas) -> String {
    let w = canvas.width;
    let h = canvas.height;
    format!(
        r#"precision highp float;
uniform vec2 mouse;
uniform float time;
void main() {{
    float x = gl_FragCoord.x / {w}.0 * 2.0 - 1.0;
    float y = gl_FragCoord.y / {h}.0 * 2.0 - 1.0;
    float mouse_x = mouse.x / {w}.0 * 2.0 - 1.0;
    float mouse_y = mouse.y / {h}.0 * 2.0 - 1.0;
    float t = sin(time / 2.0);
    vec3 color = ({expr} + 1.0) * 0.5;
    gl_FragColor = vec4(color, 1.0);
}}
"#
    )
}

fn wgsl_module(expr: &str, canvas: Canvas) -> String {
    let w = canvas.width;
    let h = canvas.height;
    format!(
        r#"@vertex fn vs(@builtin(vertex_index) vertexIndex: u32) -> @builtin(position) vec4f {{
    let pos = array(
        vec2f(-1.0,  1.0),
        vec2f( 1.0,  1.0),
        vec2f( 1.0, -1.0),
        vec2f(-1.0, -1.0),
        vec2f(-1.0,  1.0),
        vec2f( 1.0, -1.0)
    );
    return vec4f(pos[vertexIndex], 0.0, 1.0);
}}

struct Context {{
    mouse_x: f32,
    mouse_y: f32,
    time: f32,
}}

@group(0) @binding(0) var<storage> ctx: Context;

@fragment fn fs(@builtin(position) pos: vec4f) -> @location(0) vec4f {{
    let x = pos.x / {w}.0 * 2.0 - 1.0;
    let y = pos.y / {h}.0 * 2.0 - 1.0;
    let mouse_x = ctx.mouse_x / {w}.0 * 2.0 - 1.0;
    let mouse_y = ctx.mouse_y / {h}.0 * 2.0 - 1.0;
    let t = sin(ctx.time / 2.0);
    let color = ({expr} + 1.0) * 0.5;
    return vec4f(color, 1.0);
}}
"#
    )
}
