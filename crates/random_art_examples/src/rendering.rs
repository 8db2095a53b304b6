use std::path::Path;

use glam::Vec2;
use image::{Rgb, RgbImage};
use random_art::prelude::{shade, Canvas, Inputs, Node};
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber installed earlier in the process stays in place.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .ok();
}

/// Image size and the uniform values used for a CPU preview.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    /// Seconds; the expression sees `t = sin(time / 2)`.
    pub time: f32,
    /// Pointer position in image pixels, origin bottom-left.
    pub mouse: Vec2,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32)) -> Self {
        Self {
            image_size,
            time: 0.0,
            mouse: Vec2::new(image_size.0 as f32 * 0.5, image_size.1 as f32 * 0.5),
        }
    }

    pub fn with_time(mut self, time: f32) -> Self {
        self.time = time;
        self
    }

    pub fn with_mouse(mut self, mouse: Vec2) -> Self {
        self.mouse = mouse;
        self
    }

    fn canvas(&self) -> Canvas {
        Canvas::new(self.image_size.0, self.image_size.1)
    }
}

/// Evaluates `node` at every pixel center, matching what the fragment shader would draw.
pub fn render_image(node: &Node, rc: &RenderConfig) -> anyhow::Result<RgbImage> {
    let canvas = rc.canvas();
    canvas.validate()?;
    let (w, h) = rc.image_size;
    let mut img = RgbImage::new(w, h);

    for py in 0..h {
        // Image rows run top-down; fragment coordinates run bottom-up.
        let frag_y = (h - 1 - py) as f32 + 0.5;
        for px in 0..w {
            let pixel = Vec2::new(px as f32 + 0.5, frag_y);
            let inputs = Inputs::from_pixel(pixel, canvas, rc.time, rc.mouse);
            let color = shade(node, &inputs)? * 255.0;
            img.put_pixel(
                px,
                py,
                Rgb([
                    color.x.round() as u8,
                    color.y.round() as u8,
                    color.z.round() as u8,
                ]),
            );
        }
    }

    Ok(img)
}

/// Renders `node` and writes it as a PNG.
pub fn render_to_png(node: &Node, rc: &RenderConfig, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let img = render_image(node, rc)?;
    img.save(path)?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}
