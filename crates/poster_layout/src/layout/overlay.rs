use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::grid::GridShape;
use crate::config::OverlayConfig;
use crate::geometry::{CanvasSize, Rotation};
use crate::modules::TextModule;

fn default_glyph_family() -> String {
    OverlayConfig::default().font_family
}

/// Low-emphasis repeated text scattered behind the primary modules.
///
/// `left`/`top` locate the glyph's centre; cell and jitter are fixed at
/// creation so the scatter survives a resize unchanged. Glyphs are drawn
/// before, and therefore below, every primary module.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecorativeGlyph {
    pub text: String,
    pub font_size: u32,
    #[serde(default = "default_glyph_family")]
    pub font_family: String,
    #[serde(default)]
    pub col: u32,
    #[serde(default)]
    pub row: u32,
    #[serde(default)]
    pub jitter_x: f32,
    #[serde(default)]
    pub jitter_y: f32,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub top: f32,
}

impl DecorativeGlyph {
    /// Moves the glyph's centre to its cell centre plus jitter.
    pub fn reposition(&mut self, grid: &GridShape, canvas: CanvasSize) {
        let (cell_w, cell_h) = grid.cell_size(canvas.width, canvas.height);
        self.left = (self.col as f32 * cell_w + cell_w / 2.0 + self.jitter_x).round();
        self.top = (self.row as f32 * cell_h + cell_h / 2.0 + self.jitter_y).round();
    }
}

/// Scatters a random number of glyphs over `grid`, drawing their text from
/// the module values.
pub fn scatter_glyphs<R: Rng + ?Sized>(
    modules: &[TextModule],
    grid: &GridShape,
    canvas: CanvasSize,
    config: &OverlayConfig,
    rng: &mut R,
) -> Vec<DecorativeGlyph> {
    let (cell_w, cell_h) = grid.cell_size(canvas.width, canvas.height);
    let sources: Vec<&str> = if modules.is_empty() {
        vec![config.fallback_text.as_str()]
    } else {
        modules.iter().map(|module| module.value.as_str()).collect()
    };

    let count = rng.gen_range(config.count.range());
    let spread = 2.0 * config.jitter_fraction;
    let rotation_probability = config.rotation_probability.clamp(0.0, 1.0);

    let mut glyphs = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let text = sources.choose(rng).copied().unwrap_or(config.fallback_text.as_str());
        let font_size = rng.gen_range(config.font_size.range());
        let col = rng.gen_range(0..grid.cols.max(1));
        let row = rng.gen_range(0..grid.rows.max(1));
        let jitter_x = (rng.gen::<f32>() - 0.5) * cell_w * spread;
        let jitter_y = (rng.gen::<f32>() - 0.5) * cell_h * spread;
        let rotation =
            if rng.gen_bool(rotation_probability) { Rotation::Quarter } else { Rotation::Upright };

        let mut glyph = DecorativeGlyph {
            text: text.to_owned(),
            font_size,
            font_family: config.font_family.clone(),
            col,
            row,
            jitter_x,
            jitter_y,
            rotation,
            left: 0.0,
            top: 0.0,
        };
        glyph.reposition(grid, canvas);
        glyphs.push(glyph);
    }

    debug!("scattered {} decorative glyphs", glyphs.len());
    glyphs
}

pub fn reposition_glyphs(glyphs: &mut [DecorativeGlyph], grid: &GridShape, canvas: CanvasSize) {
    for glyph in glyphs {
        glyph.reposition(grid, canvas);
    }
}
