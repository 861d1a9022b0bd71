use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::PosterError;

/// Inclusive integer range as it appears in the config file (`{ min = 4, max = 12 }`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Range for sampling; an inverted pair collapses onto `min`.
    pub fn range(&self) -> RangeInclusive<u32> {
        self.min..=self.max.max(self.min)
    }
}

/// Grid catalog generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub squares: Bounds,
    pub rectangles: Bounds,
    /// Largest allowed `|cols - rows|` for rectangular grids.
    pub max_skew: u32,
    /// Largest allowed `cols * rows` for rectangular grids.
    pub max_cells: u32,
    /// Permute the catalog once after generation.
    pub shuffle: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            squares: Bounds::new(2, 20),
            rectangles: Bounds::new(2, 50),
            max_skew: 3,
            max_cells: 56,
            shuffle: true,
        }
    }
}

/// Parameters of the placement and re-fit engines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Upper bound on the number of columns or rows a module may span.
    pub max_span: u32,
    /// Padding subtracted from the span area before fitting, in px.
    pub cell_margin: f32,
    /// Smallest available width/height handed to the fitting loop, in px.
    pub min_available: f32,
    /// Starting font size range for a fresh placement.
    pub font_size: Bounds,
    /// Legibility floor; the shrink loop stops here.
    pub min_font_size: u32,
    /// Font size used when re-fitting an element with no usable size metadata.
    pub fallback_font_size: u32,
    /// Probability that a module is rotated by 90°.
    pub rotation_probability: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            max_span: 3,
            cell_margin: 8.0,
            min_available: 10.0,
            font_size: Bounds::new(18, 56),
            min_font_size: 8,
            fallback_font_size: 16,
            rotation_probability: 0.5,
        }
    }
}

/// Parameters of the decorative overlay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Probability that a generation pass emits an overlay at all.
    pub probability: f64,
    pub count: Bounds,
    pub font_size: Bounds,
    /// Maximum jitter as a fraction of the cell size, applied on both sides of the centre.
    pub jitter_fraction: f32,
    pub rotation_probability: f64,
    /// Text used when there are no modules to repeat.
    pub fallback_text: String,
    pub font_family: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            probability: 0.7,
            count: Bounds::new(4, 12),
            font_size: Bounds::new(8, 18),
            jitter_fraction: 0.1,
            rotation_probability: 0.2,
            fallback_text: String::from("repeat"),
            font_family: String::from("Arial Black, sans-serif"),
        }
    }
}

/// Initial canvas size and the bounds of the aspect-locked resize handle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
    pub min_width: f32,
    pub min_height: f32,
    /// Height / width ratio kept while dragging the resize handle.
    pub aspect: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self { width: 300.0, height: 450.0, min_width: 100.0, min_height: 150.0, aspect: 1.5 }
    }
}

/// Every tunable of the layout pipeline.
///
/// All sections are optional in the TOML file; anything left out keeps its default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub grid: GridConfig,
    pub placement: PlacementConfig,
    pub overlay: OverlayConfig,
    pub canvas: CanvasConfig,
    /// Font families to draw from. Empty means the built-in list.
    pub fonts: Vec<String>,
}

impl LayoutConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PosterError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        debug!("loaded layout config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, PosterError> {
        let config: Self = toml::from_str(contents)?;
        config.check_finite()?;
        Ok(config)
    }

    /// Rejects `nan` and `inf`, which TOML accepts for any float setting.
    fn check_finite(&self) -> Result<(), PosterError> {
        let settings = [
            ("placement.cell_margin", f64::from(self.placement.cell_margin)),
            ("placement.min_available", f64::from(self.placement.min_available)),
            ("placement.rotation_probability", self.placement.rotation_probability),
            ("overlay.probability", self.overlay.probability),
            ("overlay.jitter_fraction", f64::from(self.overlay.jitter_fraction)),
            ("overlay.rotation_probability", self.overlay.rotation_probability),
            ("canvas.width", f64::from(self.canvas.width)),
            ("canvas.height", f64::from(self.canvas.height)),
            ("canvas.min_width", f64::from(self.canvas.min_width)),
            ("canvas.min_height", f64::from(self.canvas.min_height)),
            ("canvas.aspect", f64::from(self.canvas.aspect)),
        ];

        match settings.into_iter().find(|(_, value)| !value.is_finite()) {
            Some((name, value)) => Err(PosterError::NonFiniteSetting { name, value }),
            None => Ok(()),
        }
    }
}
