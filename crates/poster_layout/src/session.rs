//! Poster session: the canvas state and display list of one editing session.
//!
//! A generation pass runs `modules validated → grid chosen → grid drawn →
//! modules placed → modules fitted → glyphs placed → glyphs positioned`. A
//! resize re-enters after the grid is chosen and only re-fits from stored
//! metadata, so the random choices of the last generation are kept.

use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::font::FontCatalog;
use crate::catalog::grid::{GridCatalog, GridShape};
use crate::config::{CanvasConfig, LayoutConfig};
use crate::geometry::CanvasSize;
use crate::layout::overlay::{self, DecorativeGlyph};
use crate::layout::placement::{PlacedModule, PlacementEngine};
use crate::layout::refit;
use crate::measure::TextMeasurer;
use crate::modules::{self, ModuleInput, TextModule};
use crate::PosterError;

/// Catalog index selected before the first generation.
const INITIAL_GRID_INDEX: usize = 2;

/// Current canvas size and grid selection.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasState {
    pub size: CanvasSize,
    pub grid_index: usize,
    pub grid: GridShape,
}

/// Serializable snapshot of a session's display list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PosterLayout {
    pub canvas: CanvasSize,
    #[serde(default)]
    pub grid_index: usize,
    pub grid: GridShape,
    #[serde(default)]
    pub modules: Vec<PlacedModule>,
    #[serde(default)]
    pub glyphs: Vec<DecorativeGlyph>,
}

impl PosterLayout {
    /// Grid lines as `(vertical x offsets, horizontal y offsets)`.
    pub fn grid_lines(&self) -> (Vec<f32>, Vec<f32>) {
        (
            self.grid.column_lines(self.canvas.width).collect(),
            self.grid.row_lines(self.canvas.height).collect(),
        )
    }
}

/// Canvas size produced by dragging the resize handle to `width`.
///
/// The height follows the configured aspect ratio; both axes are clamped to
/// the configured minimum and, when given, to the surrounding container.
pub fn drag_size(width: f32, container: Option<CanvasSize>, config: &CanvasConfig) -> CanvasSize {
    let max_width = container.map_or(f32::INFINITY, |c| c.width);
    let max_height = container.map_or(f32::INFINITY, |c| c.height);

    let height = width * config.aspect;
    let width = width.min(max_width).max(config.min_width);
    let height = height.min(max_height).max(config.min_height);

    CanvasSize::new(width, height)
}

pub struct PosterSession {
    config: LayoutConfig,
    grids: GridCatalog,
    fonts: FontCatalog,
    canvas: CanvasState,
    modules: Vec<PlacedModule>,
    glyphs: Vec<DecorativeGlyph>,
}

impl PosterSession {
    /// Builds the catalogs from `config` and selects the initial grid.
    pub fn new<R: Rng + ?Sized>(config: LayoutConfig, rng: &mut R) -> Self {
        let grids = GridCatalog::from_config(&config.grid, rng);
        Self::with_catalog(config, grids)
    }

    pub fn with_catalog(config: LayoutConfig, grids: GridCatalog) -> Self {
        let fonts = FontCatalog::from_families(&config.fonts);
        let (grid_index, grid) = match grids.get(INITIAL_GRID_INDEX) {
            Some(grid) => (INITIAL_GRID_INDEX, grid.clone()),
            None => (INITIAL_GRID_INDEX, GridShape::fallback()),
        };
        let size = CanvasSize::new(config.canvas.width, config.canvas.height);

        Self {
            config,
            grids,
            fonts,
            canvas: CanvasState { size, grid_index, grid },
            modules: Vec::new(),
            glyphs: Vec::new(),
        }
    }

    /// Resumes a stored layout; its grid and size become the current state.
    ///
    /// The catalog is rebuilt, so the grid index is looked up again in the new
    /// order. A grid the catalog does not know keeps its stored index.
    pub fn restore<R: Rng + ?Sized>(
        config: LayoutConfig,
        layout: PosterLayout,
        rng: &mut R,
    ) -> Result<Self, PosterError> {
        check_canvas(layout.canvas)?;

        let mut session = Self::new(config, rng);
        let grid_index = match session.grids.position(&layout.grid) {
            Some(index) => index,
            None => {
                debug!("{} is not in the grid catalog", layout.grid.name);
                layout.grid_index
            },
        };
        session.canvas = CanvasState { size: layout.canvas, grid_index, grid: layout.grid };
        session.modules = layout.modules;
        session.glyphs = layout.glyphs;
        Ok(session)
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    pub fn grids(&self) -> &GridCatalog {
        &self.grids
    }

    pub fn modules(&self) -> &[PlacedModule] {
        &self.modules
    }

    pub fn glyphs(&self) -> &[DecorativeGlyph] {
        &self.glyphs
    }

    pub fn layout(&self) -> PosterLayout {
        PosterLayout {
            canvas: self.canvas.size,
            grid_index: self.canvas.grid_index,
            grid: self.canvas.grid.clone(),
            modules: self.modules.clone(),
            glyphs: self.glyphs.clone(),
        }
    }

    /// Sets the canvas size without re-fitting; used before the first generation.
    pub fn set_size(&mut self, size: CanvasSize) -> Result<(), PosterError> {
        check_canvas(size)?;
        self.canvas.size = size;
        Ok(())
    }

    /// Switches to a uniformly chosen catalog grid. An empty catalog keeps the current one.
    pub fn pick_random_grid<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        match self.grids.pick(rng) {
            Some((index, grid)) => {
                self.canvas.grid_index = index;
                self.canvas.grid = grid.clone();
            },
            None => warn!("grid catalog is empty, keeping {}", self.canvas.grid.name),
        }
    }

    /// Runs a full generation pass and returns the resulting layout.
    ///
    /// The previous display list is discarded first, even when the input is
    /// rejected.
    pub fn generate<M, R>(
        &mut self,
        input: &ModuleInput,
        measurer: &M,
        rng: &mut R,
    ) -> Result<PosterLayout, PosterError>
    where
        M: TextMeasurer + ?Sized,
        R: Rng + ?Sized,
    {
        self.modules.clear();
        self.glyphs.clear();

        let text_modules = modules::read_modules(input)?;
        debug!("validated {} modules", text_modules.len());

        self.pick_random_grid(rng);
        let size = self.canvas.size;
        let grid = &self.canvas.grid;
        debug!(
            "grid {} ({}x{}) on {}x{}px",
            grid.name, grid.cols, grid.rows, size.width, size.height
        );

        let engine = PlacementEngine::new(&self.config.placement, &self.fonts);
        self.modules = text_modules
            .iter()
            .map(|module| engine.place(module, grid, size, measurer, rng))
            .collect();

        self.refit_modules(measurer);
        self.reposition_glyphs();

        if rng.gen_bool(self.config.overlay.probability.clamp(0.0, 1.0)) {
            self.glyphs = self.scatter(&text_modules, rng);
        }
        self.reposition_glyphs();

        info!(
            "generated poster on {} with {} modules and {} glyphs",
            self.canvas.grid.name,
            self.modules.len(),
            self.glyphs.len()
        );
        Ok(self.layout())
    }

    /// Adapts the display list to a new canvas size without new random choices.
    pub fn resize<M: TextMeasurer + ?Sized>(
        &mut self,
        size: CanvasSize,
        measurer: &M,
    ) -> Result<(), PosterError> {
        check_canvas(size)?;
        self.canvas.size = size;
        debug!("resized canvas to {}x{}px", size.width, size.height);

        self.refit_modules(measurer);
        self.reposition_glyphs();
        Ok(())
    }

    /// Resize driven by the aspect-locked resize handle.
    pub fn resize_from_drag<M: TextMeasurer + ?Sized>(
        &mut self,
        width: f32,
        container: Option<CanvasSize>,
        measurer: &M,
    ) -> Result<CanvasSize, PosterError> {
        let size = drag_size(width, container, &self.config.canvas);
        self.resize(size, measurer)?;
        Ok(size)
    }

    fn scatter<R: Rng + ?Sized>(
        &self,
        text_modules: &[TextModule],
        rng: &mut R,
    ) -> Vec<DecorativeGlyph> {
        overlay::scatter_glyphs(
            text_modules,
            &self.canvas.grid,
            self.canvas.size,
            &self.config.overlay,
            rng,
        )
    }

    fn refit_modules<M: TextMeasurer + ?Sized>(&mut self, measurer: &M) {
        for placed in &mut self.modules {
            refit::refit_module(
                placed,
                &self.canvas.grid,
                self.canvas.size,
                &self.config.placement,
                measurer,
            );
        }
    }

    fn reposition_glyphs(&mut self) {
        overlay::reposition_glyphs(&mut self.glyphs, &self.canvas.grid, self.canvas.size);
    }
}

fn check_canvas(size: CanvasSize) -> Result<(), PosterError> {
    if size.is_valid() {
        Ok(())
    } else {
        Err(PosterError::InvalidCanvas { width: size.width, height: size.height })
    }
}
