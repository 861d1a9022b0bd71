use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::fit::{self, FitRequest, Placement};
use crate::catalog::font::{FontCatalog, FALLBACK_FAMILY};
use crate::catalog::grid::GridShape;
use crate::config::PlacementConfig;
use crate::geometry::{CanvasSize, Rect, Rotation};
use crate::lenient;
use crate::measure::TextMeasurer;
use crate::modules::TextModule;

fn fallback_family() -> String {
    String::from(FALLBACK_FAMILY)
}

/// Display-list entry of a primary text module.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedModule {
    pub module: TextModule,
    #[serde(default = "fallback_family")]
    pub font_family: String,
    #[serde(default, deserialize_with = "lenient::placement")]
    pub placement: Placement,
    /// Size the element is currently rendered at.
    #[serde(default, deserialize_with = "lenient::font_size")]
    pub font_size: Option<u32>,
    /// Current box on the canvas, rotation applied.
    #[serde(default)]
    pub bounds: Rect,
}

/// Chooses span, position, rotation and font size for fresh modules.
pub struct PlacementEngine<'a> {
    config: &'a PlacementConfig,
    fonts: &'a FontCatalog,
}

impl<'a> PlacementEngine<'a> {
    pub fn new(config: &'a PlacementConfig, fonts: &'a FontCatalog) -> Self {
        Self { config, fonts }
    }

    /// Random span and position that stay inside `grid`, plus a random rotation.
    pub fn choose_placement<R: Rng + ?Sized>(&self, grid: &GridShape, rng: &mut R) -> Placement {
        let max_span = self.config.max_span.max(1);
        let span_cols = rng.gen_range(1..=max_span.min(grid.cols).max(1));
        let span_rows = rng.gen_range(1..=max_span.min(grid.rows).max(1));

        let start_col = rng.gen_range(0..=grid.cols.saturating_sub(span_cols));
        let start_row = rng.gen_range(0..=grid.rows.saturating_sub(span_rows));

        let rotation = if rng.gen_bool(self.config.rotation_probability.clamp(0.0, 1.0)) {
            Rotation::Quarter
        } else {
            Rotation::Upright
        };

        Placement { start_col, start_row, span_cols, span_rows, rotation, base_font_size: None }
    }

    /// Places `module` on `grid` and fits it from a random starting size.
    pub fn place<M, R>(
        &self,
        module: &TextModule,
        grid: &GridShape,
        canvas: CanvasSize,
        measurer: &M,
        rng: &mut R,
    ) -> PlacedModule
    where
        M: TextMeasurer + ?Sized,
        R: Rng + ?Sized,
    {
        let font_family = self.fonts.random_font(rng).to_owned();
        let mut placement = self.choose_placement(grid, rng);
        let start = rng.gen_range(self.config.font_size.range());

        let area = fit::available_area(&placement, grid, canvas, self.config);
        let request = FitRequest {
            text: &module.value,
            family: &font_family,
            weight: module.weight,
            rotation: placement.rotation,
        };
        let fitted = fit::shrink_to_fit(measurer, request, area, start, self.config.min_font_size);
        placement.base_font_size = Some(fitted.font_size);

        let bounds = fit::center_in_span(&placement, grid, canvas, fitted.extent);

        debug!(
            "placed {} at col {} row {} span {}x{} rot {} size {}->{}px",
            module.key,
            placement.start_col,
            placement.start_row,
            placement.span_cols,
            placement.span_rows,
            placement.rotation.degrees(),
            start,
            fitted.font_size
        );

        PlacedModule {
            module: module.clone(),
            font_family,
            placement,
            font_size: Some(fitted.font_size),
            bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::measure::MetricMeasurer;
    use crate::modules::ModuleKey;

    #[test]
    fn spans_stay_inside_every_grid() {
        let config = PlacementConfig::default();
        let fonts = FontCatalog::default();
        let engine = PlacementEngine::new(&config, &fonts);
        let mut rng = StdRng::seed_from_u64(21);

        for (cols, rows) in [(2, 2), (2, 5), (4, 4), (7, 3), (20, 20)] {
            let grid = GridShape::rect(cols, rows);
            for _ in 0..200 {
                let placement = engine.choose_placement(&grid, &mut rng);
                assert!(placement.is_contained_in(&grid), "{placement:?} escapes {cols}x{rows}");
                assert!((1..=cols.min(3)).contains(&placement.span_cols));
                assert!((1..=rows.min(3)).contains(&placement.span_rows));
            }
        }
    }

    #[test]
    fn both_rotations_occur() {
        let config = PlacementConfig::default();
        let fonts = FontCatalog::default();
        let engine = PlacementEngine::new(&config, &fonts);
        let mut rng = StdRng::seed_from_u64(5);
        let grid = GridShape::square(4);

        let quarter = (0..400)
            .filter(|_| engine.choose_placement(&grid, &mut rng).rotation.is_quarter())
            .count();
        assert!((100..300).contains(&quarter), "{quarter} quarter turns out of 400");
    }

    #[test]
    fn placed_font_respects_floor_and_start_range() {
        let config = PlacementConfig::default();
        let fonts = FontCatalog::default();
        let engine = PlacementEngine::new(&config, &fonts);
        let measurer = MetricMeasurer::default();
        let mut rng = StdRng::seed_from_u64(99);
        let grid = GridShape::square(10);
        let canvas = CanvasSize::new(100.0, 150.0);
        let module = TextModule::new(
            ModuleKey::Info,
            "an unreasonably long line of information text that cannot possibly fit",
        );

        for _ in 0..50 {
            let placed = engine.place(&module, &grid, canvas, &measurer, &mut rng);
            let size = placed.font_size.unwrap();
            assert!((8..=56).contains(&size));
            assert_eq!(placed.placement.base_font_size, Some(size));
            assert!(fonts.families().contains(&placed.font_family));
        }
    }

    #[test]
    fn placed_module_is_centred_in_its_span() {
        let config = PlacementConfig::default();
        let fonts = FontCatalog::default();
        let engine = PlacementEngine::new(&config, &fonts);
        let measurer = MetricMeasurer::default();
        let mut rng = StdRng::seed_from_u64(8);
        let grid = GridShape::square(3);
        let canvas = CanvasSize::new(300.0, 300.0);
        let module = TextModule::new(ModuleKey::Date, "1.5.");

        for _ in 0..50 {
            let placed = engine.place(&module, &grid, canvas, &measurer, &mut rng);
            let p = placed.placement;
            let block_left = p.start_col as f32 * 100.0;
            let block_right = (p.start_col + p.span_cols) as f32 * 100.0;
            let centre = placed.bounds.left + placed.bounds.width / 2.0;
            assert!((centre - (block_left + block_right) / 2.0).abs() <= 1.0);
            assert!(placed.bounds.left >= block_left && placed.bounds.right() <= block_right + 0.5);
        }
    }
}
