use log::{debug, warn};

use super::fit::{self, FitRequest};
use super::placement::PlacedModule;
use crate::catalog::grid::GridShape;
use crate::config::PlacementConfig;
use crate::geometry::CanvasSize;
use crate::measure::TextMeasurer;

/// Re-fits a placed module to a new canvas size.
///
/// Span and rotation are reused as stored and the shrink loop starts from the
/// stored base size, so the result only depends on `(grid, canvas)`. The base
/// size itself is left untouched; growing the canvas again recovers it.
pub fn refit_module<M: TextMeasurer + ?Sized>(
    placed: &mut PlacedModule,
    grid: &GridShape,
    canvas: CanvasSize,
    config: &PlacementConfig,
    measurer: &M,
) {
    let base = match (placed.placement.base_font_size, placed.font_size) {
        (Some(base), _) => base,
        (None, Some(current)) => {
            debug!("{} has no base font size, starting from {current}px", placed.module.key);
            current
        },
        (None, None) => {
            warn!(
                "{} has no font size metadata, using {}px",
                placed.module.key, config.fallback_font_size
            );
            config.fallback_font_size
        },
    };
    let base = base.max(config.min_font_size);
    placed.placement.base_font_size = Some(base);

    let placement = placed.placement;
    let area = fit::available_area(&placement, grid, canvas, config);
    let request = FitRequest {
        text: &placed.module.value,
        family: &placed.font_family,
        weight: placed.module.weight,
        rotation: placement.rotation,
    };
    let fitted = fit::shrink_to_fit(measurer, request, area, base, config.min_font_size);

    placed.font_size = Some(fitted.font_size);
    placed.bounds = fit::center_in_span(&placement, grid, canvas, fitted.extent);
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::catalog::font::FontCatalog;
    use crate::layout::fit::Placement;
    use crate::layout::placement::PlacementEngine;
    use crate::measure::MetricMeasurer;
    use crate::modules::{ModuleKey, TextModule};

    fn placed(text: &str) -> PlacedModule {
        let config = PlacementConfig::default();
        let fonts = FontCatalog::default();
        let mut rng = StdRng::seed_from_u64(17);
        PlacementEngine::new(&config, &fonts).place(
            &TextModule::new(ModuleKey::Headline, text),
            &GridShape::square(4),
            CanvasSize::new(300.0, 450.0),
            &MetricMeasurer::default(),
            &mut rng,
        )
    }

    #[test]
    fn refit_is_idempotent() {
        let config = PlacementConfig::default();
        let measurer = MetricMeasurer::default();
        let grid = GridShape::square(4);
        let mut module = placed("OPEN AIR");

        for canvas in [CanvasSize::new(200.0, 300.0), CanvasSize::new(500.0, 750.0)] {
            refit_module(&mut module, &grid, canvas, &config, &measurer);
            let first = module.clone();
            refit_module(&mut module, &grid, canvas, &config, &measurer);
            assert_eq!(module, first);
        }
    }

    #[test]
    fn refit_at_original_size_reproduces_placement() {
        let config = PlacementConfig::default();
        let grid = GridShape::square(4);
        let original = placed("OPEN AIR");
        let mut module = original.clone();

        refit_module(
            &mut module,
            &grid,
            CanvasSize::new(300.0, 450.0),
            &config,
            &MetricMeasurer::default(),
        );
        assert_eq!(module, original);
    }

    #[test]
    fn shrinking_then_growing_restores_size() {
        let config = PlacementConfig::default();
        let measurer = MetricMeasurer::default();
        let grid = GridShape::square(4);
        let original = placed("CONCERT");
        let mut module = original.clone();

        refit_module(&mut module, &grid, CanvasSize::new(100.0, 150.0), &config, &measurer);
        assert!(module.font_size <= original.font_size);
        assert_eq!(module.placement, original.placement);

        refit_module(&mut module, &grid, CanvasSize::new(300.0, 450.0), &config, &measurer);
        assert_eq!(module.font_size, original.font_size);
    }

    #[test]
    fn missing_metadata_degrades_to_defaults() {
        let config = PlacementConfig::default();
        let mut module = PlacedModule {
            module: TextModule::new(ModuleKey::Sub, "x"),
            font_family: String::from("Arial, sans-serif"),
            placement: Placement::default(),
            font_size: None,
            bounds: Default::default(),
        };

        refit_module(
            &mut module,
            &GridShape::square(2),
            CanvasSize::new(300.0, 450.0),
            &config,
            &MetricMeasurer::default(),
        );

        assert_eq!(module.placement.base_font_size, Some(16));
        assert_eq!(module.font_size, Some(16));
        assert_eq!(module.placement.span_cols, 1);
    }

    #[test]
    fn base_below_floor_is_raised() {
        let config = PlacementConfig::default();
        let mut module = placed("A");
        module.placement.base_font_size = Some(3);

        refit_module(
            &mut module,
            &GridShape::square(4),
            CanvasSize::new(300.0, 450.0),
            &config,
            &MetricMeasurer::default(),
        );
        assert_eq!(module.font_size, Some(8));
    }
}
