//! Geometry shared by fresh placement and re-fit: the area a span offers, the
//! shrink-to-fit loop, and centring inside the span.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalog::grid::GridShape;
use crate::config::PlacementConfig;
use crate::geometry::{CanvasSize, Extent, Rect, Rotation};
use crate::lenient;
use crate::measure::{TextMeasurer, TextStyle};

/// Durable placement metadata of a module.
///
/// Fields missing from or unreadable in a stored layout fall back to a 1×1
/// upright span at the origin with no recorded font size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    #[serde(deserialize_with = "lenient::offset")]
    pub start_col: u32,
    #[serde(deserialize_with = "lenient::offset")]
    pub start_row: u32,
    #[serde(deserialize_with = "lenient::span")]
    pub span_cols: u32,
    #[serde(deserialize_with = "lenient::span")]
    pub span_rows: u32,
    pub rotation: Rotation,
    /// Font size the last fit settled on, the starting point of the next re-fit.
    #[serde(deserialize_with = "lenient::font_size")]
    pub base_font_size: Option<u32>,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            start_col: 0,
            start_row: 0,
            span_cols: 1,
            span_rows: 1,
            rotation: Rotation::Upright,
            base_font_size: None,
        }
    }
}

impl Placement {
    /// Whether the span lies entirely inside `grid`.
    pub fn is_contained_in(&self, grid: &GridShape) -> bool {
        self.start_col + self.span_cols <= grid.cols && self.start_row + self.span_rows <= grid.rows
    }

    /// Spans are at least one cell even when the stored value says otherwise.
    fn spans(&self) -> (u32, u32) {
        (self.span_cols.max(1), self.span_rows.max(1))
    }
}

/// Area the text has to fit into, in the text's own flow direction.
///
/// A quarter-turned module flows along the span's height, so the axes are
/// exchanged before fitting.
pub fn available_area(
    placement: &Placement,
    grid: &GridShape,
    canvas: CanvasSize,
    config: &PlacementConfig,
) -> Extent {
    let (cell_w, cell_h) = grid.cell_size(canvas.width, canvas.height);
    let (span_cols, span_rows) = placement.spans();

    let width = ((span_cols as f32 * cell_w).floor() - config.cell_margin).max(config.min_available);
    let height =
        ((span_rows as f32 * cell_h).floor() - config.cell_margin).max(config.min_available);

    Extent::new(width, height).rotated(placement.rotation)
}

/// Result of the shrink-to-fit loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fitted {
    pub font_size: u32,
    /// Measured box on the canvas, rotation applied.
    pub extent: Extent,
}

/// Text and style inputs of one fit.
#[derive(Clone, Copy, Debug)]
pub struct FitRequest<'a> {
    pub text: &'a str,
    pub family: &'a str,
    pub weight: u16,
    pub rotation: Rotation,
}

/// Lowers the font size one px at a time from `start` until the measured box,
/// rotation applied, fits `area` or the size reaches `min_font_size`.
///
/// `area` is the already swapped area of [`available_area`]. Below the floor
/// the text is left to overflow.
pub fn shrink_to_fit<M: TextMeasurer + ?Sized>(
    measurer: &M,
    request: FitRequest<'_>,
    area: Extent,
    start: u32,
    min_font_size: u32,
) -> Fitted {
    let mut style = TextStyle {
        family: request.family,
        weight: request.weight,
        font_size: start,
        max_width: Some(area.width),
        rotation: request.rotation,
    };

    let mut extent = measurer.measure(request.text, &style);
    while !extent.fits_within(&area) && style.font_size > min_font_size {
        style.font_size -= 1;
        extent = measurer.measure(request.text, &style);
    }

    if !extent.fits_within(&area) {
        debug!(
            "{:?} overflows {:.0}x{:.0} at the minimum font size {}",
            request.text, area.width, area.height, style.font_size
        );
    }

    Fitted { font_size: style.font_size, extent }
}

/// Box of `extent` centred on the span's cell block, rounded to whole px and
/// kept off the negative side of the canvas.
pub fn center_in_span(
    placement: &Placement,
    grid: &GridShape,
    canvas: CanvasSize,
    extent: Extent,
) -> Rect {
    let (cell_w, cell_h) = grid.cell_size(canvas.width, canvas.height);
    let (span_cols, span_rows) = placement.spans();

    let left = placement.start_col as f32 * cell_w + (span_cols as f32 * cell_w - extent.width) / 2.0;
    let top = placement.start_row as f32 * cell_h + (span_rows as f32 * cell_h - extent.height) / 2.0;

    Rect {
        left: left.round().max(0.0),
        top: top.round().max(0.0),
        width: extent.width,
        height: extent.height,
    }
}
