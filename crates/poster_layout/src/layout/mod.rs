//! Placement of text modules and decorative glyphs on the grid.

pub mod fit;
pub mod overlay;
pub mod placement;
pub mod refit;
