use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GridConfig;

/// Column/row division of the canvas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub name: String,
    pub cols: u32,
    pub rows: u32,
}

impl GridShape {
    pub fn new(name: impl Into<String>, cols: u32, rows: u32) -> Self {
        Self { name: name.into(), cols, rows }
    }

    pub fn square(n: u32) -> Self {
        Self::new(format!("Square {n}×{n}"), n, n)
    }

    pub fn rect(cols: u32, rows: u32) -> Self {
        Self::new(format!("Grid {cols}×{rows}"), cols, rows)
    }

    /// Shape used when no catalog entry is available.
    pub fn fallback() -> Self {
        Self::rect(4, 6)
    }

    /// Size of a single cell for a canvas of `width` × `height` px.
    pub fn cell_size(&self, width: f32, height: f32) -> (f32, f32) {
        (width / self.cols.max(1) as f32, height / self.rows.max(1) as f32)
    }

    /// X offsets of the interior vertical grid lines.
    pub fn column_lines(&self, width: f32) -> impl Iterator<Item = f32> + '_ {
        let cols = self.cols.max(1);
        (1..cols).map(move |i| i as f32 * width / cols as f32)
    }

    /// Y offsets of the interior horizontal grid lines.
    pub fn row_lines(&self, height: f32) -> impl Iterator<Item = f32> + '_ {
        let rows = self.rows.max(1);
        (1..rows).map(move |i| i as f32 * height / rows as f32)
    }
}

/// One square grid per `n` in `min..=max`.
pub fn generate_square_grids(min: u32, max: u32) -> Vec<GridShape> {
    (min..=max).map(GridShape::square).collect()
}

/// Every off-diagonal `(cols, rows)` pair in `[min, max]²` accepted by `filter`.
///
/// Pairs are visited with columns in the outer loop.
pub fn generate_rect_grids<F>(min: u32, max: u32, mut filter: F) -> Vec<GridShape>
where
    F: FnMut(u32, u32) -> bool,
{
    let mut out = Vec::new();
    for cols in min..=max {
        for rows in min..=max {
            if cols == rows || !filter(cols, rows) {
                continue;
            }
            out.push(GridShape::rect(cols, rows));
        }
    }
    out
}

/// Keeps shapes whose aspect skew and total cell count stay legible.
pub fn default_rect_filter(max_skew: u32, max_cells: u32) -> impl Fn(u32, u32) -> bool {
    move |cols, rows| cols.abs_diff(rows) <= max_skew && cols.saturating_mul(rows) <= max_cells
}

#[derive(Clone, Debug, Default)]
pub struct GridCatalog {
    shapes: Vec<GridShape>,
}

impl GridCatalog {
    pub fn new(shapes: Vec<GridShape>) -> Self {
        Self { shapes }
    }

    /// Squares followed by filtered rectangles, shuffled once when configured.
    pub fn from_config<R: Rng + ?Sized>(config: &GridConfig, rng: &mut R) -> Self {
        let mut shapes = generate_square_grids(config.squares.min, config.squares.max);
        shapes.extend(generate_rect_grids(
            config.rectangles.min,
            config.rectangles.max,
            default_rect_filter(config.max_skew, config.max_cells),
        ));

        let mut catalog = Self::new(shapes);
        if config.shuffle {
            catalog.shuffle(rng);
        }

        debug!("grid catalog holds {} shapes (shuffled: {})", catalog.len(), config.shuffle);
        catalog
    }

    /// Uniform Fisher–Yates permutation.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.shapes.shuffle(rng);
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn get(&self, index: usize) -> Option<&GridShape> {
        self.shapes.get(index)
    }

    pub fn shapes(&self) -> &[GridShape] {
        &self.shapes
    }

    /// Index of the first entry with the same dimensions as `grid`.
    pub fn position(&self, grid: &GridShape) -> Option<usize> {
        self.shapes.iter().position(|shape| shape.cols == grid.cols && shape.rows == grid.rows)
    }

    /// Uniformly chosen index and shape, or `None` for an empty catalog.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(usize, &GridShape)> {
        if self.shapes.is_empty() {
            return None;
        }

        let index = rng.gen_range(0..self.shapes.len());
        Some((index, &self.shapes[index]))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::config::Bounds;

    fn dims(shapes: &[GridShape]) -> Vec<(u32, u32)> {
        shapes.iter().map(|shape| (shape.cols, shape.rows)).collect()
    }

    #[test]
    fn squares_in_order() {
        let shapes = generate_square_grids(2, 5);
        assert_eq!(dims(&shapes), vec![(2, 2), (3, 3), (4, 4), (5, 5)]);
        assert_eq!(shapes[0].name, "Square 2×2");
    }

    #[test]
    fn unfiltered_rects_are_off_diagonal_pairs() {
        let shapes = generate_rect_grids(2, 4, |_, _| true);
        assert_eq!(dims(&shapes), vec![(2, 3), (2, 4), (3, 2), (3, 4), (4, 2), (4, 3)]);
        assert_eq!(shapes[0].name, "Grid 2×3");
    }

    #[test]
    fn inverted_bounds_produce_nothing() {
        assert!(generate_square_grids(5, 2).is_empty());
        assert!(generate_rect_grids(5, 2, |_, _| true).is_empty());
    }

    #[test]
    fn default_filter_bounds_skew_and_area() {
        let shapes = generate_rect_grids(2, 50, default_rect_filter(3, 56));
        assert!(!shapes.is_empty());
        for shape in &shapes {
            assert!(shape.cols.abs_diff(shape.rows) <= 3);
            assert!(shape.cols * shape.rows <= 56);
        }
        assert!(dims(&shapes).contains(&(7, 8)));
        assert!(!dims(&shapes).contains(&(2, 6)));
        assert!(!dims(&shapes).contains(&(8, 9)));
    }

    #[test]
    fn default_filter_survives_huge_dimensions() {
        let keep = default_rect_filter(u32::MAX, 56);
        assert!(!keep(u32::MAX, 2));
        assert!(!keep(70_000, 70_000));
        assert!(keep(7, 8));
    }

    #[test]
    fn position_finds_shape_by_dimensions() {
        let catalog = GridCatalog::new(generate_square_grids(2, 6));
        assert_eq!(catalog.position(&GridShape::new("four", 4, 4)), Some(2));
        assert_eq!(catalog.position(&GridShape::rect(4, 5)), None);
    }

    #[test]
    fn shuffle_keeps_the_same_shapes() {
        let config = GridConfig { shuffle: false, ..GridConfig::default() };
        let mut rng = StdRng::seed_from_u64(7);
        let ordered = GridCatalog::from_config(&config, &mut rng);
        let shuffled =
            GridCatalog::from_config(&GridConfig { shuffle: true, ..config.clone() }, &mut rng);

        assert_eq!(ordered.len(), shuffled.len());
        let mut a = dims(ordered.shapes());
        let mut b = dims(shuffled.shapes());
        assert_ne!(a, b);
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn pick_from_empty_catalog() {
        let mut rng = StdRng::seed_from_u64(1);
        let catalog = GridCatalog::from_config(
            &GridConfig {
                squares: Bounds::new(3, 2),
                rectangles: Bounds::new(3, 2),
                ..GridConfig::default()
            },
            &mut rng,
        );
        assert!(catalog.is_empty());
        assert!(catalog.pick(&mut rng).is_none());
    }

    #[test]
    fn pick_returns_matching_index() {
        let mut rng = StdRng::seed_from_u64(3);
        let catalog = GridCatalog::new(generate_square_grids(2, 9));
        for _ in 0..32 {
            let (index, shape) = catalog.pick(&mut rng).unwrap();
            assert_eq!(catalog.get(index), Some(shape));
        }
    }

    #[test]
    fn grid_lines_split_the_canvas() {
        let shape = GridShape::rect(3, 2);
        let cols: Vec<f32> = shape.column_lines(300.0).collect();
        let rows: Vec<f32> = shape.row_lines(450.0).collect();
        assert_eq!(cols, vec![100.0, 200.0]);
        assert_eq!(rows, vec![225.0]);
        assert_eq!(shape.cell_size(300.0, 450.0), (100.0, 225.0));
    }
}
