pub mod catalog;
pub mod config;
pub mod geometry;
pub mod layout;
mod lenient;
pub mod measure;
pub mod modules;
pub mod session;

pub use catalog::{
    font::FontCatalog,
    grid::{default_rect_filter, generate_rect_grids, generate_square_grids, GridCatalog, GridShape},
};
pub use config::LayoutConfig;
pub use geometry::{CanvasSize, Extent, Rect, Rotation};
pub use layout::{
    fit::Placement,
    overlay::DecorativeGlyph,
    placement::{PlacedModule, PlacementEngine},
};
pub use measure::{MetricMeasurer, TextMeasurer, TextStyle};
pub use modules::{read_modules, ModuleInput, ModuleKey, TextModule};
pub use session::{drag_size, CanvasState, PosterLayout, PosterSession};

#[derive(Debug, thiserror::Error)]
pub enum PosterError {
    #[error("at least one text field must be filled in")]
    NoModules,
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid layout config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("layout setting `{name}` must be a finite number, got {value}")]
    NonFiniteSetting { name: &'static str, value: f64 },
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },
}
