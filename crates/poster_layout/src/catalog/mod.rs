pub mod font;
pub mod grid;
