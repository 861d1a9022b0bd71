//! Text measurement capability used by the fitting loops.
//!
//! Placement and re-fit never look at pixels themselves; they ask a
//! [`TextMeasurer`] for the bounding box a piece of text would occupy under a
//! given style. A rendering backend can answer with real layout results, the
//! bundled [`MetricMeasurer`] answers from static width tables.

mod metrics;

pub use metrics::MetricMeasurer;

use crate::geometry::{Extent, Rotation};

/// Style a text element is measured with.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle<'a> {
    pub family: &'a str,
    /// Font weight on the 100–900 scale.
    pub weight: u16,
    pub font_size: u32,
    /// Wrapping width of the element box, padding included. `None` means no wrapping.
    pub max_width: Option<f32>,
    pub rotation: Rotation,
}

pub trait TextMeasurer {
    /// Bounding box of `text` rendered with `style`, rotation applied.
    ///
    /// Must be free of side effects so repeated calls agree.
    fn measure(&self, text: &str, style: &TextStyle<'_>) -> Extent;
}
