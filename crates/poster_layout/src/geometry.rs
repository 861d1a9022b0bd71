use serde::{Deserialize, Deserializer, Serialize};

/// Rotation of a text element. Only the upright and quarter-turn states exist.
///
/// Serialized as degrees; anything other than `90` reads back as upright,
/// including values that are not numbers at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u16")]
pub enum Rotation {
    #[default]
    Upright,
    Quarter,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Upright => 0,
            Rotation::Quarter => 90,
        }
    }

    pub fn is_quarter(self) -> bool {
        self == Rotation::Quarter
    }
}

impl From<u16> for Rotation {
    fn from(degrees: u16) -> Self {
        if degrees == 90 {
            Rotation::Quarter
        } else {
            Rotation::Upright
        }
    }
}

impl<'de> Deserialize<'de> for Rotation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let degrees = crate::lenient::number(deserializer)?;
        Ok(if degrees == Some(90.0) { Rotation::Quarter } else { Rotation::Upright })
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Width and height of a box in px.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Bounding box after applying `rotation`; a quarter turn exchanges the axes.
    pub fn rotated(self, rotation: Rotation) -> Self {
        match rotation {
            Rotation::Upright => self,
            Rotation::Quarter => Self::new(self.height, self.width),
        }
    }

    pub fn fits_within(&self, other: &Extent) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

/// Axis-aligned box on the canvas, origin at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Pixel size of the poster canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}
