use crate::foundation::error::{SpiralError, SpiralResult};

pub use kurbo::{Affine, BezPath, Point, Vec2};

/// A sample in scene space: `x`/`y` span the complex plane, `z` is time in turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Distance from the time axis (`x = y = 0`).
    pub fn radial(self) -> f64 {
        self.x.hypot(self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> SpiralResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    /// Rasterizer surfaces are `u16`-sized.
    pub fn validate(self) -> SpiralResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SpiralError::invalid_parameter(
                "canvas width/height must be non-zero",
            ));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(SpiralError::invalid_parameter(format!(
                "canvas {}x{} exceeds {}x{}",
                self.width,
                self.height,
                u16::MAX,
                u16::MAX
            )));
        }
        Ok(())
    }

    pub fn size_u16(self) -> SpiralResult<(u16, u16)> {
        self.validate()?;
        // validate() bounds both sides.
        Ok((self.width as u16, self.height as u16))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 640,
            height: 640,
        }
    }
}

/// Straight-alpha RGBA8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
