pub(crate) mod cpu;
pub(crate) mod pipeline;

use crate::{
    foundation::core::{Canvas, Rgba8},
    sample::BODY_COUNT,
    scene::Camera,
};

/// Rendered frame pixels, opaque RGBA8 row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRGBA {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i..i + 4).map(|s| [s[0], s[1], s[2], s[3]])
    }
}

/// Trace colors. Presentation only; nothing in the sampled data depends on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    pub background: Rgba8,
    pub bounds: Rgba8,
    pub time_spiral: Rgba8,
    pub orbits: [Rgba8; BODY_COUNT],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba8::opaque(18, 20, 28),
            bounds: Rgba8 {
                r: 160,
                g: 160,
                b: 170,
                a: 90,
            },
            time_spiral: Rgba8::opaque(0, 0, 255),
            orbits: [
                Rgba8::opaque(255, 0, 0),
                Rgba8::opaque(0, 128, 0),
                Rgba8::opaque(255, 165, 0),
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    pub canvas: Canvas,
    pub camera: Camera,
    pub palette: Palette,
    pub spiral_width: f64,
    pub orbit_width: f64,
    pub marker_radius: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            camera: Camera::default(),
            palette: Palette::default(),
            spiral_width: 4.0,
            orbit_width: 2.0,
            marker_radius: 4.0,
        }
    }
}

impl RenderSettings {
    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }
}

/// Turns one animation snapshot into opaque pixels.
pub trait FrameRenderer {
    fn render_view(
        &mut self,
        view: &crate::frames::FrameView<'_>,
        bounds: &crate::scene::SceneBounds,
    ) -> crate::foundation::error::SpiralResult<FrameRGBA>;

    /// Settings for the [`CpuRenderer`](cpu::CpuRenderer) workers used by parallel rendering.
    ///
    /// In parallel mode frames are drawn by one `CpuRenderer` per worker built from these
    /// settings, not by `self`. Only renderers whose output equals `CpuRenderer`'s should return
    /// `Some`; with the default `None`, parallel rendering fails instead of swapping renderers.
    fn worker_settings(&self) -> Option<RenderSettings> {
        None
    }
}
