use crate::foundation::core::{Canvas, Point, Point3};

/// Axis ranges of the plotted volume.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneBounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
    pub z: [f64; 2],
}

impl SceneBounds {
    /// `x, y ∈ [-3, 3]` (real and imaginary parts), `z ∈ [0, turns]`.
    pub fn for_turns(turns: u32) -> Self {
        Self {
            x: [-3.0, 3.0],
            y: [-3.0, 3.0],
            z: [0.0, f64::from(turns.max(1))],
        }
    }

    /// Map `p` into the unit cube `[-1, 1]^3`.
    pub fn normalize(&self, p: Point3) -> Point3 {
        fn unit(v: f64, [lo, hi]: [f64; 2]) -> f64 {
            let span = hi - lo;
            if span.abs() < f64::EPSILON {
                0.0
            } else {
                2.0 * (v - lo) / span - 1.0
            }
        }
        Point3::new(unit(p.x, self.x), unit(p.y, self.y), unit(p.z, self.z))
    }

    /// The 12 edges of the bounding box, in scene space.
    pub fn edges(&self) -> [(Point3, Point3); 12] {
        let [x0, x1] = self.x;
        let [y0, y1] = self.y;
        let [z0, z1] = self.z;
        let c = |x, y, z| Point3::new(x, y, z);
        [
            (c(x0, y0, z0), c(x1, y0, z0)),
            (c(x1, y0, z0), c(x1, y1, z0)),
            (c(x1, y1, z0), c(x0, y1, z0)),
            (c(x0, y1, z0), c(x0, y0, z0)),
            (c(x0, y0, z1), c(x1, y0, z1)),
            (c(x1, y0, z1), c(x1, y1, z1)),
            (c(x1, y1, z1), c(x0, y1, z1)),
            (c(x0, y1, z1), c(x0, y0, z1)),
            (c(x0, y0, z0), c(x0, y0, z1)),
            (c(x1, y0, z0), c(x1, y0, z1)),
            (c(x1, y1, z0), c(x1, y1, z1)),
            (c(x0, y1, z0), c(x0, y1, z1)),
        ]
    }
}

/// Orthographic camera orbiting the time axis.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Camera {
    /// Rotation about the time axis.
    pub azimuth_rad: f64,
    /// Tilt above the complex plane.
    pub elevation_rad: f64,
    /// Fraction of the shorter canvas side covered by the unit cube's half-diagonal.
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            azimuth_rad: std::f64::consts::FRAC_PI_4,
            elevation_rad: 0.6,
            zoom: 0.26,
        }
    }
}

impl Camera {
    pub fn project(&self, p: Point3, bounds: &SceneBounds, canvas: Canvas) -> Point {
        let n = bounds.normalize(p);

        // Rotate about z (azimuth), then tilt about the screen x axis (elevation).
        let (sin_a, cos_a) = self.azimuth_rad.sin_cos();
        let x1 = n.x * cos_a - n.y * sin_a;
        let y1 = n.x * sin_a + n.y * cos_a;

        let (sin_e, cos_e) = self.elevation_rad.sin_cos();
        let screen_up = n.z * cos_e + y1 * sin_e;

        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        let scale = self.zoom * w.min(h);
        Point::new(w * 0.5 + x1 * scale, h * 0.5 - screen_up * scale)
    }
}
