use std::f64::consts::TAU;

use crate::foundation::{core::Point3, math::linspace};

/// Number of orbiting bodies around the time spiral.
pub const BODY_COUNT: usize = 3;

/// Time and angle axes, paired index-for-index.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SampledAxes {
    /// `[0, turns]`, inclusive.
    pub time: Vec<f64>,
    /// `[0, 2π * turns]`, inclusive.
    pub angle: Vec<f64>,
}

impl SampledAxes {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

pub fn sample_axes(turns: u32, total_points: usize) -> SampledAxes {
    let turns = f64::from(turns);
    SampledAxes {
        time: linspace(0.0, turns, total_points),
        angle: linspace(0.0, TAU * turns, total_points),
    }
}

/// Orbit geometry for body `index` (1-based).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Body {
    pub index: usize,
    pub radius: f64,
    /// Angular speed relative to the time spiral.
    pub speed: f64,
}

impl Body {
    pub fn new(index: usize, offset_factor: f64) -> Self {
        let j = index as f64;
        Self {
            index,
            radius: offset_factor * j,
            speed: 1.0 / j,
        }
    }

    pub fn label(&self) -> String {
        format!("Planet {}", self.index)
    }

    pub fn position(&self, angle: f64, time: f64) -> Point3 {
        let (sin, cos) = (self.speed * angle).sin_cos();
        Point3::new(self.radius * cos, self.radius * sin, time)
    }
}

pub fn bodies(offset_factor: f64) -> [Body; BODY_COUNT] {
    std::array::from_fn(|i| Body::new(i + 1, offset_factor))
}

/// A sampled polyline with the geometry it was generated from.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Curve {
    pub label: String,
    pub radius: f64,
    pub speed: f64,
    pub points: Vec<Point3>,
}

impl Curve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn prefix(&self, len: usize) -> &[Point3] {
        &self.points[..len.min(self.points.len())]
    }
}

pub const TIME_SPIRAL_LABEL: &str = "Time Spiral";

/// The degenerate radius-0 curve running up the time axis.
pub fn central_curve(axes: &SampledAxes) -> Curve {
    Curve {
        label: TIME_SPIRAL_LABEL.to_string(),
        radius: 0.0,
        speed: 0.0,
        points: axes.time.iter().map(|&t| Point3::new(0.0, 0.0, t)).collect(),
    }
}

pub fn orbit_curve(axes: &SampledAxes, body: &Body) -> Curve {
    Curve {
        label: body.label(),
        radius: body.radius,
        speed: body.speed,
        points: axes
            .angle
            .iter()
            .zip(&axes.time)
            .map(|(&a, &t)| body.position(a, t))
            .collect(),
    }
}
