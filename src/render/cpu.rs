use vello_cpu::kurbo::Shape as _;

use crate::{
    foundation::{
        core::{BezPath, Point, Point3, Rgba8},
        error::{SpiralError, SpiralResult},
        math::mul_div255,
    },
    frames::FrameView,
    render::{FrameRGBA, FrameRenderer, RenderSettings},
    scene::SceneBounds,
};

/// Software rasterizer backed by `vello_cpu`.
pub struct CpuRenderer {
    settings: RenderSettings,
    surface: Option<CpuSurface>,
}

struct CpuSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl CpuRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            surface: None,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn ensure_surface(&mut self) -> SpiralResult<&mut CpuSurface> {
        let (width, height) = self.settings.canvas.size_u16()?;
        let reuse = matches!(&self.surface, Some(s) if s.width == width && s.height == height);
        if !reuse {
            self.surface = Some(CpuSurface {
                width,
                height,
                pixmap: vello_cpu::Pixmap::new(width, height),
            });
        }
        self.surface
            .as_mut()
            .ok_or_else(|| SpiralError::render("cpu surface missing after allocation"))
    }

    fn project_all(&self, points: &[Point3], bounds: &SceneBounds) -> Vec<Point> {
        let cam = self.settings.camera;
        let canvas = self.settings.canvas;
        points
            .iter()
            .map(|&p| cam.project(p, bounds, canvas))
            .collect()
    }
}

impl FrameRenderer for CpuRenderer {
    fn render_view(&mut self, view: &FrameView<'_>, bounds: &SceneBounds) -> SpiralResult<FrameRGBA> {
        let settings = self.settings.clone();
        let palette = settings.palette;

        let box_paths: Vec<BezPath> = bounds
            .edges()
            .iter()
            .map(|&(a, b)| polyline(&self.project_all(&[a, b], bounds)))
            .collect();
        let spiral = self.project_all(view.central, bounds);
        let orbits: Vec<Vec<Point>> = view
            .orbits
            .iter()
            .map(|o| self.project_all(o, bounds))
            .collect();

        let surface = self.ensure_surface()?;
        let (w, h) = (f64::from(surface.width), f64::from(surface.height));

        let mut ctx = vello_cpu::RenderContext::new(surface.width, surface.height);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        set_color(&mut ctx, palette.background);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));

        set_color(&mut ctx, palette.bounds);
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(1.0));
        for path in &box_paths {
            ctx.stroke_path(&bezpath_to_cpu(path));
        }

        set_color(&mut ctx, palette.time_spiral);
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(settings.spiral_width));
        ctx.stroke_path(&bezpath_to_cpu(&polyline(&spiral)));

        for (points, color) in orbits.iter().zip(palette.orbits) {
            set_color(&mut ctx, color);
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(settings.orbit_width));
            ctx.stroke_path(&bezpath_to_cpu(&polyline(points)));
            for &p in points {
                let marker = vello_cpu::kurbo::Circle::new(point_to_cpu(p), settings.marker_radius);
                ctx.fill_path(&marker.to_path(0.1));
            }
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut surface.pixmap);

        let mut data = surface.pixmap.data_as_u8_slice().to_vec();
        flatten_onto(&mut data, palette.background);

        Ok(FrameRGBA {
            width: u32::from(surface.width),
            height: u32::from(surface.height),
            data,
        })
    }

    fn worker_settings(&self) -> Option<RenderSettings> {
        Some(self.settings.clone())
    }
}

/// Open polyline through `points`; empty input gives an empty path.
pub fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(&first) = iter.next() {
        path.move_to(first);
        for &p in iter {
            path.line_to(p);
        }
    }
    path
}

/// Composite premultiplied pixels over `bg` in place, leaving every pixel opaque.
///
/// Antialiased strokes in the u8 pipeline can leave coverage just below 255 even over the
/// filled background.
fn flatten_onto(data: &mut [u8], bg: Rgba8) {
    for px in data.chunks_exact_mut(4) {
        let inv = 255 - u16::from(px[3]);
        if inv == 0 {
            continue;
        }
        for (c, b) in px[..3].iter_mut().zip([bg.r, bg.g, bg.b]) {
            *c = (u16::from(*c) + mul_div255(u16::from(b), inv)).min(255) as u8;
        }
        px[3] = 255;
    }
}

fn set_color(ctx: &mut vello_cpu::RenderContext, c: Rgba8) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
