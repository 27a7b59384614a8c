use crate::{
    foundation::error::{SpiralError, SpiralResult},
    frames::{Frame, FramePolicy, FrameView, build_frames},
    params::{ParamLimits, ParameterSet},
    sample::{BODY_COUNT, Curve, SampledAxes, bodies, central_curve, orbit_curve, sample_axes},
};

/// Everything needed to draw or export the time-spiral animation.
///
/// Built once per [`ParameterSet`] and never mutated. Frames reference prefixes of the shared
/// curves; use [`Animation::frame_view`] to borrow them.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Animation {
    pub params: ParameterSet,
    pub policy: FramePolicy,
    pub axes: SampledAxes,
    pub central: Curve,
    pub orbits: [Curve; BODY_COUNT],
    pub frames: Vec<Frame>,
}

impl Animation {
    pub fn total_points(&self) -> usize {
        self.axes.len()
    }

    pub fn time_axis(&self) -> &[f64] {
        &self.axes.time
    }

    pub fn angle_axis(&self) -> &[f64] {
        &self.axes.angle
    }

    pub fn frame_view(&self, k: usize) -> SpiralResult<FrameView<'_>> {
        let frame = self.frames.get(k).ok_or_else(|| {
            SpiralError::invalid_parameter(format!(
                "frame {k} out of range (animation has {} frames)",
                self.frames.len()
            ))
        })?;
        Ok(FrameView::new(frame, &self.central, &self.orbits))
    }

    pub fn frame_views(&self) -> impl ExactSizeIterator<Item = FrameView<'_>> + '_ {
        self.frames
            .iter()
            .map(|f| FrameView::new(f, &self.central, &self.orbits))
    }

    pub fn playback(&self) -> Playback {
        Playback::new(self.params.frame_delay_ms, self.frames.len())
    }
}

/// Sample the time spiral with the default limits and frame policy.
pub fn build_animation(params: &ParameterSet) -> SpiralResult<Animation> {
    build_animation_with(params, &ParamLimits::default(), FramePolicy::default())
}

#[tracing::instrument(skip(limits))]
pub fn build_animation_with(
    params: &ParameterSet,
    limits: &ParamLimits,
    policy: FramePolicy,
) -> SpiralResult<Animation> {
    params.validate(limits)?;

    // validate() caps the total well below usize::MAX on every supported target.
    let total = params.total_points() as usize;
    let stride = params.frame_stride() as usize;

    let axes = sample_axes(params.turns, total);
    let central = central_curve(&axes);
    let orbits = bodies(params.offset_factor).map(|b| orbit_curve(&axes, &b));
    let frames = build_frames(total, stride, policy);

    tracing::debug!(total, stride, frames = frames.len(), "sampled time spiral");

    Ok(Animation {
        params: *params,
        policy,
        axes,
        central,
        orbits,
        frames,
    })
}

/// Frame timing derived from `frame_delay_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Playback {
    pub frame_delay_ms: u32,
    pub frame_count: usize,
}

impl Playback {
    pub fn new(frame_delay_ms: u32, frame_count: usize) -> Self {
        Self {
            frame_delay_ms,
            frame_count,
        }
    }

    pub fn total_duration_ms(&self) -> u64 {
        u64::from(self.frame_delay_ms) * self.frame_count as u64
    }

    /// Nearest whole frame rate, at least 1.
    pub fn fps(&self) -> u32 {
        if self.frame_delay_ms == 0 {
            return 1;
        }
        (1000.0 / f64::from(self.frame_delay_ms)).round().max(1.0) as u32
    }

    /// Start time of frame `k` in milliseconds.
    pub fn frame_start_ms(&self, k: usize) -> u64 {
        u64::from(self.frame_delay_ms) * k as u64
    }
}
