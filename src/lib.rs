//! Euler's formula drawn as a time spiral.
//!
//! `e^{ix}` traces a circle in the complex plane; adding time as a third axis stretches that
//! circle into a helix. This crate samples a degenerate "time spiral" up the time axis plus three
//! orbiting bodies at radii `offset * j` and angular speeds `1/j`, and cuts the result into
//! progressively longer animation frames.
//!
//! # Pipeline
//!
//! 1. **Sample**: [`ParameterSet`] -> [`Animation`] via [`build_animation`] (pure, deterministic)
//! 2. **Export** (optional): [`Animation`] -> JSON ([`AnimationDoc`], [`write_json`])
//! 3. **Render** (optional): [`FrameView`] -> [`FrameRGBA`] on the CPU ([`CpuRenderer`])
//! 4. **Encode** (optional): stream frames to the system `ffmpeg` binary ([`render_to_mp4`])
//!
//! Sampling never performs IO. Everything past step 1 consumes the immutable [`Animation`].
#![forbid(unsafe_code)]

mod animation;
mod cache;
mod encode_ffmpeg;
mod export;
mod fingerprint;
mod foundation;
mod frames;
mod params;
mod render;
mod sample;
mod scene;

pub use animation::{Animation, Playback, build_animation, build_animation_with};
pub use cache::{AnimationCache, CacheStats};
pub use encode_ffmpeg::{EncodeConfig, FfmpegEncoder, ensure_parent_dir, is_ffmpeg_on_path};
pub use export::{
    AnimationDoc, FrameDoc, MAX_EXPORT_POINTS, PlaybackDoc, TraceDoc, to_json_string, write_json,
};
pub use fingerprint::{ParamFingerprint, fingerprint_params};
pub use foundation::core::{Affine, BezPath, Canvas, Point, Point3, Rgba8, Vec2};
pub use foundation::error::{SpiralError, SpiralResult};
pub use frames::{Frame, FramePolicy, FrameView, build_frames};
pub use params::{ParamLimits, ParameterSet};
pub use render::cpu::{CpuRenderer, polyline};
pub use render::pipeline::{RenderThreading, render_frame, render_frames, render_to_mp4};
pub use render::{FrameRGBA, FrameRenderer, Palette, RenderSettings};
pub use sample::{
    BODY_COUNT, Body, Curve, SampledAxes, TIME_SPIRAL_LABEL, bodies, central_curve, orbit_curve,
    sample_axes,
};
pub use scene::{Camera, SceneBounds};
