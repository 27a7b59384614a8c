use std::path::PathBuf;

use rayon::prelude::*;

use crate::{
    animation::Animation,
    encode_ffmpeg::{EncodeConfig, FfmpegEncoder, is_ffmpeg_on_path},
    foundation::error::{SpiralError, SpiralResult},
    render::{FrameRGBA, FrameRenderer, RenderSettings, cpu::CpuRenderer},
    scene::SceneBounds,
};

/// Render animation frame `k`.
pub fn render_frame(
    anim: &Animation,
    k: usize,
    renderer: &mut dyn FrameRenderer,
) -> SpiralResult<FrameRGBA> {
    let view = anim.frame_view(k)?;
    let bounds = SceneBounds::for_turns(anim.params.turns);
    renderer.render_view(&view, &bounds)
}

#[derive(Clone, Debug)]
pub struct RenderThreading {
    pub parallel: bool,
    pub chunk_size: usize,
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 32,
            threads: None,
        }
    }
}

/// Render every frame in order.
pub fn render_frames(
    anim: &Animation,
    renderer: &mut dyn FrameRenderer,
    threading: &RenderThreading,
) -> SpiralResult<Vec<FrameRGBA>> {
    let mut out = Vec::with_capacity(anim.frames.len());
    for_each_chunk(anim, renderer, threading, |mut frames| {
        out.append(&mut frames);
        Ok(())
    })?;
    Ok(out)
}

/// Render the whole animation to MP4 via the system `ffmpeg` binary.
///
/// The stream takes its size from the first rendered frame and its frame rate from the
/// animation's playback delay. Returns the number of frames encoded.
#[tracing::instrument(skip(anim, renderer, threading), fields(frames = anim.frames.len()))]
pub fn render_to_mp4(
    anim: &Animation,
    out_path: impl Into<PathBuf> + std::fmt::Debug,
    threading: &RenderThreading,
    renderer: &mut dyn FrameRenderer,
) -> SpiralResult<u64> {
    if anim.frames.is_empty() {
        return Err(SpiralError::invalid_parameter("animation has no frames"));
    }
    if !is_ffmpeg_on_path() {
        return Err(SpiralError::encode(
            "ffmpeg is required for MP4 rendering, but was not found on PATH",
        ));
    }

    let out_path = out_path.into();
    let playback = anim.playback();
    let mut enc: Option<FfmpegEncoder> = None;
    for_each_chunk(anim, renderer, threading, |frames| {
        for frame in &frames {
            if enc.is_none() {
                let cfg = EncodeConfig::for_frame(frame, playback, out_path.clone());
                enc = Some(FfmpegEncoder::new(cfg)?);
            }
            if let Some(enc) = enc.as_mut() {
                enc.encode_frame(frame)?;
            }
        }
        Ok(())
    })?;

    enc.ok_or_else(|| SpiralError::encode("no frames were rendered"))?
        .finish()
}

fn for_each_chunk(
    anim: &Animation,
    renderer: &mut dyn FrameRenderer,
    threading: &RenderThreading,
    mut sink: impl FnMut(Vec<FrameRGBA>) -> SpiralResult<()>,
) -> SpiralResult<()> {
    let bounds = SceneBounds::for_turns(anim.params.turns);
    let chunk_size = threading.chunk_size.max(1);

    let parallel = if threading.parallel {
        let settings = renderer.worker_settings().ok_or_else(|| {
            SpiralError::render("parallel render requires a renderer with worker settings")
        })?;
        Some((settings, build_thread_pool(threading.threads)?))
    } else {
        None
    };

    let views: Vec<_> = anim.frame_views().collect();
    for chunk in views.chunks(chunk_size) {
        let frames = match &parallel {
            Some((settings, pool)) => render_chunk_parallel(chunk, &bounds, settings, pool)?,
            None => chunk
                .iter()
                .map(|view| renderer.render_view(view, &bounds))
                .collect::<SpiralResult<Vec<_>>>()?,
        };
        sink(frames)?;
    }
    Ok(())
}

fn render_chunk_parallel(
    chunk: &[crate::frames::FrameView<'_>],
    bounds: &SceneBounds,
    settings: &RenderSettings,
    pool: &rayon::ThreadPool,
) -> SpiralResult<Vec<FrameRGBA>> {
    pool.install(|| {
        chunk
            .par_iter()
            .map_init(
                || CpuRenderer::new(settings.clone()),
                |worker, view| worker.render_view(view, bounds),
            )
            .collect::<SpiralResult<Vec<_>>>()
    })
}

fn build_thread_pool(threads: Option<usize>) -> SpiralResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SpiralError::invalid_parameter(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SpiralError::render(format!("failed to build rayon thread pool: {e}")))
}
