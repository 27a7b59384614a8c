use std::path::PathBuf;

use timespiral::{
    Canvas, CpuRenderer, ParameterSet, RenderSettings, RenderThreading, build_animation,
    is_ffmpeg_on_path, render_to_mp4,
};

fn out_path(name: &str) -> PathBuf {
    let path = PathBuf::from("target").join("mp4_output").join(name);
    let _ = std::fs::remove_file(&path);
    path
}

fn renderer() -> CpuRenderer {
    CpuRenderer::new(RenderSettings::default().with_canvas(Canvas {
        width: 48,
        height: 48,
    }))
}

fn assert_mp4_written(threading: RenderThreading, name: &str) {
    let anim = build_animation(&ParameterSet::new(1, 20, 1.0)).unwrap();
    let out = out_path(name);

    let written = render_to_mp4(&anim, out.clone(), &threading, &mut renderer()).unwrap();

    assert_eq!(written, anim.frames.len() as u64);
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn sequential_render_writes_every_frame() {
    if !is_ffmpeg_on_path() {
        return;
    }
    assert_mp4_written(RenderThreading::default(), "sequential.mp4");
}

#[test]
fn parallel_render_writes_every_frame() {
    if !is_ffmpeg_on_path() {
        return;
    }
    assert_mp4_written(
        RenderThreading {
            parallel: true,
            chunk_size: 6,
            threads: Some(2),
        },
        "parallel.mp4",
    );
}

#[test]
fn odd_canvas_is_rejected() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let anim = build_animation(&ParameterSet::new(1, 20, 1.0)).unwrap();
    let mut odd = CpuRenderer::new(RenderSettings::default().with_canvas(Canvas {
        width: 47,
        height: 48,
    }));
    let err = render_to_mp4(
        &anim,
        out_path("odd.mp4"),
        &RenderThreading::default(),
        &mut odd,
    )
    .unwrap_err();
    assert!(err.is_invalid_parameter(), "{err}");
}
