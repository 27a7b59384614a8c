use std::path::PathBuf;

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_timespiral")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "timespiral.exe"
            } else {
                "timespiral"
            });
            p
        })
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("cli_smoke").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn cli_export_writes_json_with_config_and_overrides() {
    let dir = scratch_dir("export");
    let config = dir.join("params.json");
    let out = dir.join("anim.json");
    let _ = std::fs::remove_file(&out);

    std::fs::write(&config, r#"{ "turns": 2, "points_per_turn": 20, "offset_factor": 1.5 }"#)
        .unwrap();

    let status = std::process::Command::new(exe())
        .arg("export")
        .arg("--config")
        .arg(&config)
        .args(["--frame-delay-ms", "50", "--out"])
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let doc: serde_json::Value =
        serde_json::from_reader(std::fs::File::open(&out).unwrap()).unwrap();
    assert_eq!(doc["params"]["turns"], 2);
    assert_eq!(doc["params"]["frame_delay_ms"], 50);
    assert_eq!(doc["total_points"], 40);
    assert_eq!(doc["frames"].as_array().unwrap().len(), 40);
    assert_eq!(doc["playback"]["total_duration_ms"], 2000);
}

#[test]
fn cli_frame_writes_png() {
    let dir = scratch_dir("frame");
    let out = dir.join("frame.png");
    let _ = std::fs::remove_file(&out);

    let status = std::process::Command::new(exe())
        .args([
            "frame", "--turns", "2", "--points-per-turn", "30", "--frame", "10", "--width", "64",
            "--height", "64", "--out",
        ])
        .arg(&out)
        .status()
        .unwrap();

    assert!(status.success());
    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (64, 64));
}

#[test]
fn cli_rejects_out_of_range_turns() {
    let output = std::process::Command::new(exe())
        .args(["info", "--turns", "0"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid parameter"), "{stderr}");
}

#[test]
fn cli_unbounded_accepts_dense_sampling() {
    let output = std::process::Command::new(exe())
        .args(["info", "--unbounded", "--turns", "2", "--points-per-turn", "400"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("total_points:     800"), "{stdout}");
    assert!(stdout.contains("stride:           8"), "{stdout}");
}

#[test]
fn cli_render_writes_mp4() {
    if !timespiral::is_ffmpeg_on_path() {
        return;
    }
    let dir = scratch_dir("render");
    let out = dir.join("spiral.mp4");
    let _ = std::fs::remove_file(&out);

    let output = std::process::Command::new(exe())
        .args([
            "render", "--turns", "1", "--points-per-turn", "20", "--width", "48", "--height", "48",
            "--parallel", "--out",
        ])
        .arg(&out)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
    assert!(String::from_utf8_lossy(&output.stderr).contains("(20 frames)"));
}
