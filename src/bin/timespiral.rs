use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "timespiral", version, about = "Euler's formula as a time spiral")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print sample and frame counts for the parameters.
    Info(InfoArgs),
    /// Write the sampled curves and frames as JSON.
    Export(ExportArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render the animation as an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct ParamArgs {
    /// JSON file with any of: turns, points_per_turn, offset_factor, frame_delay_ms.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of turns (years).
    #[arg(long)]
    turns: Option<u32>,

    /// Samples per turn.
    #[arg(long)]
    points_per_turn: Option<u32>,

    /// Distance of the first body from the time spiral.
    #[arg(long = "offset")]
    offset_factor: Option<f64>,

    /// Playback delay between frames, in milliseconds.
    #[arg(long)]
    frame_delay_ms: Option<u32>,

    /// Append a full-length frame when the stride skips the last sample.
    #[arg(long)]
    include_final_frame: bool,

    /// Accept any positive parameters instead of the interactive ranges.
    #[arg(long)]
    unbounded: bool,
}

#[derive(Args, Debug)]
struct InfoArgs {
    #[command(flatten)]
    params: ParamArgs,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Pretty-print the JSON.
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct CanvasArgs {
    /// Output width in pixels.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Output height in pixels.
    #[arg(long, default_value_t = 640)]
    height: u32,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    params: ParamArgs,

    #[command(flatten)]
    canvas: CanvasArgs,

    /// Frame number (0-based position in the frame list).
    #[arg(long, default_value_t = 0)]
    frame: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    params: ParamArgs,

    #[command(flatten)]
    canvas: CanvasArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Render frames on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker thread count for --parallel (defaults to the CPU count).
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Export(args) => cmd_export(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

impl ParamArgs {
    fn resolve(&self) -> anyhow::Result<timespiral::ParameterSet> {
        let mut p = match &self.config {
            Some(path) => timespiral::ParameterSet::from_json_file(path)?,
            None => timespiral::ParameterSet::default(),
        };
        if let Some(v) = self.turns {
            p.turns = v;
        }
        if let Some(v) = self.points_per_turn {
            p.points_per_turn = v;
        }
        if let Some(v) = self.offset_factor {
            p.offset_factor = v;
        }
        if let Some(v) = self.frame_delay_ms {
            p.frame_delay_ms = v;
        }
        Ok(p)
    }

    fn build(&self) -> anyhow::Result<timespiral::Animation> {
        let params = self.resolve()?;
        let limits = if self.unbounded {
            timespiral::ParamLimits::positive()
        } else {
            timespiral::ParamLimits::default()
        };
        let policy = if self.include_final_frame {
            timespiral::FramePolicy::StrideWithFinal
        } else {
            timespiral::FramePolicy::Stride
        };
        let anim = timespiral::build_animation_with(&params, &limits, policy)
            .with_context(|| "build time spiral animation")?;
        Ok(anim)
    }
}

impl CanvasArgs {
    fn settings(&self) -> anyhow::Result<timespiral::RenderSettings> {
        let canvas = timespiral::Canvas::new(self.width, self.height)?;
        Ok(timespiral::RenderSettings::default().with_canvas(canvas))
    }
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let anim = args.params.build()?;
    let playback = anim.playback();
    let last = anim
        .frames
        .last()
        .context("animation has no frames")?;

    println!("turns:            {}", anim.params.turns);
    println!("points_per_turn:  {}", anim.params.points_per_turn);
    println!("offset_factor:    {}", anim.params.offset_factor);
    println!("total_points:     {}", anim.total_points());
    println!("stride:           {}", anim.params.frame_stride());
    println!("frames:           {}", anim.frames.len());
    println!("last_frame_len:   {}", last.len);
    println!("frame_delay_ms:   {}", playback.frame_delay_ms);
    println!("duration_ms:      {}", playback.total_duration_ms());
    for orbit in &anim.orbits {
        println!(
            "{}:         radius {:.3}, speed {:.3}",
            orbit.label, orbit.radius, orbit.speed
        );
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let anim = args.params.build()?;
    timespiral::write_json(&anim, &args.out, args.pretty)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let anim = args.params.build()?;
    let mut renderer = timespiral::CpuRenderer::new(args.canvas.settings()?);
    let frame = timespiral::render_frame(&anim, args.frame, &mut renderer)?;

    timespiral::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let anim = args.params.build()?;
    let mut renderer = timespiral::CpuRenderer::new(args.canvas.settings()?);

    let threading = timespiral::RenderThreading {
        parallel: args.parallel,
        threads: args.threads,
        ..timespiral::RenderThreading::default()
    };

    let written = timespiral::render_to_mp4(&anim, args.out.clone(), &threading, &mut renderer)?;
    eprintln!("wrote {} ({written} frames)", args.out.display());
    Ok(())
}
