use std::{
    io::Write as _,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use anyhow::Context as _;

use crate::{
    animation::Playback,
    foundation::error::{SpiralError, SpiralResult},
    render::FrameRGBA,
};

/// Output stream for one animation: frame size, playback rate, destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
}

impl EncodeConfig {
    /// Stream shaped after the first rendered frame, timed by the animation's frame delay.
    pub fn for_frame(first: &FrameRGBA, playback: Playback, out_path: impl Into<PathBuf>) -> Self {
        Self {
            width: first.width,
            height: first.height,
            fps: playback.fps(),
            out_path: out_path.into(),
        }
    }

    pub fn validate(&self) -> SpiralResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SpiralError::invalid_parameter(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(SpiralError::invalid_parameter("encode fps must be non-zero"));
        }
        // yuv420p subsamples chroma 2x2.
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(SpiralError::invalid_parameter(format!(
                "mp4 output needs even width/height, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    fn frame_bytes(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }

    /// Frames go to ffmpeg as-is, so they must match the stream and carry no transparency.
    fn check_frame(&self, frame: &FrameRGBA) -> SpiralResult<()> {
        if frame.width != self.width || frame.height != self.height {
            return Err(SpiralError::encode(format!(
                "frame is {}x{}, stream is {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        if frame.data.len() != self.frame_bytes() {
            return Err(SpiralError::encode(format!(
                "frame holds {} bytes, expected {}",
                frame.data.len(),
                self.frame_bytes()
            )));
        }
        if frame.data.chunks_exact(4).any(|px| px[3] != u8::MAX) {
            return Err(SpiralError::encode("frame has non-opaque pixels"));
        }
        Ok(())
    }

    fn ffmpeg_command(&self) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .args(["-y", "-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba"])
            .arg("-s")
            .arg(format!("{}x{}", self.width, self.height))
            .arg("-r")
            .arg(self.fps.to_string())
            .args(["-i", "pipe:0", "-an", "-c:v", "libx264", "-pix_fmt", "yuv420p"])
            .args(["-movflags", "+faststart"])
            .arg(&self.out_path);
        cmd
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

pub fn ensure_parent_dir(path: &Path) -> SpiralResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Pipes opaque RGBA frames into a system `ffmpeg` process writing H.264 MP4.
///
/// Existing output files are overwritten.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    child: Child,
    stdin: Option<ChildStdin>,
    frames_written: u64,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig) -> SpiralResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        tracing::debug!(out = %cfg.out_path.display(), fps = cfg.fps, "spawning ffmpeg");
        let mut child = cfg
            .ffmpeg_command()
            .spawn()
            .map_err(|e| SpiralError::encode(format!("spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SpiralError::encode("ffmpeg stdin unavailable"))?;

        Ok(Self {
            cfg,
            child,
            stdin: Some(stdin),
            frames_written: 0,
        })
    }

    pub fn encode_frame(&mut self, frame: &FrameRGBA) -> SpiralResult<()> {
        self.cfg.check_frame(frame)?;
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| SpiralError::encode("ffmpeg encoder already finished"))?;
        stdin
            .write_all(&frame.data)
            .map_err(|e| SpiralError::encode(format!("write frame to ffmpeg: {e}")))?;
        self.frames_written += 1;
        Ok(())
    }

    /// Close the pipe, wait for ffmpeg, and return the number of frames encoded.
    pub fn finish(mut self) -> SpiralResult<u64> {
        drop(self.stdin.take());
        let output = self
            .child
            .wait_with_output()
            .map_err(|e| SpiralError::encode(format!("wait for ffmpeg: {e}")))?;
        if !output.status.success() {
            return Err(SpiralError::encode(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        tracing::debug!(frames = self.frames_written, "ffmpeg finished");
        Ok(self.frames_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque_frame(width: u32, height: u32) -> FrameRGBA {
        FrameRGBA {
            width,
            height,
            data: [18, 20, 28, 255].repeat((width * height) as usize),
        }
    }

    fn config(width: u32, height: u32) -> EncodeConfig {
        EncodeConfig::for_frame(
            &opaque_frame(width, height),
            Playback {
                frame_delay_ms: 30,
                frame_count: 10,
            },
            "target/encode/out.mp4",
        )
    }

    #[test]
    fn config_follows_frame_and_playback() {
        let cfg = config(64, 48);
        assert_eq!((cfg.width, cfg.height, cfg.fps), (64, 48, 33));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_rejects_odd_or_empty_sizes() {
        assert!(config(63, 48).validate().is_err());
        assert!(config(64, 0).validate().is_err());

        let mut zero_fps = config(64, 48);
        zero_fps.fps = 0;
        assert!(zero_fps.validate().is_err());
    }

    #[test]
    fn frames_must_match_the_stream() {
        let cfg = config(8, 8);
        assert!(cfg.check_frame(&opaque_frame(8, 8)).is_ok());
        assert!(cfg.check_frame(&opaque_frame(8, 6)).is_err());

        let mut short = opaque_frame(8, 8);
        short.data.truncate(16);
        assert!(cfg.check_frame(&short).is_err());
    }

    #[test]
    fn translucent_frames_are_rejected() {
        let cfg = config(8, 8);
        let mut frame = opaque_frame(8, 8);
        frame.data[3] = 254;
        assert!(cfg.check_frame(&frame).is_err());
    }

    #[test]
    fn command_targets_stream_geometry() {
        let cmd = config(64, 48).ffmpeg_command();
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert!(args.windows(2).any(|w| w == ["-s", "64x48"]));
        assert!(args.windows(2).any(|w| w == ["-r", "33"]));
        assert_eq!(args.last().map(String::as_str), Some("target/encode/out.mp4"));
    }
}
