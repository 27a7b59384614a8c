use std::{fs::File, io::BufWriter, path::Path};

use anyhow::Context as _;

use crate::{
    animation::{Animation, Playback},
    foundation::{
        core::Point3,
        error::{SpiralError, SpiralResult},
    },
    frames::{FramePolicy, FrameView},
    params::ParameterSet,
};

/// Upper bound on sampled points written by one export, counting every frame's copy.
///
/// Frame snapshots repeat their prefixes, so a document grows with `frames * total_points`.
pub const MAX_EXPORT_POINTS: usize = 1 << 24;

/// Self-contained JSON document for an external plotting facility.
///
/// Every frame carries its own truncated traces so consumers never need to slice.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationDoc {
    pub params: ParameterSet,
    pub policy: FramePolicy,
    pub total_points: usize,
    pub stride: u64,
    pub playback: PlaybackDoc,
    pub time_axis: Vec<f64>,
    pub angle_axis: Vec<f64>,
    pub traces: Vec<TraceDoc>,
    pub frames: Vec<FrameDoc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlaybackDoc {
    pub frame_delay_ms: u32,
    pub total_duration_ms: u64,
}

impl From<Playback> for PlaybackDoc {
    fn from(p: Playback) -> Self {
        Self {
            frame_delay_ms: p.frame_delay_ms,
            total_duration_ms: p.total_duration_ms(),
        }
    }
}

/// Column-oriented polyline (`x[i], y[i], z[i]`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TraceDoc {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl TraceDoc {
    fn from_points(label: &str, points: &[Point3]) -> Self {
        Self {
            label: label.to_string(),
            x: points.iter().map(|p| p.x).collect(),
            y: points.iter().map(|p| p.y).collect(),
            z: points.iter().map(|p| p.z).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameDoc {
    pub name: String,
    pub traces: Vec<TraceDoc>,
}

impl AnimationDoc {
    /// Number of points a document for `anim` holds across its full and per-frame traces.
    pub fn point_count(anim: &Animation) -> usize {
        let frame_points: usize = anim.frames.iter().map(|f| f.len).sum();
        (anim.total_points() + frame_points) * (1 + anim.orbits.len())
    }

    pub fn from_animation(anim: &Animation) -> SpiralResult<Self> {
        let points = Self::point_count(anim);
        if points > MAX_EXPORT_POINTS {
            return Err(SpiralError::invalid_parameter(format!(
                "export would hold {points} points across {} frames, limit is {MAX_EXPORT_POINTS}",
                anim.frames.len()
            )));
        }

        let mut traces = Vec::with_capacity(1 + anim.orbits.len());
        traces.push(TraceDoc::from_points(
            &anim.central.label,
            &anim.central.points,
        ));
        for orbit in &anim.orbits {
            traces.push(TraceDoc::from_points(&orbit.label, &orbit.points));
        }

        Ok(Self {
            params: anim.params,
            policy: anim.policy,
            total_points: anim.total_points(),
            stride: anim.params.frame_stride(),
            playback: anim.playback().into(),
            time_axis: anim.axes.time.clone(),
            angle_axis: anim.axes.angle.clone(),
            traces,
            frames: anim
                .frame_views()
                .map(|view| frame_doc(anim, &view))
                .collect(),
        })
    }
}

fn frame_doc(anim: &Animation, view: &FrameView<'_>) -> FrameDoc {
    let mut traces = Vec::with_capacity(1 + view.orbits.len());
    traces.push(TraceDoc::from_points(&anim.central.label, view.central));
    for (orbit, prefix) in anim.orbits.iter().zip(view.orbits) {
        traces.push(TraceDoc::from_points(&orbit.label, prefix));
    }
    FrameDoc {
        name: view.frame.name.clone(),
        traces,
    }
}

pub fn to_json_string(anim: &Animation, pretty: bool) -> SpiralResult<String> {
    let doc = AnimationDoc::from_animation(anim)?;
    let out = if pretty {
        serde_json::to_string_pretty(&doc)
    } else {
        serde_json::to_string(&doc)
    };
    out.map_err(|e| SpiralError::serde(format!("serialize animation: {e}")))
}

#[tracing::instrument(skip(anim), fields(frames = anim.frames.len()))]
pub fn write_json(anim: &Animation, path: &Path, pretty: bool) -> SpiralResult<()> {
    let doc = AnimationDoc::from_animation(anim)?;
    crate::encode_ffmpeg::ensure_parent_dir(path)?;
    let f = File::create(path)
        .with_context(|| format!("create export file '{}'", path.display()))?;
    let w = BufWriter::new(f);
    let res = if pretty {
        serde_json::to_writer_pretty(w, &doc)
    } else {
        serde_json::to_writer(w, &doc)
    };
    res.map_err(|e| SpiralError::serde(format!("write '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FramePolicy, ParamLimits, ParameterSet, build_animation, build_animation_with};

    #[test]
    fn frames_carry_truncated_traces() {
        let anim = build_animation(&ParameterSet::new(1, 20, 1.0)).unwrap();
        let doc = AnimationDoc::from_animation(&anim).unwrap();

        assert_eq!(doc.traces.len(), 4);
        assert_eq!(doc.traces[0].label, "Time Spiral");
        assert_eq!(doc.traces[3].label, "Planet 3");
        assert_eq!(doc.frames.len(), 20);
        for (k, frame) in doc.frames.iter().enumerate() {
            assert_eq!(frame.name, k.to_string());
            assert!(frame.traces.iter().all(|t| t.len() == k + 1));
        }
        assert_eq!(doc.playback.total_duration_ms, 20 * 30);
    }

    #[test]
    fn json_exposes_params_and_policy() {
        let anim = build_animation(&ParameterSet::new(2, 20, 0.5)).unwrap();
        let json = to_json_string(&anim, false).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["params"]["turns"], 2);
        assert_eq!(v["policy"], "stride");
        assert_eq!(v["stride"], 1);
        assert_eq!(v["frames"].as_array().unwrap().len(), 40);
        assert_eq!(v["frames"][39]["traces"][2]["z"].as_array().unwrap().len(), 40);
    }

    #[test]
    fn point_count_covers_full_and_frame_traces() {
        let anim = build_animation(&ParameterSet::new(1, 20, 1.0)).unwrap();
        // 20 full samples plus frames of 1..=20, for the spiral and three orbits.
        assert_eq!(AnimationDoc::point_count(&anim), (20 + 210) * 4);
    }

    #[test]
    fn oversized_export_is_refused_before_writing() {
        let anim = build_animation_with(
            &ParameterSet::new(1, 200_000, 1.0),
            &ParamLimits::positive(),
            FramePolicy::Stride,
        )
        .unwrap();
        assert!(AnimationDoc::point_count(&anim) > MAX_EXPORT_POINTS);

        let err = to_json_string(&anim, false).unwrap_err();
        assert!(err.is_invalid_parameter());

        let path = Path::new("target/export_tests/oversized.json");
        let _ = std::fs::remove_file(path);
        assert!(write_json(&anim, path, false).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn largest_interactive_animation_fits() {
        let anim = build_animation(&ParameterSet::new(10, 100, 2.0)).unwrap();
        assert!(AnimationDoc::point_count(&anim) <= MAX_EXPORT_POINTS);
        assert!(AnimationDoc::from_animation(&anim).is_ok());
    }
}
