use crate::{
    foundation::core::Point3,
    sample::{BODY_COUNT, Curve},
};

/// How the frame list treats the tail the stride steps over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FramePolicy {
    /// Indices `0, s, 2s, … < total`. The last sample is included only when the stride lands on it.
    #[default]
    Stride,
    /// Like [`FramePolicy::Stride`], plus one full-length frame if the stride skipped the end.
    StrideWithFinal,
}

/// One animation snapshot: every curve truncated to `[0, index]`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Frame {
    /// Decimal sample index, used as the playback key.
    pub name: String,
    pub index: usize,
    /// Points in each truncated curve (`index + 1`).
    pub len: usize,
}

impl Frame {
    fn at(index: usize) -> Self {
        Self {
            name: index.to_string(),
            index,
            len: index + 1,
        }
    }
}

pub fn build_frames(total_points: usize, stride: usize, policy: FramePolicy) -> Vec<Frame> {
    let stride = stride.max(1);
    let mut frames: Vec<Frame> = (0..total_points).step_by(stride).map(Frame::at).collect();

    if policy == FramePolicy::StrideWithFinal
        && let Some(last) = frames.last()
        && last.len < total_points
    {
        frames.push(Frame::at(total_points - 1));
    }
    frames
}

/// Borrowed prefixes of the animation's curves for a single frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub frame: &'a Frame,
    pub central: &'a [Point3],
    pub orbits: [&'a [Point3]; BODY_COUNT],
}

impl<'a> FrameView<'a> {
    pub(crate) fn new(frame: &'a Frame, central: &'a Curve, orbits: &'a [Curve; BODY_COUNT]) -> Self {
        Self {
            frame,
            central: central.prefix(frame.len),
            orbits: std::array::from_fn(|j| orbits[j].prefix(frame.len)),
        }
    }

    /// Current position of each body (the head of its trail).
    pub fn heads(&self) -> [Option<Point3>; BODY_COUNT] {
        std::array::from_fn(|j| self.orbits[j].last().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_one_emits_every_index() {
        let frames = build_frames(40, 1, FramePolicy::Stride);
        assert_eq!(frames.len(), 40);
        assert_eq!(frames[0].len, 1);
        assert_eq!(frames[39].len, 40);
        assert_eq!(frames[7].name, "7");
    }

    #[test]
    fn stride_can_skip_the_tail() {
        // 420 points, stride 4: last index 416, so the final 3 samples never appear.
        let frames = build_frames(420, 4, FramePolicy::Stride);
        assert_eq!(frames.len(), 105);
        assert_eq!(frames.last().unwrap().index, 416);
        assert!(frames.windows(2).all(|w| w[0].len < w[1].len));
    }

    #[test]
    fn final_frame_policy_appends_full_length() {
        let frames = build_frames(420, 4, FramePolicy::StrideWithFinal);
        assert_eq!(frames.len(), 106);
        assert_eq!(frames.last().unwrap().len, 420);

        // Already aligned: nothing appended.
        let frames = build_frames(41, 4, FramePolicy::StrideWithFinal);
        assert_eq!(frames.last().unwrap().len, 41);
        assert_eq!(frames.len(), 11);
    }

    #[test]
    fn empty_input_yields_no_frames() {
        assert!(build_frames(0, 3, FramePolicy::StrideWithFinal).is_empty());
    }
}
