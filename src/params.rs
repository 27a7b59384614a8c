use std::{fs::File, io::BufReader, ops::RangeInclusive, path::Path};

use anyhow::Context as _;

use crate::foundation::error::{SpiralError, SpiralResult};

/// Inputs that drive curve sampling and playback.
///
/// `frame_delay_ms` only affects [`Playback`](crate::Playback) timing; it never changes sampled
/// data.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterSet {
    /// Number of full revolutions (years).
    pub turns: u32,
    /// Samples per revolution.
    pub points_per_turn: u32,
    /// Scales the orbit radii: body `j` sits at `offset_factor * j`.
    pub offset_factor: f64,
    /// Delay between animation frames.
    pub frame_delay_ms: u32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            turns: 6,
            points_per_turn: 70,
            offset_factor: 1.0,
            frame_delay_ms: 30,
        }
    }
}

impl ParameterSet {
    pub fn new(turns: u32, points_per_turn: u32, offset_factor: f64) -> Self {
        Self {
            turns,
            points_per_turn,
            offset_factor,
            ..Self::default()
        }
    }

    pub fn with_frame_delay_ms(mut self, frame_delay_ms: u32) -> Self {
        self.frame_delay_ms = frame_delay_ms;
        self
    }

    /// `turns * points_per_turn`, widened so it cannot overflow.
    pub fn total_points(&self) -> u64 {
        u64::from(self.turns) * u64::from(self.points_per_turn)
    }

    /// Index increment between consecutive animation frames: `max(1, total / 100)`.
    pub fn frame_stride(&self) -> u64 {
        (self.total_points() / FRAMES_TARGET).max(1)
    }

    pub fn validate(&self, limits: &ParamLimits) -> SpiralResult<()> {
        check_u32("turns", self.turns, limits.turns.as_ref())?;
        check_u32(
            "points_per_turn",
            self.points_per_turn,
            limits.points_per_turn.as_ref(),
        )?;
        check_u32(
            "frame_delay_ms",
            self.frame_delay_ms,
            limits.frame_delay_ms.as_ref(),
        )?;

        let offset = self.offset_factor;
        if !offset.is_finite() || offset <= 0.0 {
            return Err(SpiralError::invalid_parameter(format!(
                "offset_factor must be a positive finite number, got {offset}"
            )));
        }
        if let Some(range) = &limits.offset_factor
            && !range.contains(&offset)
        {
            return Err(SpiralError::invalid_parameter(format!(
                "offset_factor {offset} outside [{}, {}]",
                range.start(),
                range.end()
            )));
        }

        let total = self.total_points();
        if total < 2 {
            return Err(SpiralError::invalid_parameter(format!(
                "turns * points_per_turn must be >= 2 to interpolate, got {total}"
            )));
        }
        if total > MAX_TOTAL_POINTS {
            return Err(SpiralError::invalid_parameter(format!(
                "turns * points_per_turn must be <= {MAX_TOTAL_POINTS}, got {total}"
            )));
        }
        Ok(())
    }

    /// Read a parameter set from a JSON object; absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> SpiralResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open parameter file '{}'", path.display()))?;
        let r = BufReader::new(f);
        serde_json::from_reader(r).map_err(|e| {
            SpiralError::serde(format!("parse parameter file '{}': {e}", path.display()))
        })
    }
}

const FRAMES_TARGET: u64 = 100;
const MAX_TOTAL_POINTS: u64 = 1 << 24;

/// Accepted domain for each [`ParameterSet`] field.
///
/// `None` means "any positive value". The default mirrors the interactive ranges the
/// visualization was designed around.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamLimits {
    pub turns: Option<RangeInclusive<u32>>,
    pub points_per_turn: Option<RangeInclusive<u32>>,
    pub offset_factor: Option<RangeInclusive<f64>>,
    pub frame_delay_ms: Option<RangeInclusive<u32>>,
}

impl Default for ParamLimits {
    fn default() -> Self {
        Self {
            turns: Some(1..=10),
            points_per_turn: Some(20..=100),
            offset_factor: Some(0.5..=2.0),
            frame_delay_ms: Some(10..=100),
        }
    }
}

impl ParamLimits {
    /// Only positivity and the two-sample minimum are enforced.
    pub fn positive() -> Self {
        Self {
            turns: None,
            points_per_turn: None,
            offset_factor: None,
            frame_delay_ms: None,
        }
    }
}

fn check_u32(name: &str, value: u32, range: Option<&RangeInclusive<u32>>) -> SpiralResult<()> {
    if value == 0 {
        return Err(SpiralError::invalid_parameter(format!(
            "{name} must be > 0"
        )));
    }
    if let Some(range) = range
        && !range.contains(&value)
    {
        return Err(SpiralError::invalid_parameter(format!(
            "{name} {value} outside [{}, {}]",
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let p = ParameterSet::default();
        p.validate(&ParamLimits::default()).unwrap();
        assert_eq!(p.total_points(), 420);
        assert_eq!(p.frame_stride(), 4);
    }

    #[test]
    fn stride_floors_at_one() {
        let p = ParameterSet::new(2, 20, 1.0);
        assert_eq!(p.total_points(), 40);
        assert_eq!(p.frame_stride(), 1);

        let p = ParameterSet::new(10, 100, 1.0);
        assert_eq!(p.frame_stride(), 10);
    }

    #[test]
    fn zero_turns_is_invalid_parameter() {
        let err = ParameterSet::new(0, 20, 1.0)
            .validate(&ParamLimits::positive())
            .unwrap_err();
        assert!(err.is_invalid_parameter());
        assert!(err.to_string().contains("turns"));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let limits = ParamLimits::default();
        assert!(ParameterSet::new(11, 20, 1.0).validate(&limits).is_err());
        assert!(ParameterSet::new(1, 19, 1.0).validate(&limits).is_err());
        assert!(ParameterSet::new(1, 20, 0.4).validate(&limits).is_err());
        assert!(ParameterSet::new(1, 20, 2.5).validate(&limits).is_err());
        assert!(
            ParameterSet::new(1, 20, 1.0)
                .with_frame_delay_ms(5)
                .validate(&limits)
                .is_err()
        );
    }

    #[test]
    fn non_finite_or_negative_offset_rejected_even_when_unbounded() {
        let limits = ParamLimits::positive();
        assert!(ParameterSet::new(1, 20, -1.0).validate(&limits).is_err());
        assert!(ParameterSet::new(1, 20, 0.0).validate(&limits).is_err());
        assert!(ParameterSet::new(1, 20, f64::NAN).validate(&limits).is_err());
        assert!(ParameterSet::new(1, 20, 7.5).validate(&limits).is_ok());
    }

    #[test]
    fn single_sample_cannot_interpolate() {
        let err = ParameterSet::new(1, 1, 1.0)
            .validate(&ParamLimits::positive())
            .unwrap_err();
        assert!(err.to_string().contains(">= 2"));
        assert!(
            ParameterSet::new(1, 2, 1.0)
                .validate(&ParamLimits::positive())
                .is_ok()
        );
    }

    #[test]
    fn json_missing_fields_take_defaults() {
        let p: ParameterSet = serde_json::from_str(r#"{ "turns": 3 }"#).unwrap();
        assert_eq!(p.turns, 3);
        assert_eq!(p.points_per_turn, 70);
        assert_eq!(p.frame_delay_ms, 30);

        assert!(serde_json::from_str::<ParameterSet>(r#"{ "spin": 1 }"#).is_err());
    }
}
