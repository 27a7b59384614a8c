use crate::{frames::FramePolicy, foundation::math::Fnv1a64, params::ParameterSet};

/// 128-bit identity of a build request, used as the cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParamFingerprint {
    pub hi: u64,
    pub lo: u64,
}

pub fn fingerprint_params(params: &ParameterSet, policy: FramePolicy) -> ParamFingerprint {
    let mut a = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
    let mut b = Fnv1a64::new(0x9ae16a3b2f90404f);

    write_u64_pair(&mut a, &mut b, u64::from(params.turns));
    write_u64_pair(&mut a, &mut b, u64::from(params.points_per_turn));
    write_f64_pair(&mut a, &mut b, params.offset_factor);
    write_u64_pair(&mut a, &mut b, u64::from(params.frame_delay_ms));
    write_u8_pair(
        &mut a,
        &mut b,
        match policy {
            FramePolicy::Stride => 0,
            FramePolicy::StrideWithFinal => 1,
        },
    );

    ParamFingerprint {
        hi: a.finish(),
        lo: b.finish(),
    }
}

fn write_u8_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u8) {
    a.write_u8(v);
    b.write_u8(v);
}

fn write_u64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u64) {
    a.write_u64(v);
    b.write_u64(v);
}

fn write_f64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: f64) {
    // -0.0 and 0.0 sample identically.
    let v = if v == 0.0 { 0.0 } else { v };
    a.write_f64(v);
    b.write_f64(v);
}
