#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// `count` evenly spaced samples over `[start, end]`, both ends included.
///
/// Sample `i` is `start + (end - start) * i / (count - 1)`. `count == 1` yields `[start]`.
pub(crate) fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = (count - 1) as f64;
            let span = end - start;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        end
                    } else {
                        start + span * (i as f64) / last
                    }
                })
                .collect()
        }
    }
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_seeded_hash_is_stable() {
        let mut a = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
        a.write_bytes(b"spiral");
        let mut b = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
        b.write_u8(b's');
        b.write_bytes(b"piral");
        assert_eq!(a.finish(), b.finish());
    }

    #[test]
    fn linspace_hits_both_ends() {
        let v = linspace(0.0, 3.0, 4);
        assert_eq!(v, vec![0.0, 1.0, 2.0, 3.0]);

        let v = linspace(0.0, std::f64::consts::TAU * 7.0, 491);
        assert_eq!(v.len(), 491);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[490], std::f64::consts::TAU * 7.0);
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
    }

    #[test]
    fn mul_div255_rounds() {
        assert_eq!(mul_div255(255, 255), 255);
        assert_eq!(mul_div255(128, 255), 128);
        assert_eq!(mul_div255(0, 200), 0);
    }
}
