use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use crate::{
    animation::{Animation, build_animation_with},
    fingerprint::{ParamFingerprint, fingerprint_params},
    foundation::error::{SpiralError, SpiralResult},
    frames::FramePolicy,
    params::{ParamLimits, ParameterSet},
};

/// Memoizes built animations by parameter fingerprint, evicting least-recently-used entries.
///
/// Purely an optimization: a miss rebuilds exactly what [`build_animation_with`] returns.
pub struct AnimationCache {
    limits: ParamLimits,
    entries: HashMap<ParamFingerprint, Arc<Animation>>,
    lru: VecDeque<ParamFingerprint>,
    capacity: usize,
    stats: CacheStats,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl AnimationCache {
    pub fn new(capacity: usize) -> SpiralResult<Self> {
        Self::with_limits(capacity, ParamLimits::default())
    }

    pub fn with_limits(capacity: usize, limits: ParamLimits) -> SpiralResult<Self> {
        if capacity == 0 {
            return Err(SpiralError::invalid_parameter(
                "animation cache capacity must be >= 1",
            ));
        }
        Ok(Self {
            limits,
            entries: HashMap::new(),
            lru: VecDeque::new(),
            capacity,
            stats: CacheStats::default(),
        })
    }

    pub fn get_or_build(
        &mut self,
        params: &ParameterSet,
        policy: FramePolicy,
    ) -> SpiralResult<Arc<Animation>> {
        let key = fingerprint_params(params, policy);
        if let Some(anim) = self.entries.get(&key).cloned() {
            self.stats.hits += 1;
            self.touch(key);
            tracing::debug!(?key, "animation cache hit");
            return Ok(anim);
        }

        self.stats.misses += 1;
        tracing::debug!(?key, "animation cache miss");
        let anim = Arc::new(build_animation_with(params, &self.limits, policy)?);
        self.insert(key, Arc::clone(&anim));
        Ok(anim)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    fn insert(&mut self, key: ParamFingerprint, anim: Arc<Animation>) {
        self.entries.insert(key, anim);
        self.touch(key);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                self.entries.remove(&old);
                self.stats.evictions += 1;
            }
        }
    }

    fn touch(&mut self, key: ParamFingerprint) {
        if let Some(pos) = self.lru.iter().position(|x| *x == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key);
    }
}
