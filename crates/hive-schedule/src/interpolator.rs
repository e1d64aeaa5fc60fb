//! Exponential smoothing of entity positions toward their latest target.
//!
//! Unlike the engine's snapshot interpolation, which blends two captured
//! states by alpha, an [`Interpolator`] chases a target each time it is
//! read.  Suited to positions arriving at irregular intervals (network
//! updates, externally driven markers).

use rustc_hash::FxHashMap;

use hive_core::{AgentId, Vec3};

/// Fraction of the remaining gap closed per read.
pub const DEFAULT_SMOOTHNESS: f32 = 0.3;

#[derive(Debug, Clone, Copy)]
struct Tracked {
    current: Vec3,
    target:  Vec3,
}

#[derive(Debug, Clone)]
pub struct Interpolator {
    smoothness: f32,
    entries:    FxHashMap<AgentId, Tracked>,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHNESS)
    }
}

impl Interpolator {
    /// `smoothness` is clamped into `[0, 1]`; 1 snaps straight to the target.
    pub fn new(smoothness: f32) -> Self {
        Self {
            smoothness: smoothness.clamp(0.0, 1.0),
            entries:    FxHashMap::default(),
        }
    }

    /// Set the target for `id`.  The first call for an id places it directly
    /// at the target.
    pub fn set_position(&mut self, id: AgentId, target: Vec3) {
        self.entries
            .entry(id)
            .and_modify(|t| t.target = target)
            .or_insert(Tracked { current: target, target });
    }

    /// Step `id` one smoothing increment toward its target and return the
    /// new position.
    pub fn position(&mut self, id: AgentId) -> Option<Vec3> {
        let s = self.smoothness;
        self.entries.get_mut(&id).map(|t| {
            t.current += (t.target - t.current) * s;
            t.current
        })
    }

    pub fn target_position(&self, id: AgentId) -> Option<Vec3> {
        self.entries.get(&id).map(|t| t.target)
    }

    pub fn remove(&mut self, id: AgentId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn smoothness(&self) -> f32 {
        self.smoothness
    }
}
