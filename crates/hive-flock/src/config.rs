//! Flocking parameters.

use crate::{FlockError, FlockResult};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FlockConfig {
    // ── Neighbor radii ────────────────────────────────────────────────────
    pub separation_distance: f32,
    pub alignment_distance:  f32,
    pub cohesion_distance:   f32,

    // ── Weights (bounds, wander and target seek are unweighted) ───────────
    pub separation_weight: f32,
    pub alignment_weight:  f32,
    pub cohesion_weight:   f32,

    // ── Arena ─────────────────────────────────────────────────────────────
    /// Edge length of the square arena on x/z, centered on the origin.
    pub bounds_size:       f32,
    /// Distance from the edge at which the push back starts.
    pub bounds_padding:    f32,
    pub bounds_turn_force: f32,

    /// Spatial hash cell edge length.
    pub cell_size: f32,

    // ── Per-boid limits applied at spawn ──────────────────────────────────
    pub max_speed: f32,
    pub max_force: f32,

    // ── Wander ────────────────────────────────────────────────────────────
    pub wander_radius:   f32,
    pub wander_distance: f32,
    /// Scale of the per-tick random change in wander angle (radians).
    pub wander_jitter:   f32,
    pub wander_weight:   f32,

    /// Seeds spawn velocities and wander jitter.
    pub seed: u64,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            separation_distance: 2.0,
            alignment_distance:  5.0,
            cohesion_distance:   5.0,
            separation_weight:   1.5,
            alignment_weight:    1.0,
            cohesion_weight:     1.0,
            bounds_size:         50.0,
            bounds_padding:      5.0,
            bounds_turn_force:   0.5,
            cell_size:           5.0,
            max_speed:           5.0,
            max_force:           0.1,
            wander_radius:       1.0,
            wander_distance:     2.0,
            wander_jitter:       0.5,
            wander_weight:       0.5,
            seed:                0,
        }
    }
}

impl FlockConfig {
    pub fn validate(&self) -> FlockResult<()> {
        let non_negative = [
            ("separation_distance", self.separation_distance),
            ("alignment_distance",  self.alignment_distance),
            ("cohesion_distance",   self.cohesion_distance),
            ("bounds_padding",      self.bounds_padding),
            ("max_force",           self.max_force),
            ("wander_radius",       self.wander_radius),
            ("wander_distance",     self.wander_distance),
            ("wander_jitter",       self.wander_jitter),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(FlockError::InvalidParameter { name, value });
            }
        }

        let positive = [
            ("bounds_size", self.bounds_size),
            ("cell_size",   self.cell_size),
            ("max_speed",   self.max_speed),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(FlockError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    /// Largest of the three neighbor radii; one query at this radius serves
    /// all three rules.
    pub fn query_radius(&self) -> f32 {
        self.separation_distance
            .max(self.alignment_distance)
            .max(self.cohesion_distance)
    }
}
