//! The flocking system: steering rules and the per-tick update.
//!
//! # Tick structure
//!
//! ```text
//! 1. snapshot positions, rebuild the neighbor index
//! 2. compute every boid's steering force against that frozen snapshot
//!    (optionally on Rayon's pool)
//! 3. integrate every boid in registration order
//! ```
//!
//! Step 2 only reads boid kinematics; the one piece of per-boid mutable
//! state it touches (wander angle and RNG) lives in a parallel `Vec` so a
//! shared borrow of all boids and a mutable borrow of one boid's wander
//! state can coexist.

use tracing::trace;

use hive_core::{AgentRng, BoidId, Vec3};
use hive_spatial::{NeighborIndex, SpatialHash};

use crate::{
    Boid, FlockConfig, FlockError, FlockResult, FormationKind, formation::get_formation,
};

// ── Wander state ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct WanderState {
    angle: f32,
    rng:   AgentRng,
}

// ── FlockingSystem ────────────────────────────────────────────────────────────

pub struct FlockingSystem<I: NeighborIndex = SpatialHash> {
    config: FlockConfig,

    /// Registration order.  Parallel to `wander`.
    boids:  Vec<Boid>,
    wander: Vec<WanderState>,

    index:   I,
    target:  Option<Vec3>,
    next_id: BoidId,

    // Per-tick scratch, kept to avoid reallocating.
    positions: Vec<Vec3>,
    forces:    Vec<Vec3>,
}

impl FlockingSystem<SpatialHash> {
    /// A system backed by a hash grid with `config.cell_size` cells.
    pub fn new(config: FlockConfig) -> FlockResult<Self> {
        config.validate()?;
        let index = SpatialHash::new(config.cell_size)?;
        Self::with_index(config, index)
    }
}

impl<I: NeighborIndex> FlockingSystem<I> {
    /// A system using a caller-supplied neighbor index.
    pub fn with_index(config: FlockConfig, index: I) -> FlockResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            boids:     Vec::new(),
            wander:    Vec::new(),
            index,
            target:    None,
            next_id:   BoidId(0),
            positions: Vec::new(),
            forces:    Vec::new(),
        })
    }

    // ── Population ────────────────────────────────────────────────────────

    /// Spawn a boid at `position` with a small random non-zero velocity.
    ///
    /// The velocity and the boid's wander stream are both drawn from an
    /// RNG seeded by `(config.seed, id)`, so spawns replay identically.
    pub fn add_boid(&mut self, position: Vec3) -> BoidId {
        let id = self.next_id;
        self.next_id = id.next();

        let mut rng = AgentRng::for_boid(self.config.seed, id);
        let mut velocity = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if velocity.length_sq() == 0.0 {
            velocity = Vec3::new(1.0, 0.0, 0.0);
        }

        self.boids.push(Boid::new(
            id,
            position,
            velocity,
            self.config.max_speed,
            self.config.max_force,
        ));
        self.wander.push(WanderState { angle: 0.0, rng });
        id
    }

    /// Remove a boid.  The remaining boids keep their relative order.
    pub fn remove_boid(&mut self, id: BoidId) -> FlockResult<Boid> {
        let slot = self.slot_of(id).ok_or(FlockError::BoidNotFound(id))?;
        self.wander.remove(slot);
        Ok(self.boids.remove(slot))
    }

    pub fn boid_count(&self) -> usize {
        self.boids.len()
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn boid(&self, id: BoidId) -> Option<&Boid> {
        self.slot_of(id).map(|s| &self.boids[s])
    }

    pub fn boid_mut(&mut self, id: BoidId) -> Option<&mut Boid> {
        self.slot_of(id).map(|s| &mut self.boids[s])
    }

    /// Ids are handed out in increasing order and removal preserves order,
    /// so the boid list is always sorted by id.
    fn slot_of(&self, id: BoidId) -> Option<usize> {
        self.boids.binary_search_by_key(&id, |b| b.id).ok()
    }

    // ── Targets ───────────────────────────────────────────────────────────

    /// Shared target every boid without a personal seek target steers to.
    pub fn set_target(&mut self, target: Vec3) {
        self.target = Some(target);
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    /// Set or clear one boid's personal seek target.
    pub fn set_seek_target(&mut self, id: BoidId, target: Option<Vec3>) -> FlockResult<()> {
        let boid = self.boid_mut(id).ok_or(FlockError::BoidNotFound(id))?;
        boid.seek_target = target;
        Ok(())
    }

    /// Give every boid, in registration order, a slot of `kind` around
    /// `center` as its personal seek target.  Slots share `center.y`.
    pub fn assign_formation(&mut self, kind: FormationKind, center: Vec3, spacing: f32) {
        let slots = get_formation(kind, self.boids.len(), center.x, center.z, spacing);
        for (boid, slot) in self.boids.iter_mut().zip(slots) {
            boid.seek_target = Some(Vec3::new(slot.x, center.y, slot.z));
        }
    }

    /// Drop every personal seek target.
    pub fn clear_formation(&mut self) {
        for boid in &mut self.boids {
            boid.seek_target = None;
        }
    }

    // ── Update ────────────────────────────────────────────────────────────

    /// Advance every boid by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.boids.is_empty() {
            return;
        }

        self.positions.clear();
        self.positions.extend(self.boids.iter().map(|b| b.position));
        self.index.rebuild(&self.positions);

        self.compute_forces();

        for (boid, &force) in self.boids.iter_mut().zip(&self.forces) {
            boid.apply_force(force);
            boid.integrate(dt);
        }

        trace!(boids = self.boids.len(), dt, "flock updated");
    }

    fn compute_forces(&mut self) {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let boids = &self.boids;
        let index = &self.index;
        let config = &self.config;
        let target = self.target;
        let forces = &mut self.forces;

        #[cfg(not(feature = "parallel"))]
        {
            let mut scratch = Vec::new();
            forces.clear();
            forces.extend(self.wander.iter_mut().enumerate().map(|(slot, wander)| {
                steer(slot, boids, index, config, target, wander, &mut scratch)
            }));
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.wander
                .par_iter_mut()
                .enumerate()
                .map_init(Vec::new, |scratch, (slot, wander)| {
                    steer(slot, boids, index, config, target, wander, scratch)
                })
                .collect_into_vec(forces);
        }
    }

    // ── Output ────────────────────────────────────────────────────────────

    /// Flat `[x, y, z, 1]` per boid in registration order, ready to upload
    /// as an instance buffer.
    pub fn get_positions(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.boids.len() * 4);
        self.write_positions(&mut out);
        out
    }

    /// [`get_positions`][Self::get_positions] into an existing buffer.
    pub fn write_positions(&self, out: &mut Vec<f32>) {
        out.clear();
        for b in &self.boids {
            out.extend_from_slice(&[b.position.x, b.position.y, b.position.z, 1.0]);
        }
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn index(&self) -> &I {
        &self.index
    }
}

// ── Steering rules ────────────────────────────────────────────────────────────

/// Total steering force on `boids[slot]`.
///
/// `weighted(separation, alignment, cohesion) + bounds + wander + seek`.
fn steer<I: NeighborIndex>(
    slot:    usize,
    boids:   &[Boid],
    index:   &I,
    config:  &FlockConfig,
    target:  Option<Vec3>,
    wander:  &mut WanderState,
    scratch: &mut Vec<usize>,
) -> Vec3 {
    let boid = &boids[slot];

    scratch.clear();
    index.query_radius(boid.position, config.query_radius(), Some(slot), scratch);

    let sep_sq = config.separation_distance * config.separation_distance;
    let ali_sq = config.alignment_distance * config.alignment_distance;
    let coh_sq = config.cohesion_distance * config.cohesion_distance;

    let mut away = Vec3::ZERO;
    let mut away_n = 0u32;
    let mut heading = Vec3::ZERO;
    let mut heading_n = 0u32;
    let mut centroid = Vec3::ZERO;
    let mut centroid_n = 0u32;

    for &j in scratch.iter() {
        let other = &boids[j];
        let diff = boid.position - other.position;
        let d_sq = diff.length_sq();

        if d_sq <= sep_sq && d_sq > 0.0 {
            let d = d_sq.sqrt();
            away += diff.normalize() / d;
            away_n += 1;
        }
        if d_sq <= ali_sq {
            heading += other.velocity;
            heading_n += 1;
        }
        if d_sq <= coh_sq {
            centroid += other.position;
            centroid_n += 1;
        }
    }

    let separation = if away_n > 0 {
        steer_toward(boid, away / away_n as f32)
    } else {
        Vec3::ZERO
    };
    let alignment = if heading_n > 0 {
        steer_toward(boid, heading / heading_n as f32)
    } else {
        Vec3::ZERO
    };
    let cohesion = if centroid_n > 0 {
        boid.seek(centroid / centroid_n as f32)
    } else {
        Vec3::ZERO
    };

    let seek = match boid.seek_target.or(target) {
        Some(t) => boid.seek(t),
        None => Vec3::ZERO,
    };

    separation * config.separation_weight
        + alignment * config.alignment_weight
        + cohesion * config.cohesion_weight
        + bounds(boid, config)
        + wander_force(boid, config, wander)
        + seek
}

/// Reynolds steering: desired velocity along `direction` at full speed,
/// minus current velocity, clamped.
fn steer_toward(boid: &Boid, direction: Vec3) -> Vec3 {
    let desired = direction.normalize() * boid.max_speed;
    (desired - boid.velocity).clamp_length(boid.max_force)
}

/// Constant push back toward the middle near the x/z edges.  Later checks
/// win on each axis.
fn bounds(boid: &Boid, config: &FlockConfig) -> Vec3 {
    let half = config.bounds_size / 2.0;
    let inner = half - config.bounds_padding;
    let push = config.bounds_turn_force;
    let p = boid.position;

    let mut steering = Vec3::ZERO;
    if p.x < -inner {
        steering.x = push;
    }
    if p.x > inner {
        steering.x = -push;
    }
    if p.z < -inner {
        steering.z = push;
    }
    if p.z > inner {
        steering.z = -push;
    }
    steering
}

/// Seek a point on a circle projected ahead of the boid; the point drifts
/// by a random jitter each tick.
fn wander_force(boid: &Boid, config: &FlockConfig, state: &mut WanderState) -> Vec3 {
    state.angle += state.rng.centered() * config.wander_jitter;

    let circle = boid.position + boid.velocity.normalize() * config.wander_distance;
    let theta = state.angle + boid.heading();
    let offset = Vec3::new(
        config.wander_radius * theta.cos(),
        0.0,
        config.wander_radius * theta.sin(),
    );

    boid.seek(circle + offset) * config.wander_weight
}
