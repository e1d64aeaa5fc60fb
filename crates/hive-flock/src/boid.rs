//! A single flocking agent and its integration step.

use hive_core::{BoidId, Vec3};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boid {
    pub id:           BoidId,
    pub position:     Vec3,
    pub velocity:     Vec3,
    /// Force accumulated this tick; zeroed by [`integrate`][Self::integrate].
    pub acceleration: Vec3,
    pub max_speed:    f32,
    pub max_force:    f32,
    /// Personal seek target.  Overrides the flock's shared target.
    pub seek_target:  Option<Vec3>,
}

impl Boid {
    pub fn new(id: BoidId, position: Vec3, velocity: Vec3, max_speed: f32, max_force: f32) -> Self {
        Self {
            id,
            position,
            velocity: velocity.clamp_length(max_speed),
            acceleration: Vec3::ZERO,
            max_speed,
            max_force,
            seek_target: None,
        }
    }

    #[inline]
    pub fn apply_force(&mut self, force: Vec3) {
        self.acceleration += force;
    }

    /// Semi-implicit Euler: velocity first (clamped to `max_speed`), then
    /// position from the new velocity.  Clears the accumulated force.
    pub fn integrate(&mut self, dt: f32) {
        self.velocity = (self.velocity + self.acceleration * dt).clamp_length(self.max_speed);
        self.position += self.velocity * dt;
        self.acceleration = Vec3::ZERO;
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Heading on the x/z plane, radians.
    #[inline]
    pub fn heading(&self) -> f32 {
        self.velocity.z.atan2(self.velocity.x)
    }

    /// Steering force toward `target` at full speed, clamped to `max_force`.
    pub fn seek(&self, target: Vec3) -> Vec3 {
        let desired = (target - self.position).normalize() * self.max_speed;
        (desired - self.velocity).clamp_length(self.max_force)
    }
}
