//! `hive-sim`: the world that ties scheduling, decisions and flocking
//! together.
//!
//! # Fixed tick
//!
//! ```text
//! for each fixed step the engine grants:
//!   ① Perceive - each body sees its boid's position and velocity.
//!   ② Think    - each brain (behavior tree or GOAP planner) runs once;
//!                bodies queue Intents.
//!   ③ Apply    - in agent registration order:
//!                  SeekPosition(p)     → boid's personal seek target
//!                  StopSeeking         → clear it
//!                  SetFlockTarget(p)   → shared flock target (last wins)
//!                  ClearFlockTarget    → clear it
//!                  Despawn             → removed after all other intents
//!   ④ Move     - FlockingSystem::update(fixed_step)
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Flock steering forces on Rayon's thread pool.          |
//! | `serde`    | `WorldConfig` (and nested configs) load from JSON etc. |
//!
//! # Quick-start
//!
//! ```rust
//! use hive_core::Vec3;
//! use hive_sim::{AgentBody, Intent, NoopObserver, SimWorld, WorldConfig};
//!
//! struct Drone;
//!
//! impl AgentBody for Drone {
//!     fn drain_intents(&mut self, _out: &mut Vec<Intent>) {}
//! }
//!
//! let mut world = SimWorld::new(WorldConfig::default()).unwrap();
//! let id = world.spawn(Drone, Some(Vec3::new(0.0, 0.0, 0.0)));
//! world.set_flock_target(Vec3::new(10.0, 0.0, 0.0));
//! world.run_ticks(60, &mut NoopObserver);
//! assert!(world.position(id).is_some());
//! ```

pub mod brain;
pub mod builder;
pub mod config;
pub mod error;
pub mod intent;
pub mod observer;
pub mod world;

#[cfg(test)]
mod tests;

pub use brain::{AgentBody, Brain, GoapBrain, Perception, TreeBrain};
pub use builder::WorldBuilder;
pub use config::WorldConfig;
pub use error::{SimError, SimResult};
pub use intent::Intent;
pub use observer::{NoopObserver, SimObserver};
pub use world::SimWorld;
