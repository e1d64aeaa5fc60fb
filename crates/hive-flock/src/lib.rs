//! `hive-flock`: Reynolds boids with formation slots.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`system`]    | `FlockingSystem` - population, targets, per-tick update    |
//! | [`boid`]      | `Boid` kinematics, `seek`, `integrate`                     |
//! | [`config`]    | `FlockConfig` radii, weights, arena, limits, wander, seed  |
//! | [`formation`] | `FormationKind`, `get_formation` - pure slot layouts       |
//! | [`error`]     | `FlockError`, `FlockResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                       |
//! |------------|--------------------------------------------------------------|
//! | `parallel` | Steering forces computed with Rayon; identical results.      |
//! | `serde`    | Serde derives on `FlockConfig`, `Boid`, `FormationKind`.     |

pub mod boid;
pub mod config;
pub mod error;
pub mod formation;
pub mod system;


pub use boid::Boid;
pub use config::FlockConfig;
pub use error::{FlockError, FlockResult};
pub use formation::{DEFAULT_SPACING, FormationKind, get_formation};
pub use system::FlockingSystem;
