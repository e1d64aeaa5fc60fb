//! `hive-core`: foundational types for the hive simulation core.
//!
//! Every other `hive-*` crate depends on this one.  It has no `hive-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `BoidId`, `NodeId`                         |
//! | [`vec3`]    | `Vec3` - single-precision 3-D vector                  |
//! | [`time`]    | `Tick`, `SimClock`                                    |
//! | [`rng`]     | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`error`]   | `HiveError`                                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;
pub mod vec3;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::HiveError;
pub use ids::{AgentId, BoidId, NodeId};
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, Tick};
pub use vec3::Vec3;
