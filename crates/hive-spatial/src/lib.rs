//! `hive-spatial`: neighbor indexes rebuilt from agent positions every tick.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                     |
//! |-----------|--------------------------------------------------------------|
//! | [`index`] | `NeighborIndex` trait                                        |
//! | [`hash`]  | `SpatialHash` - uniform 3-D hash grid (default)              |
//! | [`rtree`] | `RTreeIndex` - bulk-loaded R*-tree via `rstar`               |
//! | [`error`] | `SpatialError`, `SpatialResult<T>`                           |
//!
//! # Contract
//!
//! An index is derived data.  It is rebuilt wholesale from a slice of
//! positions at the start of a tick and is read-only for the rest of that
//! tick, so queries always see one frozen snapshot.  Entries are identified
//! by their slot in that slice; results come back in ascending slot order
//! so any reduction over neighbors is independent of index internals.

pub mod error;
pub mod hash;
pub mod index;
pub mod rtree;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use hash::{HashStats, SpatialHash};
pub use index::NeighborIndex;
pub use rtree::RTreeIndex;
