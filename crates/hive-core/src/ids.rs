//! Newtype identifiers for agents, boids and behavior-tree nodes.
//!
//! Each id is a `u32` newtype that is `Copy`, hashable and totally ordered.
//! Agent and boid ids are handed out monotonically and never reused, so
//! they double as a stable registration order.

use std::fmt;

/// Declares one id newtype plus its helpers.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// The raw value widened to `usize`.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// The id after this one.
            #[inline(always)]
            pub fn next(self) -> $name {
                $name(self.0 + 1)
            }
        }

        impl Default for $name {
            /// `INVALID`, never a real id.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// An autonomous agent registered with a simulation world.
    pub struct AgentId(u32);
}

typed_id! {
    /// A boid registered with a flocking system.
    pub struct BoidId(u32);
}

typed_id! {
    /// Index of a node inside one behavior tree's arena.
    pub struct NodeId(u32);
}
