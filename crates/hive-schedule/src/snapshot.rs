//! Captured entity state for render interpolation.

use rustc_hash::FxHashMap;

use hive_core::{AgentId, Vec3};

/// The interpolatable state of one entity at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityState {
    pub position: Vec3,
    /// Heading in radians.
    pub rotation: f32,
}

/// A scalar component of [`EntityState`] that can be interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateProperty {
    X,
    Y,
    Z,
    Rotation,
}

impl EntityState {
    #[inline]
    pub fn get(&self, property: StateProperty) -> f32 {
        match property {
            StateProperty::X => self.position.x,
            StateProperty::Y => self.position.y,
            StateProperty::Z => self.position.z,
            StateProperty::Rotation => self.rotation,
        }
    }
}

/// Every entity's state at `time` (engine seconds).
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub time:     f64,
    pub entities: FxHashMap<AgentId, EntityState>,
}

impl Snapshot {
    pub fn new(time: f64) -> Self {
        Self { time, entities: FxHashMap::default() }
    }

    pub fn insert(&mut self, id: AgentId, state: EntityState) {
        self.entities.insert(id, state);
    }

    pub fn get(&self, id: AgentId) -> Option<&EntityState> {
        self.entities.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
