//! R*-tree neighbor index.
//!
//! Bulk-loads an `rstar` tree from the tick's positions (O(n log n)) and
//! answers radius queries with `locate_within_distance`.  Prefer it over the
//! hash grid when agents are spread very unevenly, e.g. a few dense hordes in
//! a large arena, where a fixed cell size is either too coarse or too fine.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use hive_core::Vec3;

use crate::NeighborIndex;

/// Lightweight position-only entry so the tree never holds agent state.
#[derive(Clone, Debug)]
struct SlotPoint {
    point: [f32; 3],
    slot:  usize,
}

impl RTreeObject for SlotPoint {
    type Envelope = AABB<[f32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for SlotPoint {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

#[derive(Default)]
pub struct RTreeIndex {
    tree: RTree<SlotPoint>,
}

impl RTreeIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NeighborIndex for RTreeIndex {
    fn rebuild(&mut self, positions: &[Vec3]) {
        let points = positions
            .iter()
            .enumerate()
            .map(|(slot, p)| SlotPoint { point: p.to_array(), slot })
            .collect();
        self.tree = RTree::bulk_load(points);
    }

    fn query_radius(
        &self,
        center:  Vec3,
        radius:  f32,
        exclude: Option<usize>,
        out:     &mut Vec<usize>,
    ) {
        if radius < 0.0 {
            return;
        }
        let start = out.len();
        out.extend(
            self.tree
                .locate_within_distance(center.to_array(), radius * radius)
                .map(|entry| entry.slot)
                .filter(|&slot| Some(slot) != exclude),
        );
        out[start..].sort_unstable();
    }

    fn len(&self) -> usize {
        self.tree.size()
    }
}
