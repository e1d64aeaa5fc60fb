//! Uniform 3-D spatial hash grid.
//!
//! Positions are bucketed into cubic cells of side `cell_size`.  A radius
//! query visits every cell overlapping the query cube (or every occupied
//! cell, when that is fewer) and then filters by exact squared distance,
//! so results are exact, not approximate.  Coordinates too large for a
//! cell key share the edge cell.
//!
//! Rebuilding keeps the per-cell `Vec` allocations of cells that were
//! occupied on the previous build; cells that stayed empty for a whole
//! build are dropped so a drifting flock does not grow the map forever.

use std::ops::RangeInclusive;

use rustc_hash::FxHashMap;

use hive_core::Vec3;

use crate::{NeighborIndex, SpatialError, SpatialResult};

/// Grid cell key - (x, y, z) cell coordinates
pub type CellKey = (i32, i32, i32);

/// Initial capacity for entity vectors within cells
const CELL_INITIAL_CAPACITY: usize = 8;

/// Occupancy summary for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HashStats {
    pub cells:        usize,
    pub objects:      usize,
    pub avg_per_cell: f32,
}

pub struct SpatialHash {
    cell_size:     f32,
    inv_cell_size: f32,
    cells:         FxHashMap<CellKey, Vec<usize>>,
    /// Snapshot of the positions from the last rebuild, indexed by slot.
    positions:     Vec<Vec3>,
}

impl SpatialHash {
    pub fn new(cell_size: f32) -> SpatialResult<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(SpatialError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: FxHashMap::default(),
            positions: Vec::new(),
        })
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    fn cell_of(&self, p: Vec3) -> CellKey {
        (
            (p.x * self.inv_cell_size).floor() as i32,
            (p.y * self.inv_cell_size).floor() as i32,
            (p.z * self.inv_cell_size).floor() as i32,
        )
    }

    pub fn stats(&self) -> HashStats {
        let occupied = self.cells.values().filter(|c| !c.is_empty()).count();
        let objects = self.positions.len();
        HashStats {
            cells: occupied,
            objects,
            avg_per_cell: if occupied > 0 { objects as f32 / occupied as f32 } else { 0.0 },
        }
    }
}

impl NeighborIndex for SpatialHash {
    fn rebuild(&mut self, positions: &[Vec3]) {
        self.cells.retain(|_, cell| !cell.is_empty());
        for cell in self.cells.values_mut() {
            cell.clear();
        }
        self.positions.clear();
        self.positions.extend_from_slice(positions);

        for (slot, &p) in positions.iter().enumerate() {
            let key = self.cell_of(p);
            self.cells
                .entry(key)
                .or_insert_with(|| Vec::with_capacity(CELL_INITIAL_CAPACITY))
                .push(slot);
        }
    }

    fn query_radius(
        &self,
        center:  Vec3,
        radius:  f32,
        exclude: Option<usize>,
        out:     &mut Vec<usize>,
    ) {
        if radius < 0.0 || self.positions.is_empty() {
            return;
        }
        let start = out.len();
        let reach = (radius * self.inv_cell_size).ceil() as i64;
        let (cx, cy, cz) = self.cell_of(center);
        let (xs, ys, zs) = (span(cx, reach), span(cy, reach), span(cz, reach));
        let r_sq = radius * radius;

        let mut scan = |cell: &[usize]| {
            for &slot in cell {
                if Some(slot) == exclude {
                    continue;
                }
                if self.positions[slot].distance_sq(center) <= r_sq {
                    out.push(slot);
                }
            }
        };

        // A cube wider than the occupied map is cheaper to answer by
        // walking the occupied cells.
        if width(&xs) * width(&ys) * width(&zs) > self.cells.len() as u128 {
            for ((x, y, z), cell) in &self.cells {
                if xs.contains(x) && ys.contains(y) && zs.contains(z) {
                    scan(cell.as_slice());
                }
            }
        } else {
            for x in xs {
                for y in ys.clone() {
                    for z in zs.clone() {
                        if let Some(cell) = self.cells.get(&(x, y, z)) {
                            scan(cell.as_slice());
                        }
                    }
                }
            }
        }

        out[start..].sort_unstable();
    }

    fn len(&self) -> usize {
        self.positions.len()
    }
}

/// Cell coordinates within `reach` of `c`, clipped to the key range.
fn span(c: i32, reach: i64) -> RangeInclusive<i32> {
    let lo = i64::from(c).saturating_sub(reach).max(i64::from(i32::MIN));
    let hi = i64::from(c).saturating_add(reach).min(i64::from(i32::MAX));
    lo as i32..=hi as i32
}

fn width(r: &RangeInclusive<i32>) -> u128 {
    (i64::from(*r.end()) - i64::from(*r.start()) + 1) as u128
}
