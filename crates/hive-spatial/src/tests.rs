//! Unit tests for hive-spatial.

use hive_core::Vec3;

use crate::{NeighborIndex, RTreeIndex, SpatialHash};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Five points: a tight cluster of three around the origin and two far away.
fn sample_points() -> Vec<Vec3> {
    vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 1.5),
        Vec3::new(30.0, 0.0, 0.0),
        Vec3::new(-40.0, 5.0, -40.0),
    ]
}

fn query<I: NeighborIndex>(idx: &I, center: Vec3, radius: f32, exclude: Option<usize>) -> Vec<usize> {
    let mut out = Vec::new();
    idx.query_radius(center, radius, exclude, &mut out);
    out
}

/// Brute-force reference answer.
fn brute(points: &[Vec3], center: Vec3, radius: f32, exclude: Option<usize>) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(i, p)| Some(*i) != exclude && p.distance_sq(center) <= radius * radius)
        .map(|(i, _)| i)
        .collect()
}

// ── SpatialHash ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod spatial_hash {
    use super::*;

    #[test]
    fn rejects_bad_cell_size() {
        assert!(SpatialHash::new(0.0).is_err());
        assert!(SpatialHash::new(-2.0).is_err());
        assert!(SpatialHash::new(f32::NAN).is_err());
    }

    #[test]
    fn query_excludes_self() {
        let mut idx = SpatialHash::new(5.0).unwrap();
        idx.rebuild(&sample_points());
        assert_eq!(query(&idx, Vec3::ZERO, 2.0, Some(0)), vec![1, 2]);
    }

    #[test]
    fn boundary_distance_is_inclusive() {
        let mut idx = SpatialHash::new(5.0).unwrap();
        idx.rebuild(&sample_points());
        assert_eq!(query(&idx, Vec3::ZERO, 1.0, Some(0)), vec![1]);
    }

    #[test]
    fn radius_larger_than_cell_spans_cells() {
        let mut idx = SpatialHash::new(1.0).unwrap();
        let points = sample_points();
        idx.rebuild(&points);
        let got = query(&idx, Vec3::new(10.0, 0.0, 0.0), 25.0, None);
        assert_eq!(got, brute(&points, Vec3::new(10.0, 0.0, 0.0), 25.0, None));
    }

    #[test]
    fn negative_coordinates_bucket_correctly() {
        let mut idx = SpatialHash::new(5.0).unwrap();
        let points = vec![Vec3::new(-0.1, 0.0, 0.0), Vec3::new(0.1, 0.0, 0.0)];
        idx.rebuild(&points);
        assert_eq!(query(&idx, Vec3::new(-0.1, 0.0, 0.0), 0.5, Some(0)), vec![1]);
    }

    #[test]
    fn rebuild_replaces_previous_contents() {
        let mut idx = SpatialHash::new(5.0).unwrap();
        idx.rebuild(&sample_points());
        idx.rebuild(&[Vec3::new(100.0, 0.0, 0.0)]);
        assert_eq!(idx.len(), 1);
        assert!(query(&idx, Vec3::ZERO, 3.0, None).is_empty());
        assert_eq!(query(&idx, Vec3::new(99.0, 0.0, 0.0), 3.0, None), vec![0]);
    }

    #[test]
    fn stats_count_occupied_cells() {
        let mut idx = SpatialHash::new(5.0).unwrap();
        idx.rebuild(&sample_points());
        let stats = idx.stats();
        assert_eq!(stats.objects, 5);
        assert_eq!(stats.cells, 3);
        assert!((stats.avg_per_cell - 5.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn results_are_sorted_and_appended() {
        let mut idx = SpatialHash::new(0.5).unwrap();
        idx.rebuild(&sample_points());
        let mut out = vec![99];
        idx.query_radius(Vec3::ZERO, 2.0, None, &mut out);
        assert_eq!(out, vec![99, 0, 1, 2]);
    }

    #[test]
    fn far_coordinates_share_edge_cells() {
        let points = vec![
            Vec3::new(2e10, 0.0, 0.0),
            Vec3::new(-2e10, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let mut idx = SpatialHash::new(1.0).unwrap();
        idx.rebuild(&points);

        assert_eq!(query(&idx, points[0], 5.0, None), vec![0]);
        assert_eq!(query(&idx, points[1], 5.0, Some(1)), Vec::<usize>::new());
        assert_eq!(query(&idx, Vec3::ZERO, 2.0, None), vec![2, 3]);
        assert_eq!(query(&idx, points[0], f32::INFINITY, None), vec![0, 1, 2, 3]);
    }

    #[test]
    fn radius_far_beyond_cell_size() {
        let points = sample_points();
        let mut idx = SpatialHash::new(0.5).unwrap();
        idx.rebuild(&points);
        for radius in [40.0, 1000.0] {
            assert_eq!(
                query(&idx, Vec3::ZERO, radius, Some(0)),
                brute(&points, Vec3::ZERO, radius, Some(0)),
            );
        }
    }
}

// ── RTreeIndex ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rtree_index {
    use super::*;

    #[test]
    fn matches_brute_force() {
        let points = sample_points();
        let mut idx = RTreeIndex::new();
        idx.rebuild(&points);
        for (center, radius) in [
            (Vec3::ZERO, 2.0),
            (Vec3::new(15.0, 0.0, 0.0), 20.0),
            (Vec3::new(-40.0, 5.0, -40.0), 0.1),
        ] {
            assert_eq!(query(&idx, center, radius, None), brute(&points, center, radius, None));
        }
    }

    #[test]
    fn agrees_with_hash_grid() {
        let points = sample_points();
        let mut tree = RTreeIndex::new();
        let mut grid = SpatialHash::new(2.0).unwrap();
        tree.rebuild(&points);
        grid.rebuild(&points);
        for slot in 0..points.len() {
            assert_eq!(
                query(&tree, points[slot], 5.0, Some(slot)),
                query(&grid, points[slot], 5.0, Some(slot)),
            );
        }
    }

    #[test]
    fn empty_index() {
        let idx = RTreeIndex::new();
        assert!(idx.is_empty());
        assert!(query(&idx, Vec3::ZERO, 10.0, None).is_empty());
    }
}
