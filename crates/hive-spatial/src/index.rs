//! The pluggable neighbor-index trait.

use hive_core::Vec3;

/// A spatial structure answering "who is within `radius` of this point?".
///
/// `hive-flock` calls queries through this trait, so applications can swap
/// the default hash grid for a tree (or anything else) without touching the
/// steering code.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: with the `parallel` feature the
/// force phase queries one index from many Rayon workers at once.
pub trait NeighborIndex: Send + Sync {
    /// Discard all entries and index `positions`; slot `i` is `positions[i]`.
    fn rebuild(&mut self, positions: &[Vec3]);

    /// Append to `out` every slot within `radius` (inclusive) of `center`,
    /// skipping `exclude`, in ascending slot order.
    fn query_radius(
        &self,
        center:  Vec3,
        radius:  f32,
        exclude: Option<usize>,
        out:     &mut Vec<usize>,
    );

    /// Number of indexed entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
