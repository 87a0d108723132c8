//! Exact integer partitioning of a pixel dimension into grid cells.
//!
//! Splitting a `D`-pixel axis into `N` cells with plain integer division
//! either loses `D mod N` pixels or forces one oversized cell at an edge.
//! [`partition`] instead produces `N` extents that sum to exactly `D`,
//! spreading the `D mod N` one-pixel-larger cells evenly across the
//! sequence so the size variation is not visible as banding at one end.

use serde::{Deserialize, Serialize};

use crate::types::PixelateError;

/// An ordered sequence of per-cell pixel extents along one axis.
///
/// Invariants, established by [`partition`] and never mutated afterwards:
/// the entries are positive, sum to the partitioned dimension, and each is
/// either `floor(D/N)` or `floor(D/N) + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition(Vec<u32>);

impl Partition {
    /// Number of cells in the partition.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the partition has no cells.
    ///
    /// Never true for a partition built by [`partition`], which rejects a
    /// zero cell count.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The per-cell extents as a slice, in axis order.
    #[must_use]
    pub fn extents(&self) -> &[u32] {
        &self.0
    }

    /// Sum of all extents; equals the partitioned dimension.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.iter().copied().map(u64::from).sum()
    }

    /// Iterate over the extents in axis order.
    pub fn iter(&self) -> std::slice::Iter<'_, u32> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a u32;
    type IntoIter = std::slice::Iter<'a, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Partition `dimension` pixels into `count` cell extents.
///
/// Let `base = dimension / count` and `rem = dimension % count`. All cells
/// start at `base`; the `rem` cells at indices `floor(i * count / rem)`
/// (for `i` in `0..rem`) grow to `base + 1`. Those indices are strictly
/// increasing, so exactly `rem` distinct cells grow and the extents sum to
/// `dimension`. The result is deterministic for a fixed `(dimension,
/// count)` pair, and uniform when `rem` is zero.
///
/// # Errors
///
/// Returns [`PixelateError::InvalidDimension`] if `count` is zero, and
/// [`PixelateError::DimensionExceedsSource`] if `count > dimension` (cells
/// would be narrower than one pixel).
pub fn partition(dimension: u32, count: u32) -> Result<Partition, PixelateError> {
    if count == 0 {
        return Err(PixelateError::InvalidDimension { count });
    }
    if count > dimension {
        return Err(PixelateError::DimensionExceedsSource {
            count,
            extent: dimension,
        });
    }

    let base = dimension / count;
    let rem = dimension % count;

    let mut extents = vec![base; count as usize];
    for i in 0..rem {
        // i * count stays within u64 for any pair of u32 inputs, and the
        // resulting index is < count, so the usize cast is lossless.
        #[allow(clippy::cast_possible_truncation)]
        let index = (u64::from(i) * u64::from(count) / u64::from(rem)) as usize;
        extents[index] += 1;
    }

    Ok(Partition(extents))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn exact_division_is_uniform() {
        let p = partition(100, 4).unwrap();
        assert_eq!(p.extents(), &[25, 25, 25, 25]);
    }

    #[test]
    fn eleven_into_three_staggers_the_extra_pixel() {
        // base 3, remainder 2: the two larger cells land at indices 0 and 1,
        // not clustered at the trailing edge.
        let p = partition(11, 3).unwrap();
        assert_eq!(p.extents(), &[4, 4, 3]);
    }

    #[test]
    fn remainder_cells_are_spread_not_clustered() {
        // 10 into 4: base 2, remainder 2 -> increments at indices 0 and 2.
        let p = partition(10, 4).unwrap();
        assert_eq!(p.extents(), &[3, 2, 3, 2]);
    }

    #[test]
    fn single_cell_takes_the_whole_dimension() {
        let p = partition(17, 1).unwrap();
        assert_eq!(p.extents(), &[17]);
    }

    #[test]
    fn one_pixel_cells_when_count_equals_dimension() {
        let p = partition(5, 5).unwrap();
        assert_eq!(p.extents(), &[1, 1, 1, 1, 1]);
    }

    #[test]
    fn zero_count_is_invalid() {
        assert_eq!(
            partition(10, 0),
            Err(PixelateError::InvalidDimension { count: 0 }),
        );
    }

    #[test]
    fn count_exceeding_dimension_is_rejected() {
        assert_eq!(
            partition(10, 11),
            Err(PixelateError::DimensionExceedsSource {
                count: 11,
                extent: 10,
            }),
        );
    }

    #[test]
    fn zero_dimension_is_rejected_for_any_count() {
        assert_eq!(
            partition(0, 1),
            Err(PixelateError::DimensionExceedsSource {
                count: 1,
                extent: 0,
            }),
        );
    }

    #[test]
    fn partition_properties_hold_across_a_grid_of_inputs() {
        for dimension in 1..=64u32 {
            for count in 1..=dimension {
                let p = partition(dimension, count).unwrap();
                let base = dimension / count;

                assert_eq!(p.len(), count as usize, "length for D={dimension} N={count}");
                assert_eq!(p.total(), u64::from(dimension), "sum for D={dimension} N={count}");
                for &extent in p.extents() {
                    assert!(extent > 0, "positive extents for D={dimension} N={count}");
                    assert!(
                        extent == base || extent == base + 1,
                        "extent {extent} out of range for D={dimension} N={count}",
                    );
                }
            }
        }
    }

    #[test]
    fn partition_is_deterministic() {
        assert_eq!(partition(1920, 7).unwrap(), partition(1920, 7).unwrap());
    }

    #[test]
    fn uniform_whenever_remainder_is_zero() {
        for count in 1..=16u32 {
            let p = partition(count * 12, count).unwrap();
            assert!(p.iter().all(|&e| e == 12), "N={count}");
        }
    }
}
