//! Reassembly of finished stripes into the destination raster.
//!
//! Stripes complete in arbitrary order; each lands at a fixed offset that
//! was determined when its task was built. Stripes are disjoint by
//! construction, so placements commute and the final raster is identical
//! regardless of completion order. The compositor is the only writer of
//! the destination, which keeps the averaging hot path lock-free.

use image::imageops;

use crate::stripe::StripeTask;
use crate::types::{Axis, RgbaImage};

/// Accumulates completed stripes into the destination raster.
#[derive(Debug)]
pub struct Compositor {
    destination: RgbaImage,
    axis: Axis,
    expected: usize,
    placed: usize,
}

impl Compositor {
    /// Create a compositor for a `width` x `height` destination expecting
    /// `expected` stripes along `axis`.
    #[must_use]
    pub fn new(width: u32, height: u32, axis: Axis, expected: usize) -> Self {
        Self {
            destination: RgbaImage::new(width, height),
            axis,
            expected,
            placed: 0,
        }
    }

    /// Blit a completed stripe at its task's outer offset.
    ///
    /// The inner-axis offset is always zero: a stripe spans the full
    /// destination extent on that axis.
    pub fn place(&mut self, task: StripeTask, stripe: &RgbaImage) {
        let (x, y) = match self.axis {
            Axis::Columns => (i64::from(task.outer_offset), 0),
            Axis::Rows => (0, i64::from(task.outer_offset)),
        };
        imageops::replace(&mut self.destination, stripe, x, y);
        self.placed += 1;
    }

    /// Whether every expected stripe has landed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.placed == self.expected
    }

    /// Consume the compositor and return the destination raster.
    ///
    /// Only meaningful once [`is_complete`](Self::is_complete) is true;
    /// unplaced areas are transparent black.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.destination
    }
}
