//! Per-stripe pixelation: one unit of concurrent work.
//!
//! A stripe is a full-height column (or full-width row) of grid cells.
//! Processing a stripe means averaging each of its inner cells from the
//! shared source raster and painting the result as a flat rectangle into
//! a stripe-sized output raster. Stripes read disjoint slices of the
//! source and own their outputs, so concurrently running stripes share no
//! mutable state.

use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::average::average_region;
use crate::partition::Partition;
use crate::types::{Axis, PixelateError, Region, RgbaImage};

/// One queued unit of work: a single stripe along the outer axis.
///
/// Created once by the scheduler, consumed exactly once by a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripeTask {
    /// Pixel extent of the stripe along the outer axis.
    pub outer_size: u32,
    /// Pixel offset of the stripe's leading edge along the outer axis.
    pub outer_offset: u32,
}

/// Pixelate one stripe of the source.
///
/// For every inner cell, in canonical scan order: crop the corresponding
/// source sub-region, average it (optionally collapsing to luma), and
/// paint the flat color into the stripe-local output raster. The output
/// matches the stripe's pixel dimensions exactly; no pixel outside the
/// stripe is read or written.
///
/// # Errors
///
/// Returns [`PixelateError::CropFailure`] if a cell region falls outside
/// the source, and [`PixelateError::ProcessingFailure`] if a paint
/// coordinate cannot be represented.
pub fn process_stripe(
    source: &RgbaImage,
    axis: Axis,
    task: StripeTask,
    inner: &Partition,
    grayscale: bool,
) -> Result<RgbaImage, PixelateError> {
    let (stripe_width, stripe_height) = match axis {
        Axis::Columns => (task.outer_size, source.height()),
        Axis::Rows => (source.width(), task.outer_size),
    };
    let mut output = RgbaImage::new(stripe_width, stripe_height);

    let mut inner_offset = 0u32;
    for &extent in inner {
        let cell = match axis {
            Axis::Columns => Region::new(task.outer_offset, inner_offset, task.outer_size, extent),
            Axis::Rows => Region::new(inner_offset, task.outer_offset, extent, task.outer_size),
        };

        let mut color = average_region(source, cell)?;
        if grayscale {
            color = color.to_luma();
        }

        // Same rectangle as `cell`, but in stripe-local coordinates:
        // the outer offset collapses to zero.
        let local = match axis {
            Axis::Columns => local_rect(0, inner_offset, task.outer_size, extent)?,
            Axis::Rows => local_rect(inner_offset, 0, extent, task.outer_size)?,
        };
        draw_filled_rect_mut(&mut output, local, color.to_pixel());

        inner_offset += extent;
    }

    Ok(output)
}

/// Build an `imageproc` rectangle from unsigned stripe-local coordinates.
///
/// `Rect` carries `i32` positions; a source large enough to push an
/// offset past `i32::MAX` cannot be painted and surfaces as a
/// [`PixelateError::ProcessingFailure`].
fn local_rect(x: u32, y: u32, width: u32, height: u32) -> Result<Rect, PixelateError> {
    let (x, y) = match (i32::try_from(x), i32::try_from(y)) {
        (Ok(x), Ok(y)) => (x, y),
        _ => {
            return Err(PixelateError::ProcessingFailure(format!(
                "cell offset ({x}, {y}) exceeds the paintable coordinate range",
            )));
        }
    };
    Ok(Rect::at(x, y).of_size(width, height))
}
