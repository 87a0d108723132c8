//! mozaik-pipeline: Pure grid pixelation pipeline (sans-IO).
//!
//! Converts a raster image into a blocky low-resolution rendition:
//! partition the image into an X-by-Y grid of pixel-exact cells, average
//! each cell down to one flat color (optionally grayscale), and reassemble
//! the flat cells into the output raster. The grid is processed as
//! stripes farmed out to a bounded pool of reusable worker threads.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! `RgbaImage` buffers and returns structured data. Decoding image files
//! and encoding results lives in the `mozaik` CLI crate.

pub mod average;
pub mod compositor;
pub mod partition;
pub mod scheduler;
pub mod stripe;
pub mod types;

pub use partition::{Partition, partition};
pub use stripe::StripeTask;
pub use types::{AveragedColor, Axis, PixelateError, PixelateOptions, Region, RgbaImage};

/// Pixelate `source` into an `x_cells` by `y_cells` grid of flat-colored
/// cells.
///
/// The output raster has the same pixel dimensions as the source; each
/// grid cell is filled with the floor-averaged color of the source pixels
/// it covers. With [`PixelateOptions::grayscale`] set, every cell color is
/// collapsed to luma. The call blocks until the whole grid is done,
/// parallelizing internally across up to
/// [`PixelateOptions::concurrency_limit`] worker threads (hardware
/// parallelism hint by default, always clamped to the stripe count).
///
/// Deterministic: identical inputs and options produce byte-identical
/// rasters regardless of the concurrency limit.
///
/// # Pipeline steps
///
/// 1. Validate and partition both axes (fails before any thread spawns)
/// 2. Orient: the axis with more cells is sliced into stripes
/// 3. Build one stripe task per outer-partition entry
/// 4. Dispatch to the worker pool; composite stripes as they land
///
/// # Errors
///
/// Returns [`PixelateError::InvalidDimension`] for a zero cell count,
/// [`PixelateError::DimensionExceedsSource`] when a cell count exceeds the
/// source extent on its axis, and [`PixelateError::CropFailure`] /
/// [`PixelateError::ProcessingFailure`] when a stripe fails mid-flight
/// (the whole call fails; workers are torn down first).
pub fn pixelate(
    source: &RgbaImage,
    x_cells: u32,
    y_cells: u32,
    options: &PixelateOptions,
) -> Result<RgbaImage, PixelateError> {
    // 1. Validate and partition both axes up front.
    let columns = partition(source.width(), x_cells)?;
    let rows = partition(source.height(), y_cells)?;

    // 2. The axis with the larger cell count becomes the outer axis,
    //    maximizing independently dispatchable stripes. Ties go to columns.
    let (axis, outer, inner) = if x_cells >= y_cells {
        (Axis::Columns, columns, rows)
    } else {
        (Axis::Rows, rows, columns)
    };

    // 3. One task per outer stripe, offsets in partition order.
    let tasks = scheduler::build_tasks(&outer);

    // 4. Dispatch, average, composite.
    scheduler::run_stripes(
        source,
        axis,
        tasks,
        &inner,
        options.grayscale,
        options.concurrency_limit,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn red_ten_by_ten_at_two_by_two_is_four_red_cells() {
        let source = RgbaImage::from_pixel(10, 10, image::Rgba([255, 0, 0, 255]));
        let result = pixelate(&source, 2, 2, &PixelateOptions::default()).unwrap();

        assert_eq!((result.width(), result.height()), (10, 10));
        for pixel in result.pixels() {
            assert_eq!(pixel.0, [255, 0, 0, 255]);
        }
    }

    #[test]
    fn zero_x_cells_is_invalid() {
        let source = RgbaImage::new(10, 10);
        assert_eq!(
            pixelate(&source, 0, 2, &PixelateOptions::default()),
            Err(PixelateError::InvalidDimension { count: 0 }),
        );
    }

    #[test]
    fn zero_y_cells_is_invalid() {
        let source = RgbaImage::new(10, 10);
        assert_eq!(
            pixelate(&source, 2, 0, &PixelateOptions::default()),
            Err(PixelateError::InvalidDimension { count: 0 }),
        );
    }

    #[test]
    fn cell_count_beyond_width_is_rejected() {
        let source = RgbaImage::new(10, 20);
        assert_eq!(
            pixelate(&source, 11, 2, &PixelateOptions::default()),
            Err(PixelateError::DimensionExceedsSource {
                count: 11,
                extent: 10,
            }),
        );
    }

    #[test]
    fn cell_count_beyond_height_is_rejected() {
        let source = RgbaImage::new(10, 20);
        assert_eq!(
            pixelate(&source, 2, 21, &PixelateOptions::default()),
            Err(PixelateError::DimensionExceedsSource {
                count: 21,
                extent: 20,
            }),
        );
    }

    #[test]
    fn more_columns_than_rows_slices_columns() {
        // Left half black, right half white, pixelated with one row:
        // a column-outer run still resolves each of the 4 columns.
        let source = RgbaImage::from_fn(8, 4, |x, _| {
            if x < 4 {
                image::Rgba([0, 0, 0, 255])
            } else {
                image::Rgba([255, 255, 255, 255])
            }
        });
        let result = pixelate(&source, 4, 1, &PixelateOptions::default()).unwrap();
        assert_eq!(result.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(result.get_pixel(7, 3).0, [255, 255, 255, 255]);
    }
}
