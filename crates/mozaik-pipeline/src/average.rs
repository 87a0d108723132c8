//! Reduction of a pixel region to a single averaged color.
//!
//! Each grid cell collapses to the unweighted arithmetic mean of its
//! source pixels, computed per channel and floored to an integer. Cell
//! boundaries are pixel-aligned by construction (see `partition`), so no
//! fractional area weighting is needed.

use crate::types::{AveragedColor, PixelateError, Region, RgbaImage};

/// Average all pixels of `region` in `source` to one RGBA color.
///
/// Sums R, G, B, and A independently over the region and floor-divides
/// each by the pixel count. The sums are held in `u64`, which cannot
/// overflow for any raster the `image` crate can represent.
///
/// # Errors
///
/// Returns [`PixelateError::CropFailure`] if the region is empty or does
/// not lie entirely inside the source raster.
pub fn average_region(source: &RgbaImage, region: Region) -> Result<AveragedColor, PixelateError> {
    if !region.fits_within(source.width(), source.height()) {
        return Err(PixelateError::CropFailure {
            region,
            width: source.width(),
            height: source.height(),
        });
    }

    let mut sums = [0u64; 4];
    for y in region.y..region.y + region.height {
        for x in region.x..region.x + region.width {
            let pixel = source.get_pixel(x, y).0;
            for (sum, &channel) in sums.iter_mut().zip(&pixel) {
                *sum += u64::from(channel);
            }
        }
    }

    let count = region.pixel_count();
    // Each mean is a sum of u8 values divided by their count, so the u8
    // cast is lossless.
    #[allow(clippy::cast_possible_truncation)]
    let mean = |channel: usize| (sums[channel] / count) as u8;

    Ok(AveragedColor::new(mean(0), mean(1), mean(2), mean(3)))
}
