//! Shared types for the mozaik pixelation pipeline.

use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can reference source and
/// destination rasters without depending on `image` directly.
pub use image::RgbaImage;

/// A rectangular pixel region within a source raster.
///
/// Coordinates are in pixels from the top-left corner. A region is a pure
/// description; whether it actually fits inside a given raster is checked
/// at the point of use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Left edge (pixels from the left of the source).
    pub x: u32,
    /// Top edge (pixels from the top of the source).
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Region {
    /// Create a new region.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of pixels covered by the region.
    #[must_use]
    pub fn pixel_count(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Whether the region lies entirely inside a raster of the given size.
    ///
    /// An empty region (zero width or height) never fits: there is nothing
    /// to average.
    #[must_use]
    pub fn fits_within(self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }
}

/// The flat color a cell collapses to: one channel-wise mean of the cell's
/// source pixels, floored to integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AveragedColor {
    /// Red channel, 0-255.
    pub r: u8,
    /// Green channel, 0-255.
    pub g: u8,
    /// Blue channel, 0-255.
    pub b: u8,
    /// Alpha channel, 0-255.
    pub a: u8,
}

impl AveragedColor {
    /// Create a new averaged color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Collapse the color channels to luminance, keeping alpha.
    ///
    /// Uses the standard luma weights `0.299*R + 0.587*G + 0.114*B`,
    /// computed in integer arithmetic as `(299*R + 587*G + 114*B) / 1000`,
    /// which is exactly the floor of the floating-point formula for u8
    /// inputs.
    #[must_use]
    pub fn to_luma(self) -> Self {
        let weighted =
            299 * u32::from(self.r) + 587 * u32::from(self.g) + 114 * u32::from(self.b);
        // weighted / 1000 <= 255 since the weights sum to 1000.
        #[allow(clippy::cast_possible_truncation)]
        let luma = (weighted / 1000) as u8;
        Self {
            r: luma,
            g: luma,
            b: luma,
            a: self.a,
        }
    }

    /// Convert to an `image` crate pixel.
    #[must_use]
    pub const fn to_pixel(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Which axis of the grid is sliced into stripes (the *outer* axis).
///
/// The other axis becomes the *inner* axis, subdivided within each stripe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Stripes are full-height columns; the inner partition runs down rows.
    Columns,
    /// Stripes are full-width rows; the inner partition runs across columns.
    Rows,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Columns => f.write_str("columns"),
            Self::Rows => f.write_str("rows"),
        }
    }
}

/// Options controlling a pixelation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelateOptions {
    /// Collapse every cell's averaged color to grayscale (R=G=B luma).
    pub grayscale: bool,

    /// Maximum number of worker threads for this call.
    ///
    /// `None` uses the hardware parallelism hint. The effective pool size
    /// is always clamped to the stripe count, so small grids never spawn
    /// idle workers.
    pub concurrency_limit: Option<NonZeroUsize>,
}

/// Errors produced by the pixelation pipeline.
///
/// The first two variants are validation errors, raised synchronously
/// before any worker thread is spawned. The last two are task failures
/// that abort the whole call after worker teardown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum PixelateError {
    /// A cell count was zero.
    #[error("cell count must be a positive integer, got {count}")]
    InvalidDimension {
        /// The offending cell count.
        count: u32,
    },

    /// A cell count exceeded the source extent on its axis, which would
    /// require cells narrower than one pixel.
    #[error("cell count {count} exceeds the source extent of {extent} pixels")]
    DimensionExceedsSource {
        /// The offending cell count.
        count: u32,
        /// The source extent on that axis.
        extent: u32,
    },

    /// A stripe or cell region could not be read from the source raster.
    #[error("cannot crop {region:?} from a {width}x{height} source")]
    CropFailure {
        /// The region that was requested.
        region: Region,
        /// Source raster width.
        width: u32,
        /// Source raster height.
        height: u32,
    },

    /// An executor failed while averaging or painting a stripe.
    #[error("stripe processing failed: {0}")]
    ProcessingFailure(String),
}
