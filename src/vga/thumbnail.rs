use crate::types::{read_pixel, PixelSample, BYTES_PER_PIXEL};
use crate::vga::{Framebuffer, THUMBNAIL_HEIGHT, THUMBNAIL_STRIDE, THUMBNAIL_WIDTH};
use image::RgbaImage;
use thiserror::Error;

/// Why a source buffer can't be turned into a thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimensionError {
    #[error("source is {width}x{height}, thumbnails need at least {min_width}x{min_height}")]
    SourceTooSmall { width: usize, height: usize, min_width: usize, min_height: usize },
    #[error("source buffer holds {actual} bytes, {width}x{height} RGBA needs {expected}")]
    BufferTooShort { width: usize, height: usize, expected: usize, actual: usize },
    #[error("source size {width}x{height} doesn't fit in memory")]
    TooLarge { width: usize, height: usize },
}

/// A 160x120 RGBA preview image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pixels: Box<[u8; THUMBNAIL_WIDTH * THUMBNAIL_HEIGHT * BYTES_PER_PIXEL]>,
}

impl Thumbnail {
    /// Raw RGBA bytes, row-major, top to bottom.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_slice()
    }

    /// The pixel at the given coordinate, or `None` if it lies outside the thumbnail.
    pub fn pixel(&self, x: usize, y: usize) -> Option<PixelSample> {
        if x >= THUMBNAIL_WIDTH || y >= THUMBNAIL_HEIGHT {
            return None;
        }
        read_pixel(self.as_bytes(), THUMBNAIL_WIDTH, x, y)
    }

    /// Copy into an `image` crate image for saving or scaling.
    pub fn to_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(THUMBNAIL_WIDTH as u32, THUMBNAIL_HEIGHT as u32);
        image.copy_from_slice(self.as_bytes());
        image
    }
}

/// Point samples a full-size frame down to a thumbnail by taking every fourth pixel of every
/// fourth row. No filtering: the Gigatron's palette is small enough that averaging would only
/// invent colours the machine can't produce.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThumbnailSampler;

impl ThumbnailSampler {
    /// The sampler holds no state; this is the same as `ThumbnailSampler::default()`.
    pub fn new() -> Self {
        Self
    }

    /// Sample a row-major RGBA buffer of `width` x `height` pixels.
    pub fn sample(
        &self,
        source: &[u8],
        width: usize,
        height: usize,
    ) -> Result<Thumbnail, DimensionError> {
        let min_width = THUMBNAIL_WIDTH * THUMBNAIL_STRIDE;
        let min_height = THUMBNAIL_HEIGHT * THUMBNAIL_STRIDE;
        if width < min_width || height < min_height {
            return Err(DimensionError::SourceTooSmall { width, height, min_width, min_height });
        }

        let expected = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
            .ok_or(DimensionError::TooLarge { width, height })?;
        if source.len() < expected {
            return Err(DimensionError::BufferTooShort {
                width,
                height,
                expected,
                actual: source.len(),
            });
        }

        let mut pixels = Box::new([0; THUMBNAIL_WIDTH * THUMBNAIL_HEIGHT * BYTES_PER_PIXEL]);
        for (idx, pixel) in pixels.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            let x = (idx % THUMBNAIL_WIDTH) * THUMBNAIL_STRIDE;
            let y = (idx / THUMBNAIL_WIDTH) * THUMBNAIL_STRIDE;
            let src = (y * width + x) * BYTES_PER_PIXEL;
            pixel.copy_from_slice(&source[src..src + BYTES_PER_PIXEL]);
        }

        Ok(Thumbnail { pixels })
    }

    /// Sample a decoder framebuffer, normally the committed one.
    pub fn sample_framebuffer(
        &self,
        framebuffer: &Framebuffer,
    ) -> Result<Thumbnail, DimensionError> {
        self.sample(framebuffer.as_bytes(), framebuffer.width(), framebuffer.height())
    }
}
