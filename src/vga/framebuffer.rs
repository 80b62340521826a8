use crate::types::{read_pixel, PixelSample, BYTES_PER_PIXEL};
use image::{ImageResult, RgbaImage};
use std::path::Path;

/// An RGBA pixel buffer, row-major, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// Create a black framebuffer with every alpha byte set to 255.
    pub fn new(width: usize, height: usize) -> Self {
        let mut pixels = vec![0; width * height * BYTES_PER_PIXEL];
        for pixel in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel[3] = 0xFF;
        }

        Self {
            width,
            height,
            pixels,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes, row-major, top to bottom.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// The pixel at the given coordinate, or `None` if it lies outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<PixelSample> {
        if x >= self.width || y >= self.height {
            return None;
        }
        read_pixel(&self.pixels, self.width, x, y)
    }

    /// Copy the buffer into an `image` crate image, e.g. for saving screenshots.
    pub fn to_image(&self) -> RgbaImage {
        // Dimensions come from a validated timing config and the buffer length always matches.
        RgbaImage::from_raw(self.width as u32, self.height as u32, self.pixels.clone())
            .unwrap_or_else(|| RgbaImage::new(self.width as u32, self.height as u32))
    }

    /// Save the buffer as an image, format picked from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        self.to_image().save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn starts_black_and_opaque() {
        let fb = Framebuffer::new(3, 2);
        assert_eq!(fb.as_bytes().len(), 3 * 2 * 4);
        for (i, &byte) in fb.as_bytes().iter().enumerate() {
            assert_eq!(byte, if i % 4 == 3 { 255 } else { 0 }, "byte {i}");
        }
    }

    #[test]
    fn pixel_lookup() {
        let mut fb = Framebuffer::new(3, 2);
        // (2, 1) in a 3 pixel wide buffer.
        let idx = (3 + 2) * 4;
        fb.as_bytes_mut()[idx..idx + 4].copy_from_slice(&[1, 2, 3, 4]);

        assert_eq!(fb.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(fb.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(fb.pixel(3, 0), None);
        assert_eq!(fb.pixel(0, 2), None);
    }

    #[test]
    fn converts_to_image() {
        let mut fb = Framebuffer::new(2, 2);
        fb.as_bytes_mut()[4..8].copy_from_slice(&[10, 20, 30, 255]);

        let image = fb.to_image();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(1, 0).0, [10, 20, 30, 255]);
        assert_eq!(image.get_pixel(0, 1).0, [0, 0, 0, 255]);
    }
}
