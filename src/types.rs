/// A single emulated CPU cycle. The decoder and the encoder both count time in ticks, so the
/// signal is perfectly periodic and there is no floating point drift to worry about.
pub type Tick = u64;

/// The type for an rgba pixel sample.
pub type PixelSample = [u8; 4];

/// The type for a decoded RGB color, one byte per channel.
pub type RgbSample = [u8; 3];

/// Number of bytes in one RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Read the pixel at `(x, y)` out of a row-major RGBA buffer `width` pixels wide.
pub(crate) fn read_pixel(buf: &[u8], width: usize, x: usize, y: usize) -> Option<PixelSample> {
    let idx = (y * width + x) * BYTES_PER_PIXEL;
    let pixel = buf.get(idx..idx + BYTES_PER_PIXEL)?;
    Some([pixel[0], pixel[1], pixel[2], pixel[3]])
}
