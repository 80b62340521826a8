use crate::types::{read_pixel, Tick, BYTES_PER_PIXEL};
use crate::vga::{ConfigError, OutputSample, TimingConfig, PIXELS_PER_TICK};
use image::imageops::{self, FilterType};
use image::ImageError;
use std::io::Cursor;
use thiserror::Error;

/// Why an encoder couldn't be built.
#[derive(Debug, Error)]
pub enum EncoderError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("error loading image: {0}")]
    Image(#[from] ImageError),
}

/// Generates the output port signal the Gigatron would produce for a still picture, so the
/// decoder can be driven without a CPU.
///
/// Every line starts with the horizontal sync pulse, followed by the back porch, the visible
/// pixels and the front porch. Every frame starts with the vertical sync pulse, which falls on the
/// same tick as the horizontal one. Sync pulses are at least one tick wide even if the timing asks
/// for zero, otherwise there would be no edge to find.
#[derive(Debug, Clone)]
pub struct VgaEncoder {
    timing: TimingConfig,
    width: usize,
    height: usize,
    pixel_buffer: Vec<u8>,
    pulse_ticks: u64,
    first_visible_tick: u64,
    end_visible_tick: u64,
    ticks_per_line: u64,
    pulse_lines: u64,
    lines_per_frame: u64,
}

impl VgaEncoder {
    /// Create an encoder for an RGBA picture exactly the size of the visible region.
    pub fn new(timing: TimingConfig, pixel_buffer: Vec<u8>) -> Result<Self, EncoderError> {
        timing.validate()?;

        let (width, height) = timing.visible_size();
        let expected = width * height * BYTES_PER_PIXEL;
        if pixel_buffer.len() != expected {
            return Err(EncoderError::BufferSize { expected, actual: pixel_buffer.len() });
        }

        let ticks = |pixels: u32| u64::from(pixels.div_ceil(PIXELS_PER_TICK));
        let h = timing.horizontal;
        let v = timing.vertical;

        let pulse_ticks = ticks(h.pulse).max(1);
        let pulse_lines = u64::from(v.pulse).max(1);

        Ok(Self {
            timing,
            width,
            height,
            pixel_buffer,
            pulse_ticks,
            first_visible_tick: ticks(h.min_pos()),
            end_visible_tick: ticks(h.max_pos()),
            ticks_per_line: ticks(h.total()).max(pulse_ticks + 1),
            pulse_lines,
            lines_per_frame: u64::from(v.total()).max(pulse_lines + 1),
        })
    }

    /// Load any image format the `image` crate understands, scaled to the visible region.
    pub fn from_image_buf(timing: TimingConfig, buf: &[u8]) -> Result<Self, EncoderError> {
        timing.validate()?;

        let img = image::io::Reader::new(Cursor::new(buf))
            .with_guessed_format()
            .map_err(ImageError::IoError)?
            .decode()?
            .into_rgba8();

        let (width, height) = (timing.horizontal.visible, timing.vertical.visible);
        let img = if img.dimensions() == (width, height) {
            img
        } else {
            log::debug!("Scaling {}x{} image to {width}x{height}", img.width(), img.height());
            imageops::resize(&img, width, height, FilterType::Nearest)
        };

        Self::new(timing, img.into_raw())
    }

    /// Bars of all 64 colours the Gigatron can show, blue in the most significant position.
    /// Bar edges fall on tick boundaries, so the picture survives a trip through the decoder.
    pub fn test_pattern(timing: TimingConfig) -> Result<Self, EncoderError> {
        timing.validate()?;

        let (width, height) = timing.visible_size();
        let group_width = PIXELS_PER_TICK as usize;
        let groups = width.div_ceil(group_width);
        let mut pixel_buffer = vec![0; width * height * BYTES_PER_PIXEL];
        for (idx, pixel) in pixel_buffer.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            let group = idx % width / group_width;
            let bar = (group * 64 / groups) as u8;
            let sample = OutputSample(bar);
            let [r, g, b] = sample.rgb();
            pixel.copy_from_slice(&[r, g, b, 0xFF]);
        }

        Self::new(timing, pixel_buffer)
    }

    /// The timing the signal is generated for.
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Length of one scan line in CPU cycles.
    pub fn ticks_per_line(&self) -> u64 {
        self.ticks_per_line
    }

    /// Length of one whole frame in CPU cycles.
    pub fn ticks_per_frame(&self) -> u64 {
        self.ticks_per_line * self.lines_per_frame
    }

    /// The output port value on the given tick. The signal repeats every frame.
    pub fn sample(&self, tick: Tick) -> OutputSample {
        let line_tick = tick % self.ticks_per_line;
        let line = (tick / self.ticks_per_line) % self.lines_per_frame;

        let hsync = line_tick >= self.pulse_ticks;
        let vsync = line >= self.pulse_lines;

        let [r, g, b] = self.visible_pixel(line_tick, line).unwrap_or([0; 3]);
        OutputSample::from_levels(r, g, b, hsync, vsync)
    }

    /// Quantized colour levels for the pixel group shown on the given tick, if it's visible.
    fn visible_pixel(&self, line_tick: u64, line: u64) -> Option<[u8; 3]> {
        if !(self.first_visible_tick..self.end_visible_tick).contains(&line_tick) {
            return None;
        }

        let y = line.checked_sub(u64::from(self.timing.vertical.min_pos()))? as usize;
        let x = ((line_tick - self.first_visible_tick) * u64::from(PIXELS_PER_TICK)) as usize;
        if y >= self.height || x >= self.width {
            return None;
        }

        let [r, g, b, _] = read_pixel(&self.pixel_buffer, self.width, x, y)?;
        Some([quantize(r), quantize(g), quantize(b)])
    }
}

/// Round an 8-bit channel to the nearest of the four DAC levels.
fn quantize(channel: u8) -> u8 {
    ((u16::from(channel) * 3 + 127) / 255) as u8
}
