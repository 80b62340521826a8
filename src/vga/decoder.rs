use crate::types::BYTES_PER_PIXEL;
use crate::vga::{
    falling_edges, ConfigError, Framebuffer, OutputSample, TimingConfig, HSYNC, PIXELS_PER_TICK,
    VSYNC,
};

/// Where the decoder thinks the beam is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterPosition {
    /// Line number, counted from the start of the vertical sync pulse. Sits at -1 between the
    /// vertical sync edge and the next horizontal sync edge.
    pub row: i32,

    /// Pixel column, counted from the start of the horizontal sync pulse.
    pub col: u32,

    /// Byte offset of the next pixel to paint.
    pub pixel_cursor: usize,

    /// The sample seen on the previous tick, for edge detection.
    pub previous_sample: OutputSample,
}

impl RasterPosition {
    fn blank() -> Self {
        Self {
            row: 0,
            col: 0,
            pixel_cursor: 0,
            previous_sample: OutputSample(0),
        }
    }
}

/// Handed out on every vertical sync falling edge: the last complete frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameCommit<'a> {
    frame: &'a Framebuffer,
    number: u64,
}

impl<'a> FrameCommit<'a> {
    /// The completed frame.
    pub fn frame(&self) -> &'a Framebuffer {
        self.frame
    }

    /// How many frames were committed before this one.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Take a private copy, for sinks that want to keep the frame past the next tick.
    pub fn to_owned_frame(&self) -> Framebuffer {
        self.frame.clone()
    }
}

/// Reconstructs a picture from the Gigatron's output port the way a VGA monitor would: by
/// counting pixels from the falling edge of each horizontal sync pulse and lines from the falling
/// edge of each vertical sync pulse.
///
/// The decoder has to see every single cycle, in order. A dropped or repeated tick shifts the
/// rest of the line and nothing but the next sync edge will bring it back in line.
#[derive(Debug, Clone)]
pub struct RasterDecoder {
    timing: TimingConfig,
    min_row: i32,
    max_row: i32,
    min_col: u32,
    max_col: u32,
    position: RasterPosition,
    framebuffer: Framebuffer,
    committed: Framebuffer,
    frames_committed: u64,
}

impl RasterDecoder {
    /// Create a decoder with a black framebuffer sized to the visible region. The committed frame
    /// starts out black too, so a sink can show it before the first tick.
    pub fn new(timing: TimingConfig) -> Result<Self, ConfigError> {
        timing.validate()?;

        let (width, height) = timing.visible_size();
        log::debug!(
            "Creating raster decoder: {width}x{height}, columns {}..{}, rows {}..{}",
            timing.horizontal.min_pos(),
            timing.horizontal.max_pos(),
            timing.vertical.min_pos(),
            timing.vertical.max_pos()
        );

        // validate() guarantees the vertical window fits in an i32.
        Ok(Self {
            timing,
            min_row: timing.vertical.min_pos() as i32,
            max_row: timing.vertical.max_pos() as i32,
            min_col: timing.horizontal.min_pos(),
            max_col: timing.horizontal.max_pos(),
            position: RasterPosition::blank(),
            framebuffer: Framebuffer::new(width, height),
            committed: Framebuffer::new(width, height),
            frames_committed: 0,
        })
    }

    /// Feed the output port value for one CPU cycle.
    ///
    /// Returns a commit on the cycle the vertical sync line falls, carrying the frame that was
    /// painted since the previous one.
    pub fn advance(&mut self, sample: OutputSample) -> Option<FrameCommit<'_>> {
        let falling = falling_edges(self.position.previous_sample, sample);

        let new_frame = falling & VSYNC != 0;
        if new_frame {
            // The horizontal sync edge that follows brings this to 0.
            self.position.row = -1;
            self.position.pixel_cursor = 0;
            self.commit();
        }

        if falling & HSYNC != 0 {
            self.position.col = 0;
            self.position.row = self.position.row.saturating_add(1);
        }

        self.position.previous_sample = sample;

        self.paint(sample);
        self.position.col = self.position.col.saturating_add(PIXELS_PER_TICK);

        new_frame.then(|| FrameCommit {
            frame: &self.committed,
            number: self.frames_committed - 1,
        })
    }

    fn commit(&mut self) {
        self.committed.as_bytes_mut().copy_from_slice(self.framebuffer.as_bytes());
        self.frames_committed += 1;
    }

    fn paint(&mut self, sample: OutputSample) {
        let pos = &mut self.position;
        if pos.row < self.min_row
            || pos.row >= self.max_row
            || pos.col < self.min_col
            || pos.col >= self.max_col
        {
            return;
        }

        // A group never runs past the end of the framebuffer row it started in, so a visible
        // width that isn't a multiple of four clips the last group of each line.
        let width = self.framebuffer.width();
        let row_left = width - (pos.pixel_cursor / BYTES_PER_PIXEL) % width;
        let count = row_left.min(PIXELS_PER_TICK as usize);
        let start = pos.pixel_cursor;
        let end = start + count * BYTES_PER_PIXEL;
        let Some(pixels) = self.framebuffer.as_bytes_mut().get_mut(start..end) else {
            return;
        };

        let [r, g, b] = sample.rgb();
        for pixel in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&[r, g, b, 0xFF]);
        }
        pos.pixel_cursor = end;
    }

    /// The timing this decoder was built with.
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Snapshot of the beam position, for debuggers and tests.
    pub fn position(&self) -> RasterPosition {
        self.position
    }

    /// The frame being painted right now. May be torn; use [`Self::committed_frame`] to present.
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// The frame handed out by the most recent commit. Before the first commit this is the black
    /// frame the decoder starts with, ready to present straight away.
    pub fn committed_frame(&self) -> &Framebuffer {
        &self.committed
    }

    /// Number of vertical sync edges seen so far.
    pub fn frames_committed(&self) -> u64 {
        self.frames_committed
    }
}
