use crate::types::RgbSample;
use crate::vga::{HSYNC, LEVEL_SCALE, VSYNC};

/// One byte of the output port, as latched at the end of a CPU cycle.
///
/// Layout, from the top: `VHBBGGRR`. The two sync bits idle high and pulse low; the remaining
/// six bits are a 2-bit level per colour channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct OutputSample(pub u8);

impl OutputSample {
    /// Both sync lines idle, colour black. What the port shows in the blanking interval.
    pub const BLANK: Self = Self(VSYNC | HSYNC);

    /// Build a sample from colour levels (only the low two bits of each are used) and the
    /// electrical state of the sync lines, `true` meaning the line is high.
    pub fn from_levels(r: u8, g: u8, b: u8, hsync: bool, vsync: bool) -> Self {
        let mut value = (r & 3) | (g & 3) << 2 | (b & 3) << 4;
        if hsync {
            value |= HSYNC;
        }
        if vsync {
            value |= VSYNC;
        }
        Self(value)
    }

    /// 2-bit red level, bits 1..0.
    pub fn red(self) -> u8 {
        self.0 & 3
    }

    /// 2-bit green level, bits 3..2.
    pub fn green(self) -> u8 {
        (self.0 >> 2) & 3
    }

    /// 2-bit blue level, bits 5..4.
    pub fn blue(self) -> u8 {
        (self.0 >> 4) & 3
    }

    /// The colour this sample puts on the wire, each level scaled up to a full byte.
    pub fn rgb(self) -> RgbSample {
        [
            self.red() * LEVEL_SCALE,
            self.green() * LEVEL_SCALE,
            self.blue() * LEVEL_SCALE,
        ]
    }
}

impl From<u8> for OutputSample {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<OutputSample> for u8 {
    fn from(sample: OutputSample) -> Self {
        sample.0
    }
}

/// Bits that were high on the previous tick and are low now.
#[inline]
pub fn falling_edges(previous: OutputSample, current: OutputSample) -> u8 {
    previous.0 & !current.0
}
