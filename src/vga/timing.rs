use std::fmt;
use thiserror::Error;

/// Which raster axis a timing value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// Timing that no decoder can be built from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{axis} visible region is empty")]
    EmptyVisibleRegion { axis: Axis },
    #[error("{axis} timing overflows: back porch {back_porch} + pulse {pulse} + visible {visible}")]
    Overflow { axis: Axis, back_porch: u32, pulse: u32, visible: u32 },
}

/// Timing of one raster axis. Horizontal values are in pixels, vertical values in lines.
///
/// A line (or frame) is laid out as: sync pulse, back porch, visible region, front porch. The
/// decoder starts counting at the falling edge of the pulse, so only the first three matter to
/// it; the front porch is only needed to generate a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisTiming {
    /// Blanking between the end of the visible region and the next sync pulse.
    pub front_porch: u32,

    /// Width of the sync pulse itself.
    pub pulse: u32,

    /// Blanking between the end of the sync pulse and the visible region.
    pub back_porch: u32,

    /// Size of the visible region. Must not be zero.
    pub visible: u32,
}

impl AxisTiming {
    /// First visible position, counted from the start of the sync pulse.
    pub fn min_pos(&self) -> u32 {
        self.back_porch + self.pulse
    }

    /// One past the last visible position.
    pub fn max_pos(&self) -> u32 {
        self.min_pos() + self.visible
    }

    /// Length of a whole line or frame.
    pub fn total(&self) -> u32 {
        self.front_porch + self.max_pos()
    }

    fn validate(&self, axis: Axis) -> Result<(), ConfigError> {
        if self.visible == 0 {
            return Err(ConfigError::EmptyVisibleRegion { axis });
        }

        // The decoder keeps rows in an i32, so the vertical window has to fit in one.
        let limit = match axis {
            Axis::Horizontal => u32::MAX,
            Axis::Vertical => i32::MAX as u32,
        };
        let total = self
            .back_porch
            .checked_add(self.pulse)
            .and_then(|pos| pos.checked_add(self.visible))
            .and_then(|pos| pos.checked_add(self.front_porch));
        match total {
            Some(total) if total <= limit => Ok(()),
            _ => Err(ConfigError::Overflow {
                axis,
                back_porch: self.back_porch,
                pulse: self.pulse,
                visible: self.visible,
            }),
        }
    }
}

/// Monitor timing for both axes, fixed for the lifetime of a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    /// Horizontal timing, in pixels.
    pub horizontal: AxisTiming,

    /// Vertical timing, in lines.
    pub vertical: AxisTiming,
}

impl TimingConfig {
    /// Industry standard 640x480 @ 60Hz, which is what the Gigatron ROM generates.
    pub const GIGATRON: Self = Self {
        horizontal: AxisTiming { front_porch: 16, pulse: 96, back_porch: 48, visible: 640 },
        vertical: AxisTiming { front_porch: 10, pulse: 2, back_porch: 33, visible: 480 },
    };

    /// Check both axes have a visible region and that every window bound fits its counter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.horizontal.validate(Axis::Horizontal)?;
        self.vertical.validate(Axis::Vertical)
    }

    /// Framebuffer size, `(width, height)` in pixels.
    pub fn visible_size(&self) -> (usize, usize) {
        (self.horizontal.visible as usize, self.vertical.visible as usize)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::GIGATRON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn axis(back_porch: u32, pulse: u32, visible: u32) -> AxisTiming {
        AxisTiming { front_porch: 0, pulse, back_porch, visible }
    }

    #[test]
    fn gigatron_window() {
        let timing = TimingConfig::GIGATRON;
        timing.validate().unwrap();

        assert_eq!(timing.horizontal.min_pos(), 144);
        assert_eq!(timing.horizontal.max_pos(), 784);
        assert_eq!(timing.horizontal.total(), 800);
        assert_eq!(timing.vertical.min_pos(), 35);
        assert_eq!(timing.vertical.max_pos(), 515);
        assert_eq!(timing.vertical.total(), 525);
        assert_eq!(timing.visible_size(), (640, 480));
    }

    #[test]
    fn rejects_empty_visible_region() {
        let timing = TimingConfig { horizontal: axis(2, 2, 0), vertical: axis(1, 1, 2) };
        assert_eq!(
            timing.validate(),
            Err(ConfigError::EmptyVisibleRegion { axis: Axis::Horizontal })
        );

        let timing = TimingConfig { horizontal: axis(2, 2, 4), vertical: axis(1, 1, 0) };
        assert_eq!(
            timing.validate(),
            Err(ConfigError::EmptyVisibleRegion { axis: Axis::Vertical })
        );
    }

    #[test]
    fn zero_porches_are_fine() {
        let timing = TimingConfig { horizontal: axis(0, 0, 4), vertical: axis(0, 0, 1) };
        assert_eq!(timing.validate(), Ok(()));
    }

    #[test]
    fn rejects_overflow() {
        let timing = TimingConfig { horizontal: axis(u32::MAX, 1, 4), vertical: axis(1, 1, 2) };
        assert!(matches!(
            timing.validate(),
            Err(ConfigError::Overflow { axis: Axis::Horizontal, .. })
        ));

        let timing = TimingConfig { horizontal: axis(2, 2, 4), vertical: axis(0, 0, u32::MAX) };
        assert!(matches!(
            timing.validate(),
            Err(ConfigError::Overflow { axis: Axis::Vertical, .. })
        ));
    }
}
