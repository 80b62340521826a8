mod decoder;
mod encoder;
mod framebuffer;
mod sample;
mod thumbnail;
mod timing;

pub use decoder::*;
pub use encoder::*;
pub use framebuffer::*;
pub use sample::*;
pub use thumbnail::*;
pub use timing::*;

/// Output port bit driving the vertical sync line. Active low.
pub const VSYNC: u8 = 0x80;

/// Output port bit driving the horizontal sync line. Active low.
pub const HSYNC: u8 = 0x40;

/// How many horizontal pixel slots one CPU cycle covers. The Gigatron runs at 6.25MHz against a
/// 25.175MHz VGA pixel clock, so every cycle is (almost exactly) four pixels wide.
pub const PIXELS_PER_TICK: u32 = 4;

/// Each 2-bit colour level is multiplied by this to get an 8-bit channel: 0, 85, 170, 255.
pub const LEVEL_SCALE: u8 = 85;

/// The thumbnail width in pixels.
pub const THUMBNAIL_WIDTH: usize = 160;

/// The thumbnail height in pixels.
pub const THUMBNAIL_HEIGHT: usize = 120;

/// Thumbnails are point sampled at this stride in both directions.
pub const THUMBNAIL_STRIDE: usize = 4;
