//! Raster reconstruction for the Gigatron's VGA output port.
//!
//! The Gigatron has no video chip: the CPU bit-bangs a single 8-bit output register once per
//! cycle, two bits of which are the sync lines and six of which feed a resistor DAC. A monitor
//! turns that into a picture by watching for sync pulses. [`vga::RasterDecoder`] does the same.

pub mod types;
pub mod vga;
