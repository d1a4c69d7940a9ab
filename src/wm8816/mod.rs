//! Protocol for the Wolfson WM8816 stereo digital volume control, bit-banged
//! over four GPIOs.
//!
//! Pins:
//! - CSB: chip select, active low
//! - MUTEB: mute, active low; independent of the serial interface
//! - DATA: bidirectional serial data
//! - CCLK: serial clock, driven by us; the chip samples on the rising edge
//!
//! Every transaction starts with an 8-bit register select frame, MSB first.
//! Bit 2 of the frame is the R/W flag (0 = write, 1 = read).
//!
//! - Write: frame, then 8 data bits; CSB going high commits. 16 CCLK cycles.
//! - Read: frame, then DATA is released, one dummy CCLK cycle, then the chip
//!   shifts out 8 data bits, MSB first. 17 CCLK cycles.
//!
//! There is no acknowledge and no parity.

mod low_level;
mod operations;
mod pins;
pub mod registers;

#[cfg(test)]
mod sim;

pub use self::low_level::{
	read_frame,
	write_frame,
};

pub use self::operations::Wm8816;

pub use self::pins::Pins;

pub use self::registers::{
	Channel,
	PeakStatus,
};
