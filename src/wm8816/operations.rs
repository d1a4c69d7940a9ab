use super::{
	Channel,
	PeakStatus,
	Pins,
	low_level::{
		Bus,
		read_frame,
		write_frame,
	},
	registers,
};
use crate::gpio::{
	Direction,
	Gpio,
	Level,
};

/// One WM8816 on its own set of four pins.
///
/// Every call runs to completion and leaves DATA/CCLK as outputs driven low
/// with CSB high. Nothing is cached: the chip is the only copy of its
/// registers.
///
/// There is no locking; share a driver between threads only behind a mutex.
pub struct Wm8816<G: Gpio> {
	bus: Bus<G>,
}

impl<G: Gpio> Wm8816<G> {
	pub fn new(gpio: G, pins: Pins) -> Self {
		Wm8816 {
			bus: Bus { gpio, pins },
		}
	}

	pub fn pins(&self) -> &Pins {
		&self.bus.pins
	}

	pub fn release(self) -> (G, Pins) {
		(self.bus.gpio, self.bus.pins)
	}

	/// All pins to output, chip deselected and unmuted.
	///
	/// Must run once before anything else; running it again just restores
	/// the same state.
	pub fn initialize(&mut self) {
		let pins = self.bus.pins;
		for &pin in &pins.all() {
			self.bus.gpio.set_direction(pin, Direction::Output);
		}
		self.bus.gpio.set_level(pins.chip_select(), Level::High);
		self.bus.gpio.set_level(pins.mute(), Level::High);
		self.bus.idle();
		debug!("WM8816 on pins {}: initialized", pins);
	}

	/// Write `value` into `register`.
	///
	/// Bit 2 of `register` is replaced by the write flag. The chip doesn't
	/// acknowledge anything, so there's no way to tell whether it listened.
	pub fn write_register(&mut self, register: u8, value: u8) {
		let frame = write_frame(register);
		trace!("WM8816 write @{:08b}: {:08b}", frame, value);

		let mut tx = self.bus.start_transaction();
		tx.shift_out(frame, 8);
		tx.shift_out(value, 8);
	}

	/// Read the current value of `register`.
	///
	/// Bit 2 of `register` is replaced by the read flag. Without a chip on
	/// the pins this returns whatever the floating DATA line reads as.
	pub fn read_register(&mut self, register: u8) -> u8 {
		let frame = read_frame(register);

		let value = {
			let mut tx = self.bus.start_transaction();
			tx.shift_out(frame, 8);
			let mut tx = tx.start_receive();
			tx.shift_in(8)
		};

		trace!("WM8816 read @{:08b}: {:08b}", frame, value);
		value
	}

	pub fn mute(&mut self) {
		let mute = self.bus.pins.mute();
		self.bus.gpio.set_level(mute, Level::Low);
	}

	pub fn unmute(&mut self) {
		let mute = self.bus.pins.mute();
		self.bus.gpio.set_level(mute, Level::High);
	}

	pub fn set_gain(&mut self, channel: Channel, gain: u8) {
		self.write_register(channel.gain_register(), gain);
	}

	/// `None` for `Channel::Both`, which can only be written.
	pub fn gain(&mut self, channel: Channel) -> Option<u8> {
		if !channel.is_readable() {
			return None;
		}
		Some(self.read_register(channel.gain_register()))
	}

	pub fn peak_status(&mut self) -> PeakStatus {
		PeakStatus(self.read_register(registers::PEAK_DETECTOR_STATUS))
	}

	pub fn set_peak_reference(&mut self, reference: u8) {
		self.write_register(registers::PEAK_DETECTOR_REF, reference);
	}
}
