use super::Pins;
use crate::gpio::{
	Direction,
	Gpio,
	Level,
};

// CSB low to first data bit
const SELECT_SETUP_US: u32 = 10;

// write path (and the register select frame of a read): symmetric
const SEND_SETUP_US: u32 = 5;
const SEND_CLOCK_HIGH_US: u32 = 5;

// read path: short setup before sampling, extra settle after the falling edge
const RECEIVE_SETUP_US: u32 = 2;
const RECEIVE_CLOCK_HIGH_US: u32 = 5;
const RECEIVE_CLOCK_LOW_US: u32 = 3;

// R/W flag in the register select frame: 0 = write, 1 = read
const READ_FLAG: u8 = 0b0000_0100;

pub fn write_frame(register: u8) -> u8 {
	register & !READ_FLAG
}

pub fn read_frame(register: u8) -> u8 {
	register | READ_FLAG
}

pub(super) struct Bus<G: Gpio> {
	pub(super) gpio: G,
	pub(super) pins: Pins,
}

impl<G: Gpio> Bus<G> {
	// DATA and CCLK driven low; CSB untouched
	pub(super) fn idle(&mut self) {
		let (data, clock) = (self.pins.data(), self.pins.clock());
		self.gpio.set_direction(data, Direction::Output);
		self.gpio.set_level(data, Level::Low);
		self.gpio.set_direction(clock, Direction::Output);
		self.gpio.set_level(clock, Level::Low);
	}

	pub(super) fn start_transaction(&mut self) -> Transaction<G> {
		self.idle();

		let chip_select = self.pins.chip_select();
		self.gpio.set_level(chip_select, Level::Low);
		self.gpio.delay_us(SELECT_SETUP_US);

		Transaction(self)
	}

	fn pulse_clock(&mut self, high_us: u32) {
		let clock = self.pins.clock();
		self.gpio.set_level(clock, Level::High);
		self.gpio.delay_us(high_us);
		self.gpio.set_level(clock, Level::Low);
	}
}

/// An open chip select window.
///
/// Dropping it deselects the chip and puts DATA/CCLK back to output low,
/// whatever happened in between.
pub(super) struct Transaction<'a, G: Gpio>(&'a mut Bus<G>);

impl<'a, G: Gpio> Transaction<'a, G> {
	// send `num` lowest bits from word, starting with highest bit; the chip
	// samples DATA on the rising CCLK edge
	pub(super) fn shift_out(&mut self, word: u8, num: u32) {
		assert!(num <= 8);
		let data = self.0.pins.data();
		for bit in (0..num).rev() {
			let level = Level::from(0 != word & (1u8 << bit));
			self.0.gpio.set_level(data, level);
			self.0.gpio.delay_us(SEND_SETUP_US);
			self.0.pulse_clock(SEND_CLOCK_HIGH_US);
		}
	}

	// hand DATA over to the chip; it needs one extra clock after the
	// register select frame before the first bit is valid
	pub(super) fn start_receive(mut self) -> ReadTransaction<'a, G> {
		let data = self.0.pins.data();
		self.0.gpio.set_direction(data, Direction::Input);

		self.0.gpio.delay_us(SEND_SETUP_US);
		self.0.pulse_clock(SEND_CLOCK_HIGH_US);
		self.0.gpio.delay_us(RECEIVE_CLOCK_LOW_US);

		ReadTransaction(self)
	}
}

impl<'a, G: Gpio> Drop for Transaction<'a, G> {
	fn drop(&mut self) {
		let chip_select = self.0.pins.chip_select();
		self.0.gpio.set_level(chip_select, Level::High);
		self.0.idle();
	}
}

pub(super) struct ReadTransaction<'a, G: Gpio>(Transaction<'a, G>);

impl<'a, G: Gpio> ReadTransaction<'a, G> {
	// sample DATA, then clock the chip on to the next bit
	fn receive_bit(&mut self) -> bool {
		let bus = &mut *(self.0).0;
		let data = bus.pins.data();
		let level = bus.gpio.get_level(data);
		bus.gpio.delay_us(RECEIVE_SETUP_US);
		bus.pulse_clock(RECEIVE_CLOCK_HIGH_US);
		bus.gpio.delay_us(RECEIVE_CLOCK_LOW_US);
		level.is_high()
	}

	// read `num` bits, starting with highest bit
	pub(super) fn shift_in(&mut self, num: u32) -> u8 {
		assert!(num <= 8);
		let mut result = 0u8;
		for bit in (0..num).rev() {
			if self.receive_bit() {
				result |= 1u8 << bit;
			}
		}
		result
	}
}
