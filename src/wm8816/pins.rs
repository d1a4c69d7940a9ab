use std::fmt;
use std::str;

use crate::gpio::PinId;

/// The four GPIOs wired to one WM8816.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Pins {
	chip_select: PinId,
	mute: PinId,
	data: PinId,
	clock: PinId,
}

impl Pins {
	pub const fn new(chip_select: PinId, mute: PinId, data: PinId, clock: PinId) -> Self {
		Pins {
			chip_select,
			mute,
			data,
			clock,
		}
	}

	/// CSB, active low
	pub fn chip_select(&self) -> PinId {
		self.chip_select
	}

	/// MUTEB, active low
	pub fn mute(&self) -> PinId {
		self.mute
	}

	pub fn data(&self) -> PinId {
		self.data
	}

	pub fn clock(&self) -> PinId {
		self.clock
	}

	pub fn all(&self) -> [PinId; 4] {
		[self.chip_select, self.mute, self.data, self.clock]
	}
}

impl fmt::Display for Pins {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{},{},{},{}", self.chip_select, self.mute, self.data, self.clock)
	}
}

impl str::FromStr for Pins {
	type Err = ::failure::Error;

	// CS,MUTE,DATA,CLOCK
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let parts: Vec<&str> = s.split(',').collect();
		ensure!(parts.len() == 4, "expected 4 pins (CS,MUTE,DATA,CLOCK), got {:?}", s);

		let mut ids = [PinId(0); 4];
		for (id, part) in ids.iter_mut().zip(&parts) {
			*id = part.parse()?;
		}

		for (i, id) in ids.iter().enumerate() {
			ensure!(!ids[..i].contains(id), "GPIO {} used for more than one pin in {:?}", id, s);
		}

		Ok(Pins::new(ids[0], ids[1], ids[2], ids[3]))
	}
}
