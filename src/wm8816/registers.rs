use std::fmt;

// register select frames; bit 2 (R/W) gets forced by the transaction
pub const PEAK_DETECTOR_STATUS: u8 = 0b1101_1111;
pub const PEAK_DETECTOR_REF:    u8 = 0b1110_0111;
pub const LEFT_CHANNEL_GAIN:    u8 = 0b1110_1111;
pub const RIGHT_CHANNEL_GAIN:   u8 = 0b1111_0111;
pub const BOTH_CHANNEL_GAIN:    u8 = 0b1100_1011; // write only

// gain codes: 0.5 dB steps below GAIN_MAX
pub const GAIN_MUTE:    u8 = 0b0000_0000;
pub const GAIN_ZERO_DB: u8 = 0b1110_0000;
pub const GAIN_MAX:     u8 = 0b1111_1111;

// peak detector status flags
const PEAK_RIGHT_OVERLOAD: u8 = 0b0000_0001;
const PEAK_LEFT_OVERLOAD:  u8 = 0b0000_0010;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Channel {
	Left,
	Right,
	Both,
}

impl Channel {
	pub fn gain_register(self) -> u8 {
		match self {
			Channel::Left => LEFT_CHANNEL_GAIN,
			Channel::Right => RIGHT_CHANNEL_GAIN,
			Channel::Both => BOTH_CHANNEL_GAIN,
		}
	}

	pub fn is_readable(self) -> bool {
		self != Channel::Both
	}
}

impl fmt::Display for Channel {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match self {
			Channel::Left => "left",
			Channel::Right => "right",
			Channel::Both => "both",
		})
	}
}

impl std::str::FromStr for Channel {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"left" | "l" => Ok(Channel::Left),
			"right" | "r" => Ok(Channel::Right),
			"both" | "b" => Ok(Channel::Both),
			_ => bail!("unknown channel {:?} (expected left, right or both)", s),
		}
	}
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeakStatus(pub u8);

impl PeakStatus {
	pub fn is_right_overload(&self) -> bool {
		0 != self.0 & PEAK_RIGHT_OVERLOAD
	}
	pub fn is_left_overload(&self) -> bool {
		0 != self.0 & PEAK_LEFT_OVERLOAD
	}
	pub fn is_clear(&self) -> bool {
		0 == self.0 & (PEAK_LEFT_OVERLOAD | PEAK_RIGHT_OVERLOAD)
	}
}

impl fmt::Display for PeakStatus {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:02x}", self.0)
	}
}

impl fmt::Debug for PeakStatus {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:02x} (", self.0)?;
		if self.is_clear() { write!(f, "no overload")?; }
		if self.is_left_overload() { write!(f, " [LEFT]")?; }
		if self.is_right_overload() { write!(f, " [RIGHT]")?; }
		write!(f, ")")
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn peak_status_flags() {
		let none = PeakStatus(0b00);
		assert!(none.is_clear());
		assert!(!none.is_left_overload() && !none.is_right_overload());

		let right = PeakStatus(0b01);
		assert!(right.is_right_overload() && !right.is_left_overload() && !right.is_clear());

		let left = PeakStatus(0b10);
		assert!(left.is_left_overload() && !left.is_right_overload() && !left.is_clear());

		let both = PeakStatus(0b11);
		assert!(both.is_left_overload() && both.is_right_overload());

		// undocumented high bits don't count as overload
		assert!(PeakStatus(0b1111_1100).is_clear());
	}

	#[test]
	fn peak_status_format() {
		assert_eq!(PeakStatus(0x03).to_string(), "0x03");
		assert_eq!(format!("{:?}", PeakStatus(0x00)), "0x00 (no overload)");
		assert_eq!(format!("{:?}", PeakStatus(0x03)), "0x03 ( [LEFT] [RIGHT])");
	}

	#[test]
	fn channel_registers() {
		assert_eq!(Channel::Left.gain_register(), 0b1110_1111);
		assert_eq!(Channel::Right.gain_register(), 0b1111_0111);
		assert_eq!(Channel::Both.gain_register(), 0b1100_1011);
		assert!(Channel::Left.is_readable());
		assert!(Channel::Right.is_readable());
		assert!(!Channel::Both.is_readable());
	}

	#[test]
	fn parse_channel() {
		for &c in &[Channel::Left, Channel::Right, Channel::Both] {
			assert_eq!(c.to_string().parse::<Channel>().unwrap(), c);
		}
		assert_eq!("l".parse::<Channel>().unwrap(), Channel::Left);
		assert!("center".parse::<Channel>().is_err());
	}
}
