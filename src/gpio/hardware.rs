use std::fmt;
use std::hint;
use std::str;
use std::time::{
	Duration,
	Instant,
};

// spin instead of sleeping: the scheduler would stretch clock edges
pub fn busy_wait(duration: Duration) {
	let start = Instant::now();
	while start.elapsed() < duration {
		hint::spin_loop();
	}
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PinId(pub u32);

impl fmt::Display for PinId {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl str::FromStr for PinId {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		ensure!(!s.is_empty(), "empty GPIO number");
		with_context!(("invalid GPIO number: {:?}", s),
			Ok(PinId(s.parse::<u32>()?))
		)
	}
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Direction {
	Input,
	Output,
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Level {
	Low,
	High,
}

impl Level {
	pub fn is_high(self) -> bool {
		self == Level::High
	}
}

impl From<bool> for Level {
	fn from(v: bool) -> Self {
		match v {
			false => Level::Low,
			true => Level::High,
		}
	}
}

/// Raw pin access the protocol engine is built on.
///
/// All operations are infallible: a platform that can't drive a pin it was
/// handed is broken, not a protocol failure.
pub trait Gpio {
	fn set_direction(&mut self, pin: PinId, direction: Direction);
	fn set_level(&mut self, pin: PinId, level: Level);
	fn get_level(&mut self, pin: PinId) -> Level;

	// wait at least `us` microseconds
	fn delay_us(&mut self, us: u32) {
		busy_wait(Duration::from_micros(u64::from(us)));
	}
}

impl<'a, G: ?Sized + Gpio> Gpio for &'a mut G {
	fn set_direction(&mut self, pin: PinId, direction: Direction) {
		G::set_direction(*self, pin, direction)
	}
	fn set_level(&mut self, pin: PinId, level: Level) {
		G::set_level(*self, pin, level)
	}
	fn get_level(&mut self, pin: PinId) -> Level {
		G::get_level(*self, pin)
	}
	fn delay_us(&mut self, us: u32) {
		G::delay_us(*self, us)
	}
}
