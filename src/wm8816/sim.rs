// simulated WM8816 on the far side of the pins, for protocol tests

use std::collections::HashMap;

use super::Pins;
use crate::gpio::{
	Direction,
	Gpio,
	Level,
	PinId,
};

const READ_FLAG: u8 = 0b0000_0100;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Event {
	// only recorded when something actually changes
	Direction(PinId, Direction),
	Edge(PinId, Level),
	Sample(PinId, Level),
	Delay(u32),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PinState {
	pub direction: Option<Direction>,
	pub level: Level,
}

pub struct SimulatedChip {
	pins: Pins,
	state: HashMap<PinId, PinState>,
	log: Vec<Event>,
	registers: [u8; 256],

	// current chip select window
	clocks: u32,
	frame: u8,
	shift: u8,
	driving: Option<Level>,

	pub frames: Vec<u8>,
	// DATA level at every rising CCLK edge while selected
	pub clocked: Vec<Level>,
	// chip and driver both drove DATA
	pub contention: bool,
	// nothing answers on DATA
	pub absent: bool,
}

impl SimulatedChip {
	pub fn new(pins: Pins) -> Self {
		let state = pins.all().iter()
			.map(|&pin| (pin, PinState { direction: None, level: Level::Low }))
			.collect();
		SimulatedChip {
			pins,
			state,
			log: Vec::new(),
			registers: [0u8; 256],
			clocks: 0,
			frame: 0,
			shift: 0,
			driving: None,
			frames: Vec::new(),
			clocked: Vec::new(),
			contention: false,
			absent: false,
		}
	}

	pub fn state(&self, pin: PinId) -> PinState {
		self.state[&pin]
	}

	pub fn register(&self, register: u8) -> u8 {
		self.registers[usize::from(register & !READ_FLAG)]
	}

	pub fn set_register(&mut self, register: u8, value: u8) {
		self.registers[usize::from(register & !READ_FLAG)] = value;
	}

	pub fn log(&self) -> &[Event] {
		&self.log
	}

	pub fn clear_log(&mut self) {
		self.log.clear();
		self.frames.clear();
		self.clocked.clear();
	}

	pub fn edges(&self, pin: PinId) -> usize {
		self.log.iter().filter(|e| match e {
			Event::Edge(p, _) => *p == pin,
			_ => false,
		}).count()
	}

	pub fn rising_edges(&self, pin: PinId) -> usize {
		self.log.iter().filter(|&&e| e == Event::Edge(pin, Level::High)).count()
	}

	pub fn direction_changes(&self, pin: PinId) -> Vec<Direction> {
		self.log.iter().filter_map(|e| match *e {
			Event::Direction(p, d) if p == pin => Some(d),
			_ => None,
		}).collect()
	}

	pub fn delays(&self) -> Vec<u32> {
		self.log.iter().filter_map(|e| match *e {
			Event::Delay(us) => Some(us),
			_ => None,
		}).collect()
	}

	fn is_selected(&self) -> bool {
		self.state[&self.pins.chip_select()].level == Level::Low
	}

	fn driver_drives_data(&self) -> bool {
		self.state[&self.pins.data()].direction == Some(Direction::Output)
	}

	fn select(&mut self) {
		self.clocks = 0;
		self.frame = 0;
		self.shift = 0;
		self.driving = None;
	}

	fn deselect(&mut self) {
		let is_write = 0 == self.frame & READ_FLAG;
		if is_write && self.clocks >= 16 {
			self.set_register(self.frame, self.shift);
		}
		self.driving = None;
	}

	fn rising_clock(&mut self) {
		let data = self.state[&self.pins.data()].level;
		self.clocked.push(data);
		let bit = u8::from(data.is_high());

		match self.clocks {
			0..=7 => {
				self.frame = (self.frame << 1) | bit;
				if self.clocks == 7 {
					self.frames.push(self.frame);
				}
			},
			8..=15 if 0 == self.frame & READ_FLAG => {
				self.shift = (self.shift << 1) | bit;
			},
			_ => (),
		}

		if 0 != self.frame & READ_FLAG && self.clocks >= 8 && !self.absent {
			// first rising edge after the frame puts bit 7 on DATA
			self.driving = match self.clocks {
				8..=15 => {
					let value = self.register(self.frame);
					Some(Level::from(0 != value & (1u8 << (15 - self.clocks))))
				},
				_ => None,
			};
			if self.driving.is_some() && self.driver_drives_data() {
				self.contention = true;
			}
		}

		self.clocks += 1;
	}
}

impl Gpio for SimulatedChip {
	fn set_direction(&mut self, pin: PinId, direction: Direction) {
		let state = self.state.get_mut(&pin).expect("unknown pin");
		if state.direction != Some(direction) {
			state.direction = Some(direction);
			self.log.push(Event::Direction(pin, direction));
		}
		if pin == self.pins.data() && direction == Direction::Output && self.driving.is_some() {
			self.contention = true;
		}
	}

	fn set_level(&mut self, pin: PinId, level: Level) {
		let state = self.state.get_mut(&pin).expect("unknown pin");
		if state.level == level {
			return;
		}
		state.level = level;
		self.log.push(Event::Edge(pin, level));

		if pin == self.pins.chip_select() {
			match level {
				Level::Low => self.select(),
				Level::High => self.deselect(),
			}
		} else if pin == self.pins.clock() && level == Level::High && self.is_selected() {
			self.rising_clock();
		}
	}

	fn get_level(&mut self, pin: PinId) -> Level {
		let state = self.state[&pin];
		let level = match (state.direction, self.driving) {
			(Some(Direction::Output), _) => state.level,
			(_, Some(level)) if pin == self.pins.data() => level,
			// floating input reads as pulled up
			_ => Level::High,
		};
		self.log.push(Event::Sample(pin, level));
		level
	}

	fn delay_us(&mut self, us: u32) {
		self.log.push(Event::Delay(us));
	}
}
