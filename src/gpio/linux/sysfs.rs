use std::fs;
use std::io::{
	self,
	Write,
};
use std::os::unix::fs::{
	FileExt,
	OpenOptionsExt,
};
use std::path::{
	Path,
	PathBuf,
};
use std::thread;
use std::time::Duration;

use crate::gpio::{
	Direction,
	Gpio,
	Level,
	PinId,
};

const GPIO_CLASS: &str = "/sys/class/gpio";

// udev may need a moment to fix permissions on a freshly exported pin
const EXPORT_POLL: Duration = Duration::from_millis(10);
const EXPORT_ATTEMPTS: usize = 100;

fn pin_dir(pin: PinId) -> PathBuf {
	Path::new(GPIO_CLASS).join(format!("gpio{}", pin))
}

fn open_attribute(pin: PinId, name: &str) -> crate::AResult<fs::File> {
	let path = pin_dir(pin).join(name);
	with_context!(("GPIO {}: couldn't open {}", pin, path.display()), {
		Ok(fs::OpenOptions::new()
			.read(true)
			.write(true)
			.custom_flags(libc::O_CLOEXEC)
			.open(&path)?)
	})
}

fn write_class_file(name: &str, pin: PinId) -> io::Result<()> {
	// needs a single write syscall
	fs::OpenOptions::new()
		.write(true)
		.open(Path::new(GPIO_CLASS).join(name))?
		.write_all(pin.to_string().as_bytes())
}

/// returns whether the pin was exported by this call
fn export(pin: PinId) -> crate::AResult<bool> {
	let exported = match write_class_file("export", pin) {
		Ok(()) => true,
		Err(ref e) if e.raw_os_error() == Some(libc::EBUSY) => {
			debug!("GPIO {}: already exported", pin);
			false
		},
		Err(e) => bail!("GPIO {}: export failed: {}", pin, e),
	};

	let value = pin_dir(pin).join("value");
	for _ in 0..EXPORT_ATTEMPTS {
		match fs::OpenOptions::new().write(true).open(&value) {
			Ok(_) => return Ok(exported),
			Err(ref e) if e.kind() == io::ErrorKind::NotFound || e.kind() == io::ErrorKind::PermissionDenied => {
				thread::sleep(EXPORT_POLL);
			},
			Err(e) => bail!("GPIO {}: couldn't access {}: {}", pin, value.display(), e),
		}
	}
	bail!("GPIO {}: {} didn't become writable after export", pin, value.display());
}

fn unexport(pin: PinId) {
	match write_class_file("unexport", pin) {
		Ok(()) => debug!("GPIO {}: unexported", pin),
		Err(e) => error!("GPIO {}: unexport failed: {}", pin, e),
	}
}

struct SysfsPin {
	id: PinId,
	direction_file: fs::File,
	value_file: fs::File,
	direction: Option<Direction>,
	exported: bool,
}

impl SysfsPin {
	fn open(id: PinId) -> crate::AResult<Self> {
		let exported = export(id)?;
		let files = open_attribute(id, "direction").and_then(|direction_file| {
			Ok((direction_file, open_attribute(id, "value")?))
		});
		match files {
			Ok((direction_file, value_file)) => Ok(SysfsPin {
				id,
				direction_file,
				value_file,
				direction: None,
				exported,
			}),
			Err(e) => {
				if exported {
					unexport(id);
				}
				Err(e)
			},
		}
	}

	fn set_direction(&mut self, direction: Direction) {
		if self.direction == Some(direction) {
			return;
		}
		let data: &[u8] = match direction {
			Direction::Input => b"in",
			// "low" also drives the pin low atomically with the switch
			Direction::Output => b"low",
		};
		let written = self.direction_file.write_at(data, 0)
			.unwrap_or_else(|e| panic!("GPIO {}: setting direction failed: {}", self.id, e));
		assert_eq!(written, data.len(), "GPIO {}: short write to direction", self.id);
		self.direction = Some(direction);
	}

	fn set_level(&mut self, level: Level) {
		let data: &[u8] = if level.is_high() { b"1" } else { b"0" };
		let written = self.value_file.write_at(data, 0)
			.unwrap_or_else(|e| panic!("GPIO {}: setting value failed: {}", self.id, e));
		assert_eq!(written, data.len(), "GPIO {}: short write to value", self.id);
	}

	fn get_level(&mut self) -> Level {
		let mut buf = [0u8; 2];
		let l = self.value_file.read_at(&mut buf, 0)
			.unwrap_or_else(|e| panic!("GPIO {}: reading value failed: {}", self.id, e));
		assert!(l > 0, "GPIO {}: empty value", self.id);
		Level::from(buf[0] == b'1')
	}
}

/// GPIO pins driven through the legacy sysfs interface.
///
/// Every pin stays exported and its attribute files stay open for the
/// lifetime of the value; pins exported by `open` are unexported on drop.
pub struct SysfsGpio {
	pins: Vec<SysfsPin>,
}

impl SysfsGpio {
	pub fn open(pins: &[PinId]) -> crate::AResult<Self> {
		let mut gpio = SysfsGpio { pins: Vec::with_capacity(pins.len()) };
		for &id in pins {
			ensure!(gpio.pins.iter().all(|p| p.id != id), "GPIO {} requested twice", id);
			// on error `gpio` drops and unexports what was opened so far
			gpio.pins.push(SysfsPin::open(id)?);
			debug!("GPIO {}: opened", id);
		}
		Ok(gpio)
	}

	// pins stay exported after drop, keeping their last levels
	pub fn keep_exported(&mut self) {
		for pin in &mut self.pins {
			pin.exported = false;
		}
	}

	fn pin(&mut self, id: PinId) -> &mut SysfsPin {
		match self.pins.iter_mut().find(|p| p.id == id) {
			Some(pin) => pin,
			None => panic!("GPIO {} was not opened", id),
		}
	}
}

impl Drop for SysfsGpio {
	fn drop(&mut self) {
		for pin in &self.pins {
			if pin.exported {
				unexport(pin.id);
			}
		}
	}
}

impl Gpio for SysfsGpio {
	fn set_direction(&mut self, pin: PinId, direction: Direction) {
		self.pin(pin).set_direction(direction)
	}

	fn set_level(&mut self, pin: PinId, level: Level) {
		self.pin(pin).set_level(level)
	}

	fn get_level(&mut self, pin: PinId) -> Level {
		self.pin(pin).get_level()
	}
}
