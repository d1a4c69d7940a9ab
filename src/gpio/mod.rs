mod hardware;
mod linux;

pub use self::hardware::{
	Direction,
	Gpio,
	Level,
	PinId,
	busy_wait,
};

// OS-specific. for now linux only.
pub use self::linux::SysfsGpio;
