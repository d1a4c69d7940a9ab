#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

macro_rules! with_context {
	(( $fmt:tt $($t:tt)* ), $e:expr) => {{
		use failure::Error;

		match (|| { $e })() {
			Ok(v) => Ok(v),
			Err(e) => {
				let e: Error = e;
				let msg = format!(concat!($fmt, ": {}") $($t)*, e);
				Err(Error::from(e.context(msg)))
			}
		}
	}};

	($msg:expr, $e:expr) => {
		with_context!(("{}", $msg), $e)
	};
}

pub type AResult<T> = Result<T, failure::Error>;

pub mod gpio;
pub mod wm8816;

pub use self::wm8816::{
	Channel,
	PeakStatus,
	Pins,
	Wm8816,
	registers,
};

/// Parse a register address or value: decimal, `0x` hex or `0b` binary;
/// `_` separators are allowed.
pub fn parse_byte(s: &str) -> AResult<u8> {
	let s = s.trim();
	let (digits, radix) = if s.starts_with("0x") || s.starts_with("0X") {
		(&s[2..], 16)
	} else if s.starts_with("0b") || s.starts_with("0B") {
		(&s[2..], 2)
	} else {
		(s, 10)
	};
	let digits: String = digits.chars().filter(|&c| c != '_').collect();
	ensure!(!digits.is_empty(), "missing digits in {:?}", s);
	with_context!(("invalid byte {:?}", s),
		Ok(u8::from_str_radix(&digits, radix)?)
	)
}
