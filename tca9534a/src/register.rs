use crate::error::{InvalidArgument, Kind};
use core::str::FromStr;

#[cfg(feature = "defmt")]
use defmt::Format;

/// The four one-byte registers of the TCA9534A.
///
/// Each register is a bitfield over the eight ports, bit `n`
/// belonging to port `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(Format))]
#[repr(u8)]
pub enum Register {
	/// Incoming logic levels. Only the chip changes this register.
	Input = 0x00,
	/// Outgoing logic levels of ports configured as outputs.
	Output = 0x01,
	/// Polarity inversion of the input register.
	Polarity = 0x02,
	/// Port direction; `1` is input.
	Configuration = 0x03,
}

impl Register {
	/// Every register, in index order.
	pub const ALL: [Register; 4] = [
		Register::Input,
		Register::Output,
		Register::Polarity,
		Register::Configuration,
	];

	/// The command byte that selects this register.
	#[inline]
	pub const fn index(self) -> u8 {
		self as u8
	}

	/// The power-on value from the datasheet. The input register has
	/// none, as it reflects the pins.
	pub const fn default_value(self) -> Option<u8> {
		match self {
			Register::Input => None,
			Register::Output => Some(0xff),
			Register::Polarity => Some(0x00),
			Register::Configuration => Some(0xff),
		}
	}

	/// Whether the driver may write this register.
	#[inline]
	pub const fn is_writable(self) -> bool {
		!matches!(self, Register::Input)
	}
}

impl TryFrom<u8> for Register {
	type Error = InvalidArgument;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0x00 => Ok(Register::Input),
			0x01 => Ok(Register::Output),
			0x02 => Ok(Register::Polarity),
			0x03 => Ok(Register::Configuration),
			other => Err(InvalidArgument::Register(other)),
		}
	}
}

impl From<Register> for u8 {
	#[inline]
	fn from(value: Register) -> Self {
		value.index()
	}
}

impl FromStr for Register {
	type Err = InvalidArgument;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		let register = if s.eq_ignore_ascii_case("input") || s.eq_ignore_ascii_case("in") {
			Register::Input
		} else if s.eq_ignore_ascii_case("output") || s.eq_ignore_ascii_case("out") {
			Register::Output
		} else if s.eq_ignore_ascii_case("polarity") || s.eq_ignore_ascii_case("pol") {
			Register::Polarity
		} else if s.eq_ignore_ascii_case("configuration")
			|| s.eq_ignore_ascii_case("config")
			|| s.eq_ignore_ascii_case("conf")
		{
			Register::Configuration
		} else {
			return Err(InvalidArgument::Unrecognized(Kind::Register));
		};

		Ok(register)
	}
}

impl core::fmt::Display for Register {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.pad(match self {
			Register::Input => "input",
			Register::Output => "output",
			Register::Polarity => "polarity",
			Register::Configuration => "configuration",
		})
	}
}
