//! Ports and the per-register meaning of a port's bit.

use crate::error::{InvalidArgument, Kind};
use core::str::FromStr;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Returns bit `index` of `byte`.
#[inline]
pub const fn bit(byte: u8, index: u8) -> bool {
	(byte >> index) & 1 != 0
}

/// Returns `byte` with bit `index` set to `value` and every other
/// bit untouched.
#[inline]
pub const fn with_bit_set(byte: u8, index: u8, value: bool) -> u8 {
	// 0 - 1 is all ones, so this takes bit `index` from either
	// the all-ones or the all-zeroes byte.
	byte ^ ((0u8.wrapping_sub(value as u8) ^ byte) & (1 << index))
}

/// One of the eight I/O ports (pins P0 through P7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(Format))]
#[repr(u8)]
pub enum Port {
	P0 = 0,
	P1 = 1,
	P2 = 2,
	P3 = 3,
	P4 = 4,
	P5 = 5,
	P6 = 6,
	P7 = 7,
}

impl Port {
	/// Every port, in bit order.
	pub const ALL: [Port; 8] = [
		Port::P0,
		Port::P1,
		Port::P2,
		Port::P3,
		Port::P4,
		Port::P5,
		Port::P6,
		Port::P7,
	];

	/// The bit position of this port within a register.
	#[inline]
	pub const fn index(self) -> u8 {
		self as u8
	}

	/// The single-bit mask of this port within a register.
	#[inline]
	pub const fn mask(self) -> u8 {
		1 << self.index()
	}

	/// Extracts this port's bit from a register value.
	#[inline]
	pub const fn get(self, register: u8) -> bool {
		bit(register, self.index())
	}

	/// Replaces this port's bit in a register value.
	#[inline]
	pub const fn set(self, register: u8, value: bool) -> u8 {
		with_bit_set(register, self.index(), value)
	}
}

impl TryFrom<u8> for Port {
	type Error = InvalidArgument;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Port::ALL
			.get(usize::from(value))
			.copied()
			.ok_or(InvalidArgument::Port(value))
	}
}

impl From<Port> for u8 {
	#[inline]
	fn from(value: Port) -> Self {
		value.index()
	}
}

impl FromStr for Port {
	type Err = InvalidArgument;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		let digits = s
			.strip_prefix('p')
			.or_else(|| s.strip_prefix('P'))
			.unwrap_or(s);
		let index: u8 = digits
			.parse()
			.map_err(|_| InvalidArgument::Unrecognized(Kind::Port))?;
		Port::try_from(index)
	}
}

impl core::fmt::Display for Port {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		const NAMES: [&str; 8] = ["P0", "P1", "P2", "P3", "P4", "P5", "P6", "P7"];
		f.pad(NAMES[usize::from(self.index())])
	}
}

/// Defines a two-state port setting whose `0` and `1` bit values
/// map to the given variants.
macro_rules! port_setting {
	(
		$(#[$meta:meta])*
		$name:ident ($kind:ident) {
			$(#[$zero_meta:meta])* $zero:ident = [$($zero_name:literal),+],
			$(#[$one_meta:meta])* $one:ident = [$($one_name:literal),+] $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		#[cfg_attr(feature = "defmt", derive(Format))]
		#[repr(u8)]
		pub enum $name {
			$(#[$zero_meta])*
			$zero = 0,
			$(#[$one_meta])*
			$one = 1,
		}

		impl $name {
			/// The register bit that encodes this setting.
			#[inline]
			pub const fn bit(self) -> bool {
				matches!(self, $name::$one)
			}

			/// The setting encoded by a register bit.
			#[inline]
			pub const fn from_bit(bit: bool) -> Self {
				if bit { $name::$one } else { $name::$zero }
			}
		}

		impl TryFrom<u8> for $name {
			type Error = InvalidArgument;

			fn try_from(value: u8) -> Result<Self, Self::Error> {
				match value {
					0 => Ok($name::$zero),
					1 => Ok($name::$one),
					other => Err(InvalidArgument::$kind(other)),
				}
			}
		}

		impl From<$name> for u8 {
			#[inline]
			fn from(value: $name) -> Self {
				value as u8
			}
		}

		impl FromStr for $name {
			type Err = InvalidArgument;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				let s = s.trim();
				if s == "0" $(|| s.eq_ignore_ascii_case($zero_name))+ {
					Ok($name::$zero)
				} else if s == "1" $(|| s.eq_ignore_ascii_case($one_name))+ {
					Ok($name::$one)
				} else {
					Err(InvalidArgument::Unrecognized(Kind::$kind))
				}
			}
		}

		impl core::fmt::Display for $name {
			fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
				f.pad(match self {
					$name::$zero => port_setting!(@first $($zero_name),+),
					$name::$one => port_setting!(@first $($one_name),+),
				})
			}
		}
	};

	(@first $first:literal $(, $rest:literal)*) => {
		$first
	};
}

port_setting! {
	/// Logic level of a port, as found in the input and output registers.
	Level (Level) {
		Low = ["low"],
		High = ["high"],
	}
}

port_setting! {
	/// Whether an input port's level is reported as-is or inverted.
	Polarity (Polarity) {
		Original = ["original", "orig"],
		Inverted = ["inverted", "inv"],
	}
}

port_setting! {
	/// Port direction, as found in the configuration register.
	Direction (Direction) {
		/// Driven from the output register.
		Output = ["output", "out"],
		/// High-impedance input; the power-on state of every port.
		Input = ["input", "in"],
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bit_extraction() {
		assert!(bit(0b0000_0001, 0));
		assert!(!bit(0b0000_0001, 1));
		assert!(bit(0b1000_0000, 7));
		assert!(!bit(0b0111_1111, 7));
	}

	#[test]
	fn with_bit_set_matches_clear_then_or() {
		for byte in 0..=u8::MAX {
			for index in 0..8 {
				for value in [false, true] {
					let expected = (byte & !(1 << index)) | ((value as u8) << index);
					assert_eq!(with_bit_set(byte, index, value), expected);
				}
			}
		}
	}

	#[test]
	fn ports() {
		for (i, port) in Port::ALL.into_iter().enumerate() {
			assert_eq!(usize::from(port.index()), i);
			assert_eq!(port.mask(), 1 << i);
			assert_eq!(Port::try_from(i as u8), Ok(port));
		}

		assert_eq!(Port::try_from(8), Err(InvalidArgument::Port(8)));
		assert_eq!(Port::try_from(0xff), Err(InvalidArgument::Port(0xff)));

		assert_eq!(Port::P5.set(0x00, true), 0b0010_0000);
		assert_eq!(Port::P5.set(0xff, false), 0b1101_1111);
		assert!(Port::P3.get(0b0000_1000));
	}

	#[test]
	fn parse_ports() {
		assert_eq!("3".parse::<Port>(), Ok(Port::P3));
		assert_eq!("p7".parse::<Port>(), Ok(Port::P7));
		assert_eq!("P0".parse::<Port>(), Ok(Port::P0));
		assert_eq!("8".parse::<Port>(), Err(InvalidArgument::Port(8)));
		assert_eq!(
			"px".parse::<Port>(),
			Err(InvalidArgument::Unrecognized(Kind::Port))
		);
	}

	#[test]
	fn settings_map_to_register_bits() {
		assert!(!Level::Low.bit());
		assert!(Level::High.bit());
		assert!(!Polarity::Original.bit());
		assert!(Polarity::Inverted.bit());
		assert!(!Direction::Output.bit());
		assert!(Direction::Input.bit());

		assert_eq!(Direction::from_bit(true), Direction::Input);
		assert_eq!(Level::from_bit(false), Level::Low);
	}

	#[test]
	fn out_of_range_settings_are_rejected() {
		assert_eq!(Level::try_from(1), Ok(Level::High));
		assert_eq!(Level::try_from(2), Err(InvalidArgument::Level(2)));
		assert_eq!(Polarity::try_from(2), Err(InvalidArgument::Polarity(2)));
		assert_eq!(Direction::try_from(0xff), Err(InvalidArgument::Direction(0xff)));
	}

	#[test]
	fn parse_settings() {
		assert_eq!("HIGH".parse::<Level>(), Ok(Level::High));
		assert_eq!("0".parse::<Level>(), Ok(Level::Low));
		assert_eq!("inv".parse::<Polarity>(), Ok(Polarity::Inverted));
		assert_eq!("out".parse::<Direction>(), Ok(Direction::Output));
		assert_eq!("1".parse::<Direction>(), Ok(Direction::Input));
		assert_eq!(
			"floating".parse::<Direction>(),
			Err(InvalidArgument::Unrecognized(Kind::Direction))
		);
	}
}
