use crate::bus::MaybeFormat;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Errors returned by the driver.
///
/// `E` is the error type of the underlying [`crate::Bus`]; it is passed
/// through untouched and never interpreted or retried here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
pub enum Error<E: MaybeFormat> {
	/// An argument was rejected before any bus traffic took place.
	#[cfg_attr(feature = "thiserror", error("invalid argument: {0}"))]
	InvalidArgument(InvalidArgument),
	/// The bus transaction itself failed.
	#[cfg_attr(feature = "thiserror", error("bus transaction failed: {0:?}"))]
	Transport(E),
}

impl<E: MaybeFormat> Error<E> {
	/// Whether this error was caught locally (no I/O was attempted).
	pub fn is_invalid_argument(&self) -> bool {
		matches!(self, Self::InvalidArgument(_))
	}

	/// Whether this error came from the bus.
	pub fn is_transport(&self) -> bool {
		matches!(self, Self::Transport(_))
	}
}

impl<E: MaybeFormat> From<InvalidArgument> for Error<E> {
	#[inline]
	fn from(value: InvalidArgument) -> Self {
		Self::InvalidArgument(value)
	}
}

/// The reason an argument was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
pub enum InvalidArgument {
	/// The device's bus has been closed.
	#[cfg_attr(feature = "thiserror", error("bus is closed"))]
	BusClosed,
	/// The slave address is outside of `0x38..=0x3f`.
	#[cfg_attr(feature = "thiserror", error("address {0:#04x} is not a TCA9534A address"))]
	Address(u8),
	/// No register has this index.
	#[cfg_attr(feature = "thiserror", error("no such register: {0}"))]
	Register(u8),
	/// The input register cannot be written or reset.
	#[cfg_attr(feature = "thiserror", error("the input register is read-only"))]
	ReadOnlyRegister,
	/// No port has this index.
	#[cfg_attr(feature = "thiserror", error("no such port: {0}"))]
	Port(u8),
	#[cfg_attr(feature = "thiserror", error("no such level: {0}"))]
	Level(u8),
	#[cfg_attr(feature = "thiserror", error("no such polarity: {0}"))]
	Polarity(u8),
	#[cfg_attr(feature = "thiserror", error("no such direction: {0}"))]
	Direction(u8),
	/// A textual value didn't name any variant of the given kind.
	#[cfg_attr(feature = "thiserror", error("unrecognized {0:?} value"))]
	Unrecognized(Kind),
}

impl InvalidArgument {
	/// Whether the rejection was about the device handle itself
	/// (rather than an argument to the operation).
	pub fn is_handle(&self) -> bool {
		matches!(self, Self::BusClosed | Self::Address(_))
	}
}

/// What a textual value was being parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum Kind {
	Register,
	Port,
	Level,
	Polarity,
	Direction,
}
