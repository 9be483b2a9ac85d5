use crate::{
	bus::Bus,
	error::{Error, InvalidArgument},
	macros::{debug, trace, warn},
	port::{Direction, Level, Polarity, Port},
	register::Register,
};

#[cfg(feature = "defmt")]
use defmt::Format;

/// Lowest slave address of the TCA9534A (A2..A0 all low).
pub const ADDRESS_MIN: u8 = 0x38;
/// Highest slave address of the TCA9534A (A2..A0 all high).
pub const ADDRESS_MAX: u8 = 0x3f;

/// A handle to one TCA9534A on a bus.
///
/// The handle only pairs a bus with a slave address; it holds no
/// register state and is never mutated by any operation. It is checked
/// at the top of every operation (see [`Device::validate`]), so a bus
/// closed after construction is caught before any I/O.
///
/// # Concurrency
///
/// The port operations are read-modify-write sequences of two separate
/// bus transactions. Anything that writes the same register between
/// the read and the write (another thread using the same chip, another
/// process on the same bus) has its update silently overwritten. The
/// protocol offers no way around this; callers sharing a chip must
/// serialize access to it themselves, e.g. by keeping the handle behind
/// a mutex and holding it for the duration of each call.
#[derive(Debug, Clone, Copy)]
pub struct Device<B: Bus> {
	bus: B,
	address: u8,
}

impl<B: Bus> Device<B> {
	/// The chip's address with A2..A0 all tied low.
	pub const DEFAULT_ADDRESS: u8 = ADDRESS_MIN;

	/// Creates a handle for the chip at [`Self::DEFAULT_ADDRESS`].
	pub fn new(bus: B) -> Self {
		Self::with_address(bus, Self::DEFAULT_ADDRESS)
	}

	/// Creates a handle for the chip at `address`. The address is not
	/// checked until the handle is used.
	pub fn with_address(bus: B, address: u8) -> Self {
		Self { bus, address }
	}

	/// The slave address of this handle.
	#[inline]
	pub fn address(&self) -> u8 {
		self.address
	}

	/// The bus this handle talks through.
	#[inline]
	pub fn bus(&self) -> &B {
		&self.bus
	}

	/// Checks that the bus is open and the address is one the chip
	/// can be strapped to.
	pub fn validate(&self) -> Result<(), InvalidArgument> {
		if !self.bus.is_open() {
			return Err(InvalidArgument::BusClosed);
		}

		if !(ADDRESS_MIN..=ADDRESS_MAX).contains(&self.address) {
			return Err(InvalidArgument::Address(self.address));
		}

		Ok(())
	}

	/// Whether [`Self::validate`] would succeed.
	#[inline]
	pub fn is_valid(&self) -> bool {
		self.validate().is_ok()
	}

	/// Reads a register.
	pub fn get_register(&self, register: Register) -> Result<u8, Error<B::Error>> {
		self.validate()?;
		self.bus
			.read_register(self.address, register.index())
			.map_err(Error::Transport)
	}

	/// Writes a register. The input register is rejected.
	pub fn set_register(&self, register: Register, value: u8) -> Result<(), Error<B::Error>> {
		self.validate()?;
		if !register.is_writable() {
			return Err(InvalidArgument::ReadOnlyRegister.into());
		}

		self.bus
			.write_register(self.address, register.index(), value)
			.map_err(Error::Transport)
	}

	/// Writes a register's datasheet default. The input register
	/// is rejected.
	pub fn reset_register(&self, register: Register) -> Result<(), Error<B::Error>> {
		self.validate()?;
		let Some(value) = register.default_value() else {
			return Err(InvalidArgument::ReadOnlyRegister.into());
		};

		debug!("tca9534a {:#x}: resetting {:?} to {:#x}", self.address, register, value);
		self.set_register(register, value)
	}

	/// Resets the output, polarity and configuration registers, in that
	/// order.
	///
	/// Stops at the first register that fails to reset. Registers reset
	/// before the failure stay reset; nothing is rolled back.
	pub fn reset(&self) -> Result<(), Error<B::Error>> {
		self.validate()?;
		debug!("tca9534a {:#x}: resetting", self.address);

		for register in [Register::Output, Register::Polarity, Register::Configuration] {
			if let Err(err) = self.reset_register(register) {
				warn!(
					"tca9534a {:#x}: reset stopped at {:?}; chip is partially reset",
					self.address,
					register
				);
				return Err(err);
			}
		}

		Ok(())
	}

	/// Reads the level of a port from the input register.
	///
	/// The level reflects the polarity inversion setting of the port.
	pub fn port_read(&self, port: Port) -> Result<Level, Error<B::Error>> {
		let input = self.get_register(Register::Input)?;
		Ok(Level::from_bit(port.get(input)))
	}

	/// Sets the output level of a port. Takes effect on the pin only
	/// while the port is configured as an output.
	pub fn port_write(&self, port: Port, level: Level) -> Result<(), Error<B::Error>> {
		self.update_port(Register::Output, port, level.bit())
	}

	/// Sets whether a port's input level is inverted.
	pub fn port_polarity(&self, port: Port, polarity: Polarity) -> Result<(), Error<B::Error>> {
		self.update_port(Register::Polarity, port, polarity.bit())
	}

	/// Sets the direction of a port.
	pub fn port_direction(&self, port: Port, direction: Direction) -> Result<(), Error<B::Error>> {
		self.update_port(Register::Configuration, port, direction.bit())
	}

	/// Reads all four registers, input first.
	pub fn snapshot(&self) -> Result<Registers, Error<B::Error>> {
		Ok(Registers {
			input: self.get_register(Register::Input)?,
			output: self.get_register(Register::Output)?,
			polarity: self.get_register(Register::Polarity)?,
			configuration: self.get_register(Register::Configuration)?,
		})
	}

	/// Read-modify-write of a single port bit; the other seven bits are
	/// written back exactly as read. Not atomic (see the type docs).
	fn update_port(&self, register: Register, port: Port, value: bool) -> Result<(), Error<B::Error>> {
		let old = self.get_register(register)?;
		let new = port.set(old, value);
		trace!(
			"tca9534a {:#x}: {:?} {:#x} -> {:#x} ({:?})",
			self.address,
			register,
			old,
			new,
			port
		);
		self.set_register(register, new)
	}
}

/// The contents of all four registers at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub struct Registers {
	pub input: u8,
	pub output: u8,
	pub polarity: u8,
	pub configuration: u8,
}

impl Registers {
	/// The raw value of one register.
	pub fn get(&self, register: Register) -> u8 {
		match register {
			Register::Input => self.input,
			Register::Output => self.output,
			Register::Polarity => self.polarity,
			Register::Configuration => self.configuration,
		}
	}

	/// The level a port reads as.
	pub fn level(&self, port: Port) -> Level {
		Level::from_bit(port.get(self.input))
	}

	/// The level a port drives when it is an output.
	pub fn output(&self, port: Port) -> Level {
		Level::from_bit(port.get(self.output))
	}

	pub fn polarity(&self, port: Port) -> Polarity {
		Polarity::from_bit(port.get(self.polarity))
	}

	pub fn direction(&self, port: Port) -> Direction {
		Direction::from_bit(port.get(self.configuration))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use core::convert::Infallible;

	/// A bus that must never be used.
	struct Unreachable(bool);

	impl Bus for Unreachable {
		type Error = Infallible;

		fn is_open(&self) -> bool {
			self.0
		}

		fn read_register(&self, _: u8, _: u8) -> Result<u8, Self::Error> {
			unreachable!("read on an invalid handle");
		}

		fn write_register(&self, _: u8, _: u8, _: u8) -> Result<(), Self::Error> {
			unreachable!("write on an invalid handle");
		}
	}

	#[test]
	fn address_range_is_inclusive() {
		let bus = Unreachable(true);
		assert_eq!(
			Device::with_address(&bus, 0x37).validate(),
			Err(InvalidArgument::Address(0x37))
		);
		assert_eq!(Device::with_address(&bus, 0x38).validate(), Ok(()));
		assert_eq!(Device::with_address(&bus, 0x3f).validate(), Ok(()));
		assert_eq!(
			Device::with_address(&bus, 0x40).validate(),
			Err(InvalidArgument::Address(0x40))
		);
		assert!(Device::new(&bus).is_valid());
	}

	#[test]
	fn closed_bus_is_rejected_at_any_address() {
		let bus = Unreachable(false);
		for address in [0x00, 0x37, 0x38, 0x3c, 0x3f, 0x40, 0x7f] {
			let device = Device::with_address(&bus, address);
			assert_eq!(device.validate(), Err(InvalidArgument::BusClosed));
			assert!(!device.is_valid());
		}
	}

	#[test]
	fn invalid_handles_never_touch_the_bus() {
		let bus = Unreachable(true);
		let device = Device::with_address(&bus, 0x20);

		let err = Error::InvalidArgument(InvalidArgument::Address(0x20));
		assert_eq!(device.get_register(Register::Input), Err(err.clone()));
		assert_eq!(device.set_register(Register::Output, 0), Err(err.clone()));
		assert_eq!(device.reset_register(Register::Output), Err(err.clone()));
		assert_eq!(device.reset(), Err(err.clone()));
		assert_eq!(device.port_read(Port::P0), Err(err.clone()));
		assert_eq!(device.port_write(Port::P0, Level::High), Err(err.clone()));
		assert_eq!(device.port_polarity(Port::P0, Polarity::Inverted), Err(err.clone()));
		assert_eq!(device.port_direction(Port::P0, Direction::Output), Err(err.clone()));
		assert_eq!(device.snapshot(), Err(err));
	}

	#[test]
	fn input_register_is_read_only() {
		let bus = Unreachable(true);
		let device = Device::new(&bus);

		let err = Error::InvalidArgument(InvalidArgument::ReadOnlyRegister);
		for value in 0..=u8::MAX {
			assert_eq!(device.set_register(Register::Input, value), Err(err.clone()));
		}
		assert_eq!(device.reset_register(Register::Input), Err(err));
	}

	#[test]
	fn snapshot_accessors() {
		let regs = Registers {
			input: 0b0000_0001,
			output: 0b0000_0010,
			polarity: 0b0000_0100,
			configuration: 0b1111_0111,
		};

		assert_eq!(regs.level(Port::P0), Level::High);
		assert_eq!(regs.level(Port::P1), Level::Low);
		assert_eq!(regs.output(Port::P1), Level::High);
		assert_eq!(regs.polarity(Port::P2), Polarity::Inverted);
		assert_eq!(regs.direction(Port::P3), Direction::Output);
		assert_eq!(regs.direction(Port::P4), Direction::Input);
		assert_eq!(regs.get(Register::Configuration), 0b1111_0111);
	}
}
