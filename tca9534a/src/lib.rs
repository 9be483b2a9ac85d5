//! Driver for the TCA9534A, an 8-bit I2C GPIO expander.
//!
//! The chip has four one-byte registers (input, output, polarity
//! inversion and configuration), each holding one bit per port. This
//! crate validates a [`Device`] handle, reads and writes those registers
//! through a [`Bus`], and builds the per-port operations on top of them.
//!
//! ```no_run
//! # fn demo<I2C: embedded_hal::i2c::I2c>(i2c: I2C) -> Result<(), tca9534a::Error<embedded_hal::i2c::ErrorKind>> {
//! use tca9534a::{Device, Direction, I2cBus, Level, Port};
//!
//! let bus = I2cBus::new(i2c);
//! let expander = Device::with_address(&bus, 0x3a);
//!
//! expander.reset()?;
//! expander.port_direction(Port::P4, Direction::Output)?;
//! expander.port_write(Port::P4, Level::Low)?;
//! let button = expander.port_read(Port::P0)?;
//! # let _ = button;
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(feature = "std"), no_std)]

mod macros;

mod bus;
mod device;
mod error;
mod port;
mod register;

pub use self::{
	bus::{ADDRESS_MAX as BUS_ADDRESS_MAX, Bus, MaybeFormat},
	device::{ADDRESS_MAX, ADDRESS_MIN, Device, Registers},
	error::{Error, InvalidArgument, Kind},
	port::{Direction, Level, Polarity, Port, bit, with_bit_set},
	register::Register,
};

#[cfg(feature = "embedded-hal")]
pub use self::bus::I2cBus;
