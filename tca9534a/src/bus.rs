//! The transport the driver talks through.

#[cfg(feature = "defmt")]
pub trait MaybeFormat: defmt::Format + core::fmt::Debug {}
#[cfg(feature = "defmt")]
impl<T> MaybeFormat for T where T: defmt::Format + core::fmt::Debug {}

#[cfg(not(feature = "defmt"))]
pub trait MaybeFormat: core::fmt::Debug {}
#[cfg(not(feature = "defmt"))]
impl<T> MaybeFormat for T where T: core::fmt::Debug {}

/// Highest 7-bit I2C slave address.
pub const ADDRESS_MAX: u8 = 0x7f;

/// Single-register I2C transport.
///
/// Implementations carry no register semantics of their own; they move
/// exactly one byte in or out per call and report whether that worked.
/// Both methods take `&self` since the bus is borrowed by any number of
/// device handles for the duration of a call; implementations provide
/// their own interior mutability.
pub trait Bus {
	/// The opaque error type for failed transactions.
	type Error: MaybeFormat;

	/// Whether the bus can still be used. A closed bus makes every
	/// device handle that borrows it invalid.
	fn is_open(&self) -> bool;

	/// Writes `register` to `address`, then reads one byte back
	/// from the same address.
	fn read_register(&self, address: u8, register: u8) -> Result<u8, Self::Error>;

	/// Writes the two bytes `[register, value]` to `address`.
	fn write_register(&self, address: u8, register: u8, value: u8) -> Result<(), Self::Error>;
}

impl<T: Bus + ?Sized> Bus for &T {
	type Error = T::Error;

	#[inline]
	fn is_open(&self) -> bool {
		(**self).is_open()
	}

	#[inline]
	fn read_register(&self, address: u8, register: u8) -> Result<u8, Self::Error> {
		(**self).read_register(address, register)
	}

	#[inline]
	fn write_register(&self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
		(**self).write_register(address, register, value)
	}
}

#[cfg(feature = "embedded-hal")]
pub use self::hal::I2cBus;

#[cfg(feature = "embedded-hal")]
mod hal {
	use super::{ADDRESS_MAX, Bus};
	use crate::macros::trace;
	use core::cell::RefCell;
	use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

	/// [`Bus`] adapter for any `embedded-hal` I2C implementation.
	///
	/// Reads are a single two-message `write_read` transaction and writes a
	/// single one-message `write`. The adapter is not `Sync`; sharing it
	/// across threads means putting it (and the devices using it) behind a
	/// lock of the caller's choosing.
	pub struct I2cBus<I2C: I2c> {
		iface: RefCell<Option<I2C>>,
	}

	impl<I2C: I2c> I2cBus<I2C> {
		/// Wraps an open I2C interface.
		pub fn new(iface: I2C) -> Self {
			Self {
				iface: RefCell::new(Some(iface)),
			}
		}

		/// Takes the interface out of the adapter. Afterwards the bus
		/// reports itself as closed and any device borrowing it fails
		/// validation. Returns `None` if it was already closed.
		pub fn close(&self) -> Option<I2C> {
			self.iface.try_borrow_mut().ok()?.take()
		}

		/// Consumes the adapter, handing back the interface if it
		/// was still open.
		pub fn release(self) -> Option<I2C> {
			self.iface.into_inner()
		}

		fn with_iface<T>(
			&self,
			address: u8,
			f: impl FnOnce(&mut I2C) -> Result<T, I2C::Error>,
		) -> Result<T, ErrorKind> {
			if address > ADDRESS_MAX {
				return Err(ErrorKind::Other);
			}

			// Re-entrant use (or a closed bus) is reported as a failed
			// transaction rather than a panic.
			let mut iface = self.iface.try_borrow_mut().map_err(|_| ErrorKind::Other)?;
			let iface = iface.as_mut().ok_or(ErrorKind::Other)?;
			f(iface).map_err(|err| err.kind())
		}
	}

	impl<I2C: I2c> Bus for I2cBus<I2C> {
		type Error = ErrorKind;

		fn is_open(&self) -> bool {
			self.iface
				.try_borrow()
				.map(|iface| iface.is_some())
				.unwrap_or(true)
		}

		fn read_register(&self, address: u8, register: u8) -> Result<u8, Self::Error> {
			let mut buf = [0u8; 1];
			self.with_iface(address, |iface| iface.write_read(address, &[register], &mut buf))?;
			trace!("i2c {:#x}: read {:#x} -> {:#x}", address, register, buf[0]);
			Ok(buf[0])
		}

		fn write_register(&self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
			self.with_iface(address, |iface| iface.write(address, &[register, value]))?;
			trace!("i2c {:#x}: write {:#x} <- {:#x}", address, register, value);
			Ok(())
		}
	}

	#[cfg(test)]
	mod tests {
		extern crate std;

		use super::*;
		use embedded_hal_mock::eh1::i2c as mock_i2c;
		use std::vec;

		#[test]
		fn read_is_one_write_read_transaction() {
			let expectations = [mock_i2c::Transaction::write_read(0x38, vec![0x00], vec![0xa5])];
			let mut mock = mock_i2c::Mock::new(&expectations);

			let bus = I2cBus::new(mock.clone());
			assert_eq!(bus.read_register(0x38, 0x00), Ok(0xa5));

			mock.done();
		}

		#[test]
		fn write_is_one_two_byte_write() {
			let expectations = [mock_i2c::Transaction::write(0x3b, vec![0x03, 0x0f])];
			let mut mock = mock_i2c::Mock::new(&expectations);

			let bus = I2cBus::new(mock.clone());
			assert_eq!(bus.write_register(0x3b, 0x03, 0x0f), Ok(()));

			mock.done();
		}

		#[test]
		fn transaction_errors_are_reduced_to_their_kind() {
			let expectations = [mock_i2c::Transaction::write(0x38, vec![0x01, 0x00])
				.with_error(ErrorKind::Bus)];
			let mut mock = mock_i2c::Mock::new(&expectations);

			let bus = I2cBus::new(mock.clone());
			assert_eq!(bus.write_register(0x38, 0x01, 0x00), Err(ErrorKind::Bus));

			mock.done();
		}

		#[test]
		fn out_of_range_address_never_reaches_the_bus() {
			let expectations: [mock_i2c::Transaction; 0] = [];
			let mut mock = mock_i2c::Mock::new(&expectations);

			let bus = I2cBus::new(mock.clone());
			assert_eq!(bus.read_register(0x80, 0x00), Err(ErrorKind::Other));
			assert_eq!(bus.write_register(0xff, 0x01, 0x00), Err(ErrorKind::Other));

			mock.done();
		}

		#[test]
		fn closing_the_bus() {
			let expectations: [mock_i2c::Transaction; 0] = [];
			let mut mock = mock_i2c::Mock::new(&expectations);

			let bus = I2cBus::new(mock.clone());
			assert!(bus.is_open());
			assert!(bus.close().is_some());
			assert!(!bus.is_open());
			assert!(bus.close().is_none());
			assert_eq!(bus.read_register(0x38, 0x00), Err(ErrorKind::Other));
			assert!(bus.release().is_none());

			mock.done();
		}
	}
}
