use clap::{Parser, Subcommand};
use envconfig::Envconfig;
use linux_embedded_hal::{I2cdev, i2cdev::linux::LinuxI2CError};
use log::{debug, error, info};
use std::{num::ParseIntError, str::FromStr};
use tca9534a::{Device, Direction, I2cBus, Level, Polarity, Port, Register};

type DeviceError = tca9534a::Error<embedded_hal::i2c::ErrorKind>;

/// Environment defaults; command line options take precedence.
#[derive(Envconfig)]
struct Config {
	#[envconfig(from = "TCA9534A_BUS", default = "/dev/i2c-1")]
	pub bus: String,
	#[envconfig(from = "TCA9534A_ADDRESS", default = "0x38")]
	pub address: String,
	#[envconfig(from = "LEVEL", default = "info")]
	pub log_level: String,
	#[envconfig(from = "VERBOSE", default = "0")]
	pub verbose: u8,
}

/// Inspects and drives a TCA9534A GPIO expander over a Linux i2c-dev bus.
///
/// Registers are `input`, `output`, `polarity` and `configuration`
/// (or `in`, `out`, `pol`, `conf`). Ports are `0` through `7`. Byte
/// values may be given in decimal, `0x` hex or `0b` binary.
#[derive(Parser)]
#[command(version)]
struct Options {
	/// The i2c-dev bus device [env: TCA9534A_BUS, default: /dev/i2c-1]
	#[arg(long, short = 'b')]
	bus: Option<String>,
	/// The chip's slave address, 0x38 through 0x3f [env: TCA9534A_ADDRESS, default: 0x38]
	#[arg(long, short = 'a', value_parser = parse_byte)]
	address: Option<u8>,
	/// Show verbose (trace) output
	#[arg(long, short = 'v', action)]
	verbose: bool,
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Prints a register's value
	Get { register: Register },
	/// Writes a register (not the input register)
	Set {
		register: Register,
		#[arg(value_parser = parse_byte)]
		value: u8,
	},
	/// Resets one register to its power-on default, or the whole chip
	Reset { register: Option<Register> },
	/// Prints the input level of a port (`low` or `high`)
	Read { port: Port },
	/// Sets the output level of a port (`low`/`high`)
	Write { port: Port, level: Level },
	/// Sets the input polarity of a port (`original`/`inverted`)
	Polarity { port: Port, polarity: Polarity },
	/// Sets the direction of a port (`output`/`input`)
	Direction { port: Port, direction: Direction },
	/// Prints every register and a per-port summary
	Dump,
}

#[derive(thiserror::Error, Debug)]
enum Error {
	#[error("invalid environment configuration: {0}")]
	Config(#[from] envconfig::Error),
	#[error("invalid LEVEL value: {0:?}")]
	LogLevel(String),
	#[error("failed to start stderr logger")]
	Logger(#[from] log::SetLoggerError),
	#[error("invalid TCA9534A_ADDRESS value {0:?}: {1}")]
	Address(String, ParseIntError),
	#[error("failed to open i2c bus {0}: {1}")]
	Open(String, LinuxI2CError),
	#[error(transparent)]
	Device(#[from] DeviceError),
}

/// Parses a byte in decimal, `0x` hexadecimal or `0b` binary.
fn parse_byte(s: &str) -> Result<u8, ParseIntError> {
	let s = s.trim();
	if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
		u8::from_str_radix(hex, 16)
	} else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
		u8::from_str_radix(bin, 2)
	} else {
		s.parse()
	}
}

fn main() -> Result<(), Error> {
	let options = Options::parse();
	let config = Config::init_from_env()?;

	let log_level = if options.verbose || config.verbose != 0 {
		log::LevelFilter::Trace
	} else {
		log::LevelFilter::from_str(&config.log_level)
			.map_err(|_| Error::LogLevel(config.log_level.clone()))?
	};

	log::set_max_level(log_level);

	stderrlog::new()
		.module(module_path!())
		.module("tca9534a")
		.verbosity(log_level)
		.timestamp(stderrlog::Timestamp::Millisecond)
		.init()?;

	let bus_path = options.bus.unwrap_or(config.bus);
	let address = match options.address {
		Some(address) => address,
		None => parse_byte(&config.address).map_err(|err| Error::Address(config.address, err))?,
	};

	debug!("opening {bus_path}");
	let iface = I2cdev::new(&bus_path).map_err(|err| Error::Open(bus_path.clone(), err))?;
	let bus = I2cBus::new(iface);
	let device = Device::with_address(&bus, address);

	if let Err(err) = run(&device, options.command) {
		error!("tca9534a at {address:#04x} on {bus_path}: {err}");
		return Err(err.into());
	}

	Ok(())
}

fn run<B>(device: &Device<B>, command: Command) -> Result<(), DeviceError>
where
	B: tca9534a::Bus<Error = embedded_hal::i2c::ErrorKind>,
{
	match command {
		Command::Get { register } => {
			println!("{:#04x}", device.get_register(register)?);
		}
		Command::Set { register, value } => {
			device.set_register(register, value)?;
			info!("{register} <- {value:#04x}");
		}
		Command::Reset { register: Some(register) } => {
			device.reset_register(register)?;
			info!("reset {register}");
		}
		Command::Reset { register: None } => {
			device.reset()?;
			info!("reset output, polarity and configuration registers");
		}
		Command::Read { port } => {
			println!("{}", device.port_read(port)?);
		}
		Command::Write { port, level } => {
			device.port_write(port, level)?;
			info!("{port} output <- {level}");
		}
		Command::Polarity { port, polarity } => {
			device.port_polarity(port, polarity)?;
			info!("{port} polarity <- {polarity}");
		}
		Command::Direction { port, direction } => {
			device.port_direction(port, direction)?;
			info!("{port} direction <- {direction}");
		}
		Command::Dump => {
			let registers = device.snapshot()?;

			for register in Register::ALL {
				let value = registers.get(register);
				println!("{register:<14} {value:#04x}  {value:08b}");
			}

			println!();
			println!("port  {:<9} {:<9} {:<6} {:<6}", "direction", "polarity", "output", "level");
			for port in Port::ALL {
				println!(
					"{:<5} {:<9} {:<9} {:<6} {:<6}",
					port,
					registers.direction(port),
					registers.polarity(port),
					registers.output(port),
					registers.level(port)
				);
			}
		}
	}

	Ok(())
}
