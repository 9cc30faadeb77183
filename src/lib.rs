//! Blocking driver for the Cirrus Logic CS5460 single-phase power/energy IC, built on
//! `embedded-hal` 1.0.
//!
//! The chip sits behind a [`driver::Cs5460Driver`], either an exclusively owned SPI bus with a
//! chip select pin ([`driver::spi::Cs5460SpiDriver`]) or a shared-bus
//! [`SpiDevice`](embedded_hal::spi::SpiDevice) ([`driver::device::Cs5460DeviceDriver`]).
//! [`chip::Cs5460`] speaks the register protocol on top and converts the fixed point registers
//! into physical units using software gains.
//!
//! The bus has to be set up with [`SPI_FREQUENCY`] and [`SPI_MODE`], e.g. with `esp-hal`:
//!
//! ```ignore
//! let spi_bus = Spi::new(peripherals.SPI3, cs5460::SPI_FREQUENCY, SpiMode::Mode0, &clocks)
//!     .with_sck(sclk)
//!     .with_mosi(mosi)
//!     .with_miso(miso);
//!
//! let driver = Cs5460SpiDriver::new(spi_bus, cs, delay).with_reset(reset);
//! let mut chip = Cs5460::new(driver);
//! chip.initialize()?;
//! chip.set_current_gain(15.0);
//! chip.set_voltage_gain(353.5);
//! chip.start_multi_conversion()?;
//! let measurement = chip.read_measurement()?;
//! ```

#![cfg_attr(not(test), no_std)]

pub mod calibration;
pub mod chip;
pub mod config;
pub mod driver;
pub mod error;
pub mod sample;

#[cfg(test)]
mod testing;

pub use calibration::{CalibrationRecord, CalibrationTimeout, Gains};
pub use chip::{CalibrationTarget, Cs5460, Reg, Status};
pub use driver::{device::Cs5460DeviceDriver, pins::NoPin, spi::Cs5460SpiDriver, Cs5460Driver};
pub use error::Error;
pub use sample::Measurement;

use fugit::HertzU32;

/// highest SCLK the chip's serial port is run at
pub const SPI_FREQUENCY: HertzU32 = HertzU32::MHz(2);

/// SCLK idles low, data sampled on the rising edge; MSB first
pub const SPI_MODE: embedded_hal::spi::Mode = embedded_hal::spi::MODE_0;
