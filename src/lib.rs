#![cfg_attr(not(test), no_std)]
//! Async driver for the Texas Instruments TMP006 infrared thermopile sensor.
//!
//! The driver talks to the device through a [`bus::Bus`], which is
//! implemented for any `embedded-hal-async` (or blocking `embedded-hal`) I2C
//! bus. On top of the five registers of the chip it offers:
//!
//! - identity verification against the manufacturer and device ID registers,
//! - read-modify-write-verify access to the configuration fields (see [`setting`]),
//! - measurements that wait until a conversion started after the last
//!   configuration change or result read has completed,
//! - object and die temperature calculation (see [`calculation`]),
//! - an [`event::EventSink`] that is told about every outcome.
//!
//! ```rust,no_run
//! # use embedded_hal_async::delay::DelayNs;
//! # use embedded_hal_async::i2c::I2c;
//! use tmp006_rs::{Tmp006, Tmp006Result};
//! use tmp006_rs::config::Configuration;
//! use tmp006_rs::register::config::ConversionRate;
//!
//! # async fn demo<I: I2c, D: DelayNs>(i2c: I, delay: D) -> Tmp006Result<(), I::Error> {
//! let config = Configuration::default()
//!     .address(0x41)
//!     .conversion_rate(ConversionRate::R0p5);
//! let mut device = Tmp006::new_i2c(i2c, config, delay);
//! device.init().await?;
//!
//! let measurement = device.read_all().await?;
//! # let _ = measurement;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `log` / `defmt`: driver logging through the respective crate (mutually exclusive).
//! - `std`: adds [`clock::SystemClock`], which stamps events with wall-clock time.
//! - `uom`: typed temperatures on [`Measurement`].

#[cfg(all(feature = "std", not(test)))]
extern crate std;

// Must come first so the logging macros are visible in every other module.
mod fmt;

pub mod bus;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod register;
pub mod setting;
pub mod shared;
mod tmp006;

#[cfg(test)]
mod testing;

pub use error::Tmp006Error;
pub use event::{Event, EventKind, EventSink, Measurement, Reading};
pub use register::config::{ConversionRate, DataReadyPin, DataReadyStatus, OperatingMode};
pub use register::data::RawSample;
pub use setting::{Setting, SettingKind, SettingValue};
pub use tmp006::{Tmp006, Tmp006Result};
