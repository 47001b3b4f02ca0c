//! Errors that can occur when using the TMP006 device.
//!
//! This module provides an error type that encapsulates all possible errors that can occur during communication with the TMP006.
//! It is generic over the underlying bus error type.

use core::fmt;

use crate::register::InvalidRegisterField;
use crate::setting::{InvalidSettingValue, SettingKind};

/// This represents all possible errors that can occur when using the TMP006 device.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tmp006Error<BusError> {
    /// An error has occurred in the I2C driver
    Bus(BusError),

    /// The manufacturer ID register did not read `0x5449`.
    ///
    /// Another device answers at this address or the wiring is faulty. Not worth retrying.
    WrongManufacturerId(u16),

    /// The device ID register did not read `0x0067`.
    WrongDeviceId(u16),

    /// The requested value is not in the field's table. Nothing was sent to the device.
    InvalidValue(SettingKind),

    /// The write was acknowledged but reading the register back did not show the requested value.
    NotSet(SettingKind),

    /// Reading from a register returned unexpected data. This should not happen in normal circumstances.
    ///
    /// Could possibly indicate a bug in the driver, or less likely, a faulty chip or interference.
    UnexpectedRegisterData(InvalidRegisterField),
}

impl<BusError> Tmp006Error<BusError> {
    /// Identity mismatches abort initialization and are never worth retrying.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Tmp006Error::WrongManufacturerId(_) | Tmp006Error::WrongDeviceId(_))
    }
}

impl<BusError> From<InvalidSettingValue> for Tmp006Error<BusError> {
    fn from(e: InvalidSettingValue) -> Self {
        Tmp006Error::InvalidValue(e.0)
    }
}

impl<BusError> From<InvalidRegisterField> for Tmp006Error<BusError> {
    fn from(e: InvalidRegisterField) -> Self {
        Tmp006Error::UnexpectedRegisterData(e)
    }
}

impl<BusError> fmt::Display for Tmp006Error<BusError> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tmp006Error::Bus(_) => f.write_str("bus transfer failed"),
            Tmp006Error::WrongManufacturerId(id) => write!(f, "wrong manufacturer id {:#06x}", id),
            Tmp006Error::WrongDeviceId(id) => write!(f, "wrong device id {:#06x}", id),
            Tmp006Error::InvalidValue(kind) => write!(f, "wrong {} value", kind),
            Tmp006Error::NotSet(kind) => write!(f, "{} not set", kind),
            Tmp006Error::UnexpectedRegisterData(field) => write!(
                f,
                "unexpected value {:#x} at bit {} of register {:#04x}",
                field.value, field.bit_offset, field.register
            ),
        }
    }
}
