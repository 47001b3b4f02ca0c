//! The writable fields of the configuration register.
//!
//! Each field type implements [`Setting`], which ties it to its codec in
//! [`crate::register::config`]. The driver's read-modify-write-verify
//! sequence is written once against this trait.

use core::fmt;
use core::str::FromStr;

use crate::register::config::{
    self, ConfigWord, ConversionRate, DataReadyPin, OperatingMode,
};
use crate::register::{InvalidRegisterField, Reg};

/// Identifies one writable configuration field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingKind {
    OperatingMode,
    ConversionRate,
    DataReadyPin,
}

impl SettingKind {
    /// Short name used in error messages and events.
    pub const fn name(self) -> &'static str {
        match self {
            SettingKind::OperatingMode => "opMode",
            SettingKind::ConversionRate => "convRate",
            SettingKind::DataReadyPin => "drdy_PinMode",
        }
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A textual value that is not in a field's table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidSettingValue(pub SettingKind);

impl fmt::Display for InvalidSettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wrong {} value", self.0)
    }
}

/// A field together with its value, as carried by setting events.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingValue {
    OperatingMode(OperatingMode),
    ConversionRate(ConversionRate),
    DataReadyPin(DataReadyPin),
}

impl SettingValue {
    pub const fn kind(self) -> SettingKind {
        match self {
            SettingValue::OperatingMode(_) => SettingKind::OperatingMode,
            SettingValue::ConversionRate(_) => SettingKind::ConversionRate,
            SettingValue::DataReadyPin(_) => SettingKind::DataReadyPin,
        }
    }

    pub const fn value_name(self) -> &'static str {
        match self {
            SettingValue::OperatingMode(v) => v.name(),
            SettingValue::ConversionRate(v) => v.name(),
            SettingValue::DataReadyPin(v) => v.name(),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind(), self.value_name())
    }
}

/// Step of the read-modify-write-verify sequence a setting change failed in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingPhase {
    /// The requested value was rejected before any bus access.
    Validating,
    /// Reading the current register contents.
    Reading,
    /// Writing the modified register contents.
    ReadModifyWrite,
    /// Reading back and comparing the field.
    Verifying,
}

impl SettingPhase {
    pub const fn name(self) -> &'static str {
        match self {
            SettingPhase::Validating => "validating",
            SettingPhase::Reading => "reading",
            SettingPhase::ReadModifyWrite => "read-modify-write",
            SettingPhase::Verifying => "verifying",
        }
    }
}

impl fmt::Display for SettingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A field of the configuration register that can be read and written.
pub trait Setting: Copy + PartialEq + FromStr<Err = InvalidSettingValue> + Into<SettingValue> {
    const KIND: SettingKind;

    /// Extracts the field from a register word.
    fn decode(word: ConfigWord) -> Result<Self, InvalidRegisterField>;

    /// Replaces the field in `word`, leaving every other bit alone.
    fn encode(self, word: ConfigWord) -> ConfigWord;
}

impl Setting for OperatingMode {
    const KIND: SettingKind = SettingKind::OperatingMode;

    fn decode(word: ConfigWord) -> Result<Self, InvalidRegisterField> {
        OperatingMode::try_from(config::unpack_op_mode(word.high()))
            .map_err(|e| InvalidRegisterField::new(config::Config::ADDR, e.0, 8 + config::OP_MODE_POS))
    }

    fn encode(self, word: ConfigWord) -> ConfigWord {
        word.with_high(config::pack_op_mode(self.code(), word.high()))
    }
}

impl Setting for ConversionRate {
    const KIND: SettingKind = SettingKind::ConversionRate;

    fn decode(word: ConfigWord) -> Result<Self, InvalidRegisterField> {
        ConversionRate::try_from(config::unpack_conv_rate(word.high()))
            .map_err(|e| InvalidRegisterField::new(config::Config::ADDR, e.0, 8 + config::CONV_RATE_POS))
    }

    fn encode(self, word: ConfigWord) -> ConfigWord {
        word.with_high(config::pack_conv_rate(self.code(), word.high()))
    }
}

impl Setting for DataReadyPin {
    const KIND: SettingKind = SettingKind::DataReadyPin;

    fn decode(word: ConfigWord) -> Result<Self, InvalidRegisterField> {
        Ok(DataReadyPin::from(config::unpack_drdy_pin(word.high())))
    }

    fn encode(self, word: ConfigWord) -> ConfigWord {
        word.with_high(config::pack_drdy_pin(self.code(), word.high()))
    }
}

impl From<OperatingMode> for SettingValue {
    fn from(v: OperatingMode) -> Self {
        SettingValue::OperatingMode(v)
    }
}

impl From<ConversionRate> for SettingValue {
    fn from(v: ConversionRate) -> Self {
        SettingValue::ConversionRate(v)
    }
}

impl From<DataReadyPin> for SettingValue {
    fn from(v: DataReadyPin) -> Self {
        SettingValue::DataReadyPin(v)
    }
}
