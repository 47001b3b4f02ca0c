//! ### CONFIG - Configuration register (`0x02`, 2 bytes, R/W)
//!
//! ```text
//!  15    14..12   11..9   8       7       6..0
//!  RST   MOD      CR      EN      DRDY    reserved
//! ```
//!
//! - `RST`: writing 1 restores the power-on default. Self-clearing.
//! - `MOD`: operating mode, `000` power-down, `111` continuous conversion.
//! - `CR`: conversion rate (ADC conversions per second).
//! - `EN`: routes the data-ready flag to the DRDY pin.
//! - `DRDY`: read-only, 1 once a conversion has completed.
//!
//! ### Default values
//! 0x7400 (continuous, 1 conversion/s, DRDY pin disabled)
//!
//! The `pack_*` / `unpack_*` functions operate on the byte that owns the
//! field and never touch the bits of any other field.

use core::fmt;
use core::str::FromStr;

use embassy_time::Duration;

use crate::register::{REG_BYTES, Readable, Reg, UnexpectedValue, Writable, InvalidRegisterField};
use crate::setting::{InvalidSettingValue, SettingKind};

/// Marker type for CONFIG (0x02) register
///
/// - **Length:** 2 bytes
/// - **Access:** Read/Write
pub struct Config;
impl Reg for Config { const ADDR: u8 = 0x02; }

impl Readable for Config {
    type Out = ConfigWord;

    fn decode(b: [u8; REG_BYTES]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(ConfigWord::from_bytes(b))
    }
}

impl Writable for Config {
    type In = ConfigWord;

    fn encode(v: &Self::In) -> [u8; REG_BYTES] {
        v.to_bytes()
    }
}

// Masks and positions within the byte that owns the field.
pub const RESET_MSK: u8 = 0b1000_0000;
pub const OP_MODE_MSK: u8 = 0b0111_0000;
pub const OP_MODE_POS: u8 = 4;
pub const CONV_RATE_MSK: u8 = 0b0000_1110;
pub const CONV_RATE_POS: u8 = 1;
pub const DRDY_PIN_MSK: u8 = 0b0000_0001;
pub const DRDY_PIN_POS: u8 = 0;
pub const DRDY_BIT_MSK: u8 = 0b1000_0000;
pub const DRDY_BIT_POS: u8 = 7;

#[inline]
const fn set_bits(reg: u8, mask: u8, pos: u8, data: u8) -> u8 {
    (reg & !mask) | ((data << pos) & mask)
}

#[inline]
const fn get_bits(reg: u8, mask: u8, pos: u8) -> u8 {
    (reg & mask) >> pos
}

/// Places a 3 bit operating mode code at bits 14..12 of the high byte.
pub const fn pack_op_mode(code: u8, high: u8) -> u8 {
    set_bits(high, OP_MODE_MSK, OP_MODE_POS, code)
}

pub const fn unpack_op_mode(high: u8) -> u8 {
    get_bits(high, OP_MODE_MSK, OP_MODE_POS)
}

/// Places a 3 bit conversion rate code at bits 11..9 of the high byte.
pub const fn pack_conv_rate(code: u8, high: u8) -> u8 {
    set_bits(high, CONV_RATE_MSK, CONV_RATE_POS, code)
}

pub const fn unpack_conv_rate(high: u8) -> u8 {
    get_bits(high, CONV_RATE_MSK, CONV_RATE_POS)
}

/// Places the DRDY pin enable at bit 8 (bit 0 of the high byte).
pub const fn pack_drdy_pin(code: u8, high: u8) -> u8 {
    set_bits(high, DRDY_PIN_MSK, DRDY_PIN_POS, code)
}

pub const fn unpack_drdy_pin(high: u8) -> u8 {
    get_bits(high, DRDY_PIN_MSK, DRDY_PIN_POS)
}

/// Only used by the fake device and tests; the real bit is read-only.
pub const fn pack_drdy_bit(code: u8, low: u8) -> u8 {
    set_bits(low, DRDY_BIT_MSK, DRDY_BIT_POS, code)
}

pub const fn unpack_drdy_bit(low: u8) -> u8 {
    get_bits(low, DRDY_BIT_MSK, DRDY_BIT_POS)
}

/// Raw contents of the configuration register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigWord(pub u16);

impl ConfigWord {
    /// Value after power-on or a soft reset.
    pub const POWER_ON_DEFAULT: ConfigWord = ConfigWord(0x7400);

    /// Soft reset command, `[0x80, 0x00]` on the wire.
    pub const SOFT_RESET: ConfigWord = ConfigWord(0x8000);

    pub const fn from_bytes(b: [u8; REG_BYTES]) -> Self {
        Self(u16::from_be_bytes(b))
    }

    pub const fn to_bytes(self) -> [u8; REG_BYTES] {
        self.0.to_be_bytes()
    }

    pub const fn high(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn low(self) -> u8 {
        self.0 as u8
    }

    pub const fn with_high(self, high: u8) -> Self {
        Self(((high as u16) << 8) | self.low() as u16)
    }

    pub const fn with_low(self, low: u8) -> Self {
        Self((self.0 & 0xFF00) | low as u16)
    }

    /// Clears the soft reset trigger so the word can be written back without resetting the device.
    pub const fn without_reset(self) -> Self {
        self.with_high(self.high() & !RESET_MSK)
    }

    pub const fn reset_requested(self) -> bool {
        self.high() & RESET_MSK != 0
    }
}

/// Operating mode, bits 14..12.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// Conversions stop and the supply current drops to the standby level.
    PowerDown,
    /// Sensor and die temperature are converted continuously. Power-on default.
    #[default]
    Continuous,
}

impl OperatingMode {
    pub const fn code(self) -> u8 {
        match self {
            OperatingMode::PowerDown => 0b000,
            OperatingMode::Continuous => 0b111,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            OperatingMode::PowerDown => "powerDown",
            OperatingMode::Continuous => "continuous",
        }
    }
}

impl TryFrom<u8> for OperatingMode {
    type Error = UnexpectedValue;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0b000 => Ok(OperatingMode::PowerDown),
            0b111 => Ok(OperatingMode::Continuous),
            other => Err(UnexpectedValue(other)),
        }
    }
}

/// Conversion rate, bits 11..9.
///
/// The name is the number of conversions per second. Each rate averages a
/// different number of samples, so a sample only becomes valid
/// [`conversion_time`](ConversionRate::conversion_time) after the conversion started.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionRate {
    /// 4 conversions/s, 1 averaged sample, 250 ms.
    R4,
    /// 2 conversions/s, 2 averaged samples, 500 ms.
    R2,
    /// 1 conversion/s, 4 averaged samples, 1 s. Power-on default.
    #[default]
    R1,
    /// 0.5 conversions/s, 8 averaged samples, 2 s.
    R0p5,
    /// 0.25 conversions/s, 16 averaged samples, 4 s.
    R0p25,
}

impl ConversionRate {
    pub const fn code(self) -> u8 {
        match self {
            ConversionRate::R4 => 0b000,
            ConversionRate::R2 => 0b001,
            ConversionRate::R1 => 0b010,
            ConversionRate::R0p5 => 0b011,
            ConversionRate::R0p25 => 0b100,
        }
    }

    pub const fn conversion_time_ms(self) -> u64 {
        match self {
            ConversionRate::R4 => 250,
            ConversionRate::R2 => 500,
            ConversionRate::R1 => 1000,
            ConversionRate::R0p5 => 2000,
            ConversionRate::R0p25 => 4000,
        }
    }

    /// Time from the start of a conversion until its result can be read.
    pub const fn conversion_time(self) -> Duration {
        Duration::from_millis(self.conversion_time_ms())
    }

    pub const fn name(self) -> &'static str {
        match self {
            ConversionRate::R4 => "4",
            ConversionRate::R2 => "2",
            ConversionRate::R1 => "1",
            ConversionRate::R0p5 => "0.5",
            ConversionRate::R0p25 => "0.25",
        }
    }
}

impl TryFrom<u8> for ConversionRate {
    type Error = UnexpectedValue;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0b000 => Ok(ConversionRate::R4),
            0b001 => Ok(ConversionRate::R2),
            0b010 => Ok(ConversionRate::R1),
            0b011 => Ok(ConversionRate::R0p5),
            0b100 => Ok(ConversionRate::R0p25),
            other => Err(UnexpectedValue(other)),
        }
    }
}

/// DRDY pin control, bit 8.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataReadyPin {
    #[default]
    Disabled,
    /// The open-drain DRDY pin is pulled low whenever a conversion completes.
    Enabled,
}

impl DataReadyPin {
    pub const fn code(self) -> u8 {
        match self {
            DataReadyPin::Disabled => 0,
            DataReadyPin::Enabled => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DataReadyPin::Disabled => "disabled",
            DataReadyPin::Enabled => "enabled",
        }
    }
}

impl From<u8> for DataReadyPin {
    fn from(code: u8) -> Self {
        if code & 1 == 0 { DataReadyPin::Disabled } else { DataReadyPin::Enabled }
    }
}

/// DRDY status bit, bit 7. Cleared when the result registers are read.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataReadyStatus {
    InProgress,
    Ready,
}

impl DataReadyStatus {
    pub const fn code(self) -> u8 {
        match self {
            DataReadyStatus::InProgress => 0,
            DataReadyStatus::Ready => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DataReadyStatus::InProgress => "inProgress",
            DataReadyStatus::Ready => "ready",
        }
    }

    pub const fn from_word(word: ConfigWord) -> Self {
        if unpack_drdy_bit(word.low()) == 0 { DataReadyStatus::InProgress } else { DataReadyStatus::Ready }
    }
}

macro_rules! text_names {
    ($ty:ty, $kind:expr, [$($variant:expr),+]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = InvalidSettingValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s == $variant.name() {
                        return Ok($variant);
                    }
                )+
                Err(InvalidSettingValue($kind))
            }
        }
    };
}

text_names!(OperatingMode, SettingKind::OperatingMode,
    [OperatingMode::PowerDown, OperatingMode::Continuous]);
text_names!(ConversionRate, SettingKind::ConversionRate,
    [ConversionRate::R4, ConversionRate::R2, ConversionRate::R1, ConversionRate::R0p5, ConversionRate::R0p25]);
text_names!(DataReadyPin, SettingKind::DataReadyPin,
    [DataReadyPin::Disabled, DataReadyPin::Enabled]);

impl fmt::Display for DataReadyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MODES: [OperatingMode; 2] = [OperatingMode::PowerDown, OperatingMode::Continuous];
    const ALL_RATES: [ConversionRate; 5] = [
        ConversionRate::R4,
        ConversionRate::R2,
        ConversionRate::R1,
        ConversionRate::R0p5,
        ConversionRate::R0p25,
    ];

    #[test]
    fn config_decode_power_on_default() {
        let word = Config::decode([0x74, 0x00]).unwrap();
        assert_eq!(ConfigWord::POWER_ON_DEFAULT, word);
        assert_eq!(Ok(OperatingMode::Continuous), OperatingMode::try_from(unpack_op_mode(word.high())));
        assert_eq!(Ok(ConversionRate::R1), ConversionRate::try_from(unpack_conv_rate(word.high())));
        assert_eq!(DataReadyPin::Disabled, DataReadyPin::from(unpack_drdy_pin(word.high())));
        assert_eq!(DataReadyStatus::InProgress, DataReadyStatus::from_word(word));
    }

    #[test]
    fn config_encode_soft_reset() {
        assert_eq!([0x80, 0x00], Config::encode(&ConfigWord::SOFT_RESET));
    }

    #[test]
    fn op_mode_pack_preserves_other_bits() {
        for high in 0..=u8::MAX {
            for mode in ALL_MODES {
                let packed = pack_op_mode(mode.code(), high);
                assert_eq!(Ok(mode), OperatingMode::try_from(unpack_op_mode(packed)));
                assert_eq!(high & !OP_MODE_MSK, packed & !OP_MODE_MSK);
            }
        }
    }

    #[test]
    fn conv_rate_pack_preserves_other_bits() {
        for high in 0..=u8::MAX {
            for rate in ALL_RATES {
                let packed = pack_conv_rate(rate.code(), high);
                assert_eq!(Ok(rate), ConversionRate::try_from(unpack_conv_rate(packed)));
                assert_eq!(high & !CONV_RATE_MSK, packed & !CONV_RATE_MSK);
            }
        }
    }

    #[test]
    fn drdy_pin_pack_preserves_other_bits() {
        for high in 0..=u8::MAX {
            for pin in [DataReadyPin::Disabled, DataReadyPin::Enabled] {
                let packed = pack_drdy_pin(pin.code(), high);
                assert_eq!(pin, DataReadyPin::from(unpack_drdy_pin(packed)));
                assert_eq!(high & !DRDY_PIN_MSK, packed & !DRDY_PIN_MSK);
            }
        }
    }

    #[test]
    fn drdy_bit_pack_preserves_other_bits() {
        for low in 0..=u8::MAX {
            for status in [DataReadyStatus::InProgress, DataReadyStatus::Ready] {
                let packed = pack_drdy_bit(status.code(), low);
                let word = ConfigWord(0x7400).with_low(packed);
                assert_eq!(status, DataReadyStatus::from_word(word));
                assert_eq!(low & !DRDY_BIT_MSK, packed & !DRDY_BIT_MSK);
            }
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(Err(UnexpectedValue(0b011)), OperatingMode::try_from(0b011));
        assert_eq!(Err(UnexpectedValue(0b101)), ConversionRate::try_from(0b101));
        assert_eq!(Err(UnexpectedValue(0b111)), ConversionRate::try_from(0b111));
    }

    #[test]
    fn conversion_times() {
        let times: [u64; 5] = ALL_RATES.map(ConversionRate::conversion_time_ms);
        assert_eq!([250, 500, 1000, 2000, 4000], times);
        assert_eq!(Duration::from_millis(1000), ConversionRate::R1.conversion_time());
    }

    #[test]
    fn names_parse_back() {
        assert_eq!(Ok(ConversionRate::R0p25), "0.25".parse());
        assert_eq!(Ok(OperatingMode::PowerDown), "powerDown".parse());
        assert_eq!(Ok(DataReadyPin::Enabled), "enabled".parse());
        assert_eq!(
            Err(InvalidSettingValue(SettingKind::ConversionRate)),
            "0,25".parse::<ConversionRate>()
        );
        assert_eq!(
            Err(InvalidSettingValue(SettingKind::OperatingMode)),
            "sleep".parse::<OperatingMode>()
        );
    }

    #[test]
    fn without_reset_clears_only_the_trigger() {
        let word = ConfigWord(0xF5C0).without_reset();
        assert_eq!(ConfigWord(0x75C0), word);
        assert!(!word.reset_requested());
        assert!(ConfigWord::SOFT_RESET.reset_requested());
    }
}
