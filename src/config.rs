use embedded_hal::i2c::SevenBitAddress;

use crate::register::config::{ConversionRate, DataReadyPin, OperatingMode};

/// Address with ADR0 and ADR1 tied to GND.
pub const DEFAULT_ADDRESS: SevenBitAddress = 0x40;

/// Settings applied by [`Tmp006::init`](crate::Tmp006::init).
///
/// The defaults match the power-on state of the device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    pub(crate) address: SevenBitAddress,
    pub(crate) operating_mode: OperatingMode,
    pub(crate) conversion_rate: ConversionRate,
    pub(crate) data_ready_pin: DataReadyPin,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            operating_mode: OperatingMode::Continuous,
            conversion_rate: ConversionRate::R1,
            data_ready_pin: DataReadyPin::Disabled,
        }
    }
}

impl Configuration {
    /// The TMP006 answers on 0x40..=0x47 depending on how ADR0/ADR1 are strapped.
    pub fn address(mut self, address: SevenBitAddress) -> Self {
        self.address = address;

        self
    }

    pub fn operating_mode(mut self, operating_mode: OperatingMode) -> Self {
        self.operating_mode = operating_mode;

        self
    }

    /// Slower rates average more samples and give less noisy object temperatures.
    pub fn conversion_rate(mut self, conversion_rate: ConversionRate) -> Self {
        self.conversion_rate = conversion_rate;

        self
    }

    pub fn data_ready_pin(mut self, data_ready_pin: DataReadyPin) -> Self {
        self.data_ready_pin = data_ready_pin;

        self
    }

    pub fn get_address(&self) -> SevenBitAddress {
        self.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Configuration::default();
        assert_eq!(0x40, config.address);
        assert_eq!(OperatingMode::Continuous, config.operating_mode);
        assert_eq!(ConversionRate::R1, config.conversion_rate);
        assert_eq!(DataReadyPin::Disabled, config.data_ready_pin);
    }

    #[test]
    fn overrides_keep_other_defaults() {
        let config = Configuration::default()
            .address(0x45)
            .conversion_rate(ConversionRate::R0p25);
        assert_eq!(0x45, config.get_address());
        assert_eq!(ConversionRate::R0p25, config.conversion_rate);
        assert_eq!(OperatingMode::Continuous, config.operating_mode);
    }
}
