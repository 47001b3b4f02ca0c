use crate::register::{InvalidRegisterField, REG_BYTES, Readable, Reg};

/// Marker struct for the sensor voltage result register (0x00).
///
/// Two's complement, 1 LSB = 156.25 nV, full scale ±5.12 mV.
///
/// - **Length:** 2 bytes
/// - **Access:** Read-only
pub struct ObjectVoltage;
impl Reg for ObjectVoltage { const ADDR: u8 = 0x00; }

impl Readable for ObjectVoltage {
    type Out = i16;

    fn decode(b: [u8; REG_BYTES]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(i16::from_be_bytes(b))
    }
}

/// Marker struct for the die temperature result register (0x01).
///
/// 14 bit two's complement left-justified, the lowest two bits carry no data.
/// 1 LSB = 1/32 °C after shifting them out.
///
/// - **Length:** 2 bytes
/// - **Access:** Read-only
pub struct AmbientTemperature;
impl Reg for AmbientTemperature { const ADDR: u8 = 0x01; }

impl Readable for AmbientTemperature {
    type Out = i16;

    fn decode(b: [u8; REG_BYTES]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(i16::from_be_bytes(b))
    }
}

/// A pair of raw result register values.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// Contents of register 0x00.
    pub object_voltage: i16,
    /// Contents of register 0x01.
    pub ambient_temperature: i16,
}
