//! ### Identification registers (`0xFE`, `0xFF`, 2 bytes each, R)
//!
//! Fixed values, identical on every TMP006. A mismatch means a different
//! device is answering at the address or the bus is corrupting data.
use crate::register::{InvalidRegisterField, REG_BYTES, Readable, Reg};

/// Texas Instruments, "TI" in ASCII.
pub const TMP006_MANUFACTURER_ID: u16 = 0x5449;
pub const TMP006_DEVICE_ID: u16 = 0x0067;

/// Marker struct for the manufacturer ID register (0xFE)
///
/// - **Length:** 2 bytes
/// - **Access:** Read-only
pub struct ManufacturerId;
impl Reg for ManufacturerId { const ADDR: u8 = 0xFE; }

impl Readable for ManufacturerId {
    type Out = u16;

    fn decode(b: [u8; REG_BYTES]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(u16::from_be_bytes(b))
    }
}

/// Marker struct for the device ID register (0xFF)
///
/// - **Length:** 2 bytes
/// - **Access:** Read-only
pub struct DeviceId;
impl Reg for DeviceId { const ADDR: u8 = 0xFF; }

impl Readable for DeviceId {
    type Out = u16;

    fn decode(b: [u8; REG_BYTES]) -> Result<Self::Out, InvalidRegisterField> {
        Ok(u16::from_be_bytes(b))
    }
}
