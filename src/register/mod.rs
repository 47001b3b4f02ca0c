//! Register catalog of the TMP006.
//!
//! Every register is 16 bits wide and transferred MSB first. Each register is
//! represented by a marker type implementing [`Reg`] plus [`Readable`] and/or
//! [`Writable`], which convert between the two wire bytes and a typed value.
//!
//! | Address | Marker | Access |
//! |---|---|---|
//! | `0x00` | [`data::ObjectVoltage`] | R |
//! | `0x01` | [`data::AmbientTemperature`] | R |
//! | `0x02` | [`config::Config`] | R/W |
//! | `0xFE` | [`id::ManufacturerId`] | R |
//! | `0xFF` | [`id::DeviceId`] | R |

pub mod config;
pub mod data;
pub mod id;

/// Number of bytes in every TMP006 register.
pub const REG_BYTES: usize = 2;

/// A field read from a register held a code that has no meaning for that field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidRegisterField {
    pub register: u8,
    pub value: u8,
    pub bit_offset: u8,
}

impl InvalidRegisterField {
    pub fn new(register: u8, value: u8, bit_offset: u8) -> Self {
        Self { register, value, bit_offset }
    }
}

/// A field code that is not in the field's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnexpectedValue(pub u8);

pub trait Reg { const ADDR: u8; }

pub trait Readable: Reg {
    type Out;
    fn decode(b: [u8; REG_BYTES]) -> Result<Self::Out, InvalidRegisterField>;
}

pub trait Writable: Reg {
    type In;
    fn encode(v: &Self::In) -> [u8; REG_BYTES];
}
