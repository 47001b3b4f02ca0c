//! Transport between the driver and the TMP006.
//!
//! The device only knows 16 bit registers behind an 8 bit pointer, so the
//! whole contract is "read two bytes from a register" and "write two bytes to
//! a register". Implement [`Bus`] directly for anything that is not an
//! embedded-hal I2C bus.

use embedded_hal::i2c::SevenBitAddress;

use crate::register::REG_BYTES;

pub trait Bus {
    type Error;

    /// Reads the register at `reg`, MSB first.
    fn read_register(&mut self, reg: u8) -> impl Future<Output = Result<[u8; REG_BYTES], Self::Error>>;

    /// Writes `data` (MSB first) to the register at `reg`.
    fn write_register(&mut self, reg: u8, data: [u8; REG_BYTES]) -> impl Future<Output = Result<(), Self::Error>>;
}

/// Async I2C transport.
pub struct I2c<I2cType> {
    i2c: I2cType,
    address: SevenBitAddress,
}

impl<I2cType> I2c<I2cType>
where
    I2cType: embedded_hal_async::i2c::I2c,
{
    pub(crate) fn new(i2c: I2cType, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }

    pub(crate) fn release(self) -> I2cType {
        self.i2c
    }
}

impl<I2cType> Bus for I2c<I2cType>
where
    I2cType: embedded_hal_async::i2c::I2c,
{
    type Error = <I2cType as embedded_hal_async::i2c::ErrorType>::Error;

    async fn read_register(&mut self, reg: u8) -> Result<[u8; REG_BYTES], Self::Error> {
        let mut buf = [0u8; REG_BYTES];
        self.i2c.write_read(self.address, &[reg], &mut buf).await?;

        Ok(buf)
    }

    async fn write_register(&mut self, reg: u8, data: [u8; REG_BYTES]) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[reg, data[0], data[1]]).await?;

        Ok(())
    }
}

/// Blocking I2C transport for HALs without async support.
///
/// Every transfer completes before the returned future is first polled, so
/// the only point where the driver actually yields is the conversion wait.
pub struct BlockingI2c<I2cType> {
    i2c: I2cType,
    address: SevenBitAddress,
}

impl<I2cType> BlockingI2c<I2cType>
where
    I2cType: embedded_hal::i2c::I2c,
{
    pub(crate) fn new(i2c: I2cType, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }

    pub(crate) fn release(self) -> I2cType {
        self.i2c
    }
}

impl<I2cType> Bus for BlockingI2c<I2cType>
where
    I2cType: embedded_hal::i2c::I2c,
{
    type Error = <I2cType as embedded_hal::i2c::ErrorType>::Error;

    async fn read_register(&mut self, reg: u8) -> Result<[u8; REG_BYTES], Self::Error> {
        let mut buf = [0u8; REG_BYTES];
        self.i2c.write_read(self.address, &[reg], &mut buf)?;

        Ok(buf)
    }

    async fn write_register(&mut self, reg: u8, data: [u8; REG_BYTES]) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[reg, data[0], data[1]])?;

        Ok(())
    }
}
