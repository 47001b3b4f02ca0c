use embassy_time::{Duration, Instant, TICK_HZ};
use embedded_hal_async::delay::DelayNs;

use crate::bus::{BlockingI2c, Bus, I2c};
use crate::calculation;
use crate::clock::{Clock, EmbassyClock};
use crate::config::Configuration;
use crate::error::Tmp006Error;
use crate::event::{DEVICE_TYPE, Event, EventKind, EventSink, Measurement, NoEvents, Reading};
use crate::register::config::{Config, ConfigWord, ConversionRate, DataReadyPin, DataReadyStatus, OperatingMode};
use crate::register::data::{AmbientTemperature, ObjectVoltage, RawSample};
use crate::register::id::{DeviceId, ManufacturerId, TMP006_DEVICE_ID, TMP006_MANUFACTURER_ID};
use crate::register::{Readable, Writable};
use crate::setting::{Setting, SettingPhase, SettingValue};

/// Type alias used to simplify return types throughout the driver
pub type Tmp006Result<T, BusError> = Result<T, Tmp006Error<BusError>>;

/// Main TMP006 driver struct
///
/// Owns the bus, a delay used to wait out conversions, a [`Clock`] and an
/// [`EventSink`]. All register traffic goes through `&mut self`, so a single
/// owner can never interleave two read-modify-write sequences. Use
/// [`SharedTmp006`](crate::shared::SharedTmp006) to share one device between tasks.
pub struct Tmp006<B, D, C = EmbassyClock, S = NoEvents> {
    bus: B,
    delay: D,
    clock: C,
    events: S,
    config: Configuration,
    conversion_rate: ConversionRate,
    last_config_write: Option<Instant>,
    last_value_read: Option<Instant>,
}

impl<T, D> Tmp006<I2c<T>, D>
where
    T: embedded_hal_async::i2c::I2c,
    D: DelayNs,
{
    /// Constructs a driver talking to the device over an async I2C bus at `config`'s address.
    ///
    /// No bus traffic happens until [`init`](Self::init) is called.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use embedded_hal_async::delay::DelayNs;
    /// # use embedded_hal_async::i2c::I2c;
    /// # use tmp006_rs::Tmp006Result;
    /// use tmp006_rs::Tmp006;
    /// use tmp006_rs::config::Configuration;
    /// use tmp006_rs::register::config::ConversionRate;
    /// # async fn demo<I: I2c, D: DelayNs>(i2c: I, delay: D) -> Tmp006Result<(), I::Error> {
    ///
    /// let mut device = Tmp006::new_i2c(
    ///     i2c,
    ///     Configuration::default().conversion_rate(ConversionRate::R0p25),
    ///     delay,
    /// );
    /// device.init().await?;
    /// let celsius = device.object_temperature().await?;
    /// # let _ = celsius;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new_i2c(i2c: T, config: Configuration, delay: D) -> Self {
        Self::new(I2c::new(i2c, config.address), config, delay)
    }
}

impl<T, D, C, S> Tmp006<I2c<T>, D, C, S>
where
    T: embedded_hal_async::i2c::I2c,
{
    /// Destroys the driver and hands back the I2C bus.
    pub fn release(self) -> T {
        self.bus.release()
    }
}

impl<T, D> Tmp006<BlockingI2c<T>, D>
where
    T: embedded_hal::i2c::I2c,
    D: DelayNs,
{
    /// Constructs a driver on top of a blocking I2C bus.
    pub fn new_blocking_i2c(i2c: T, config: Configuration, delay: D) -> Self {
        Self::new(BlockingI2c::new(i2c, config.address), config, delay)
    }
}

impl<T, D, C, S> Tmp006<BlockingI2c<T>, D, C, S>
where
    T: embedded_hal::i2c::I2c,
{
    /// Destroys the driver and hands back the I2C bus.
    pub fn release(self) -> T {
        self.bus.release()
    }
}

impl<B, D> Tmp006<B, D> {
    /// Constructs a driver on any [`Bus`] implementation.
    pub fn new(bus: B, config: Configuration, delay: D) -> Self {
        Self {
            bus,
            delay,
            clock: EmbassyClock,
            events: NoEvents,
            config,
            conversion_rate: ConversionRate::default(),
            last_config_write: None,
            last_value_read: None,
        }
    }
}

impl<B, D, C, S> Tmp006<B, D, C, S> {
    /// Replaces the time source.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Tmp006<B, D, C2, S> {
        Tmp006 {
            bus: self.bus,
            delay: self.delay,
            clock,
            events: self.events,
            config: self.config,
            conversion_rate: self.conversion_rate,
            last_config_write: self.last_config_write,
            last_value_read: self.last_value_read,
        }
    }

    /// Routes events to `events` instead of dropping them.
    pub fn with_event_sink<S2>(self, events: S2) -> Tmp006<B, D, C, S2> {
        Tmp006 {
            bus: self.bus,
            delay: self.delay,
            clock: self.clock,
            events,
            config: self.config,
            conversion_rate: self.conversion_rate,
            last_config_write: self.last_config_write,
            last_value_read: self.last_value_read,
        }
    }

    pub fn address(&self) -> u8 {
        self.config.address
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// When a configuration write was last confirmed by the device.
    pub fn last_config_write(&self) -> Option<Instant> {
        self.last_config_write
    }

    /// When a result register was last read successfully.
    pub fn last_value_read(&self) -> Option<Instant> {
        self.last_value_read
    }

    /// The conversion rate the driver assumes when timing measurements.
    ///
    /// This is the last rate confirmed by [`set`](Self::set), or the power-on
    /// default before that and after a [`soft_reset`](Self::soft_reset).
    pub fn assumed_conversion_rate(&self) -> ConversionRate {
        self.conversion_rate
    }

    #[cfg(test)]
    pub(crate) fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

impl<B, D, C, S> Tmp006<B, D, C, S>
where
    B: Bus,
    D: DelayNs,
    C: Clock,
    S: EventSink<B::Error>,
{
    fn emit(&mut self, kind: EventKind<'_, B::Error>) {
        let event = Event {
            address: self.config.address,
            device: DEVICE_TYPE,
            timestamp: self.clock.unix_seconds(),
            kind,
        };
        self.events.emit(&event);
    }

    async fn read<R: Readable>(&mut self) -> Tmp006Result<R::Out, B::Error> {
        let bytes = self.bus.read_register(R::ADDR).await.map_err(Tmp006Error::Bus)?;

        Ok(R::decode(bytes)?)
    }

    async fn write<W: Writable>(&mut self, v: &W::In) -> Tmp006Result<(), B::Error> {
        self.bus.write_register(W::ADDR, W::encode(v)).await.map_err(Tmp006Error::Bus)
    }

    /// Verifies the identity of the device and applies the [`Configuration`].
    ///
    /// This function will:
    /// - Read the manufacturer ID and fail with [`Tmp006Error::WrongManufacturerId`] unless it is `0x5449`.
    /// - Read the device ID and fail with [`Tmp006Error::WrongDeviceId`] unless it is `0x0067`.
    /// - Set operating mode, conversion rate and DRDY pin mode, in that order, each verified by reading it back.
    ///
    /// The first failure aborts the sequence. Emits `deviceInitCompleted` or `deviceInitFailed`.
    pub async fn init(&mut self) -> Tmp006Result<(), B::Error> {
        let result = self.configure().await;

        match &result {
            Ok(()) => {
                info!("TMP006 at {} initialized", self.config.address);
                self.emit(EventKind::InitCompleted);
            }
            Err(error) => {
                error!("TMP006 at {} failed to initialize", self.config.address);
                self.emit(EventKind::InitFailed(error));
            }
        }

        result
    }

    async fn configure(&mut self) -> Tmp006Result<(), B::Error> {
        self.verify_identity().await?;

        let config = self.config;
        self.set(config.operating_mode).await?;
        self.set(config.conversion_rate).await?;
        self.set(config.data_ready_pin).await?;

        Ok(())
    }

    /// Checks both identification registers, manufacturer first.
    ///
    /// The device ID is not read when the manufacturer ID is already wrong.
    pub async fn verify_identity(&mut self) -> Tmp006Result<(), B::Error> {
        let manufacturer_id = self.manufacturer_id().await?;
        if manufacturer_id != TMP006_MANUFACTURER_ID {
            error!("wrong manufacturer id {}", manufacturer_id);
            return Err(Tmp006Error::WrongManufacturerId(manufacturer_id));
        }

        let device_id = self.device_id().await?;
        if device_id != TMP006_DEVICE_ID {
            error!("wrong device id {}", device_id);
            return Err(Tmp006Error::WrongDeviceId(device_id));
        }

        debug!("identity verified");
        Ok(())
    }

    /// Reads the manufacturer ID (0xFE) register.
    pub async fn manufacturer_id(&mut self) -> Tmp006Result<u16, B::Error> {
        self.read::<ManufacturerId>().await
    }

    /// Reads the device ID (0xFF) register.
    pub async fn device_id(&mut self) -> Tmp006Result<u16, B::Error> {
        self.read::<DeviceId>().await
    }

    /// Reads a field of the configuration register.
    ///
    /// Never changes any timestamp.
    pub async fn get<F: Setting>(&mut self) -> Tmp006Result<F, B::Error> {
        let word = self.read::<Config>().await?;

        Ok(F::decode(word)?)
    }

    /// Changes one field of the configuration register.
    ///
    /// The register is read, the field replaced, the word written back and
    /// read again. Only when the read-back shows `value` is the change
    /// committed: the configuration timestamp moves to now and `value` is
    /// returned. Otherwise [`Tmp006Error::NotSet`] (or the bus error) is
    /// returned and the timestamp is left alone.
    ///
    /// Emits `settingChanged` or `settingFailed`.
    ///
    /// # Examples
    /// ```rust,no_run
    /// # use embedded_hal_async::delay::DelayNs;
    /// # use tmp006_rs::{Tmp006, Tmp006Result};
    /// # use tmp006_rs::bus::Bus;
    /// # use tmp006_rs::clock::Clock;
    /// # use tmp006_rs::event::EventSink;
    /// use tmp006_rs::register::config::OperatingMode;
    /// # async fn demo<B: Bus, D: DelayNs, C: Clock, S: EventSink<B::Error>>(
    /// #     mut device: Tmp006<B, D, C, S>,
    /// # ) -> Tmp006Result<(), B::Error> {
    /// device.set(OperatingMode::PowerDown).await?;
    /// # Ok(()) }
    /// ```
    pub async fn set<F: Setting>(&mut self, value: F) -> Tmp006Result<F, B::Error> {
        let setting: SettingValue = value.into();

        match self.read_modify_write_verify(value).await {
            Ok(()) => {
                self.last_config_write = Some(self.clock.now());
                if let SettingValue::ConversionRate(rate) = setting {
                    self.conversion_rate = rate;
                }
                debug!("{} committed", setting);
                self.emit(EventKind::SettingChanged(setting));

                Ok(value)
            }
            Err((phase, error)) => {
                warn!("{} failed while {}", setting, phase);
                self.emit(EventKind::SettingFailed { setting: F::KIND, phase, error: &error });

                Err(error)
            }
        }
    }

    /// Like [`set`](Self::set), taking the textual name of the value (`"continuous"`, `"0.25"`, `"enabled"`, ...).
    ///
    /// An unknown name fails with [`Tmp006Error::InvalidValue`] before any bus traffic.
    pub async fn set_from_str<F: Setting>(&mut self, value: &str) -> Tmp006Result<F, B::Error> {
        match value.parse::<F>() {
            Ok(value) => self.set(value).await,
            Err(e) => {
                let error = Tmp006Error::from(e);
                warn!("rejected {} value", F::KIND);
                self.emit(EventKind::SettingFailed {
                    setting: F::KIND,
                    phase: SettingPhase::Validating,
                    error: &error,
                });

                Err(error)
            }
        }
    }

    async fn read_modify_write_verify<F: Setting>(
        &mut self,
        value: F,
    ) -> Result<(), (SettingPhase, Tmp006Error<B::Error>)> {
        let current = self
            .read::<Config>()
            .await
            .map_err(|e| (SettingPhase::Reading, e))?;

        // A set reset bit would restart the device instead of applying the change.
        let next = value.encode(current.without_reset());
        trace!("config {} -> {}", current.0, next.0);

        self.write::<Config>(&next)
            .await
            .map_err(|e| (SettingPhase::ReadModifyWrite, e))?;

        let readback = self
            .read::<Config>()
            .await
            .map_err(|e| (SettingPhase::Verifying, e))?;

        match F::decode(readback) {
            Ok(actual) if actual == value => Ok(()),
            _ => Err((SettingPhase::Verifying, Tmp006Error::NotSet(F::KIND))),
        }
    }

    pub async fn operating_mode(&mut self) -> Tmp006Result<OperatingMode, B::Error> {
        self.get().await
    }

    pub async fn set_operating_mode(&mut self, mode: OperatingMode) -> Tmp006Result<OperatingMode, B::Error> {
        self.set(mode).await
    }

    pub async fn conversion_rate(&mut self) -> Tmp006Result<ConversionRate, B::Error> {
        self.get().await
    }

    pub async fn set_conversion_rate(&mut self, rate: ConversionRate) -> Tmp006Result<ConversionRate, B::Error> {
        self.set(rate).await
    }

    pub async fn data_ready_pin(&mut self) -> Tmp006Result<DataReadyPin, B::Error> {
        self.get().await
    }

    pub async fn set_data_ready_pin(&mut self, pin: DataReadyPin) -> Tmp006Result<DataReadyPin, B::Error> {
        self.set(pin).await
    }

    /// Reads the DRDY status bit of the configuration register.
    pub async fn data_ready_status(&mut self) -> Tmp006Result<DataReadyStatus, B::Error> {
        let word = self.read::<Config>().await?;

        Ok(DataReadyStatus::from_word(word))
    }

    /// Triggers a soft reset
    ///
    /// Writes `0x8000` to the configuration register, which restores the
    /// power-on defaults (`0x7400`). The write restarts the conversion, so the
    /// configuration timestamp is advanced and the assumed conversion rate
    /// returns to 1 conversion/s.
    ///
    /// **Note:** This resets the chip to factory defaults, not to the configuration that was provided when constructing the driver.
    pub async fn soft_reset(&mut self) -> Tmp006Result<(), B::Error> {
        match self.write::<Config>(&ConfigWord::SOFT_RESET).await {
            Ok(()) => {
                self.last_config_write = Some(self.clock.now());
                self.conversion_rate = ConversionRate::default();
                info!("soft reset issued");
                self.emit(EventKind::SoftResetStarted);

                Ok(())
            }
            Err(error) => {
                warn!("soft reset failed");
                self.emit(EventKind::SoftResetFailed(&error));

                Err(error)
            }
        }
    }

    /// Reads the sensor voltage register (0x00) without waiting for a conversion.
    pub async fn read_raw_object_voltage(&mut self) -> Tmp006Result<i16, B::Error> {
        let raw = self.read::<ObjectVoltage>().await?;
        self.last_value_read = Some(self.clock.now());

        Ok(raw)
    }

    /// Reads the die temperature register (0x01) without waiting for a conversion.
    pub async fn read_raw_ambient_temperature(&mut self) -> Tmp006Result<i16, B::Error> {
        let raw = self.read::<AmbientTemperature>().await?;
        self.last_value_read = Some(self.clock.now());

        Ok(raw)
    }

    async fn wait_for_conversion(&mut self) {
        let wait = remaining_conversion_time(
            self.conversion_rate.conversion_time(),
            self.clock.now(),
            self.last_config_write,
            self.last_value_read,
        );

        if let Some(wait) = wait {
            let us = ceil_micros(wait);
            trace!("waiting {} us for conversion", us);
            self.delay.delay_us(us as u32).await;
        }
    }

    /// Waits until a conversion started after the last configuration change
    /// or result read has completed, then reads both result registers.
    ///
    /// Dropping the future while it waits leaves the driver untouched. No event is emitted.
    pub async fn read_raw(&mut self) -> Tmp006Result<RawSample, B::Error> {
        self.wait_for_conversion().await;

        let object_voltage = self.read_raw_object_voltage().await?;
        let ambient_temperature = self.read_raw_ambient_temperature().await?;

        Ok(RawSample { object_voltage, ambient_temperature })
    }

    /// Takes a fresh sample and returns the object temperature in °C.
    ///
    /// See [`read_raw`](Self::read_raw) for how long this waits. Emits `newMeasurement` or `measurementError`.
    pub async fn object_temperature(&mut self) -> Tmp006Result<f64, B::Error> {
        match self.read_raw().await {
            Ok(raw) => {
                let t = calculation::object_temperature(raw.object_voltage, raw.ambient_temperature);
                self.emit(EventKind::NewMeasurement(Reading::Object(t)));

                Ok(t)
            }
            Err(error) => {
                warn!("measurement failed");
                self.emit(EventKind::MeasurementError(&error));

                Err(error)
            }
        }
    }

    /// Takes a fresh sample and returns object and die temperature together with the raw codes.
    pub async fn read_all(&mut self) -> Tmp006Result<Measurement, B::Error> {
        match self.read_raw().await {
            Ok(raw) => {
                let measurement = Measurement {
                    object_temperature: calculation::object_temperature(raw.object_voltage, raw.ambient_temperature),
                    die_temperature: calculation::die_temperature(raw.ambient_temperature),
                    raw,
                };
                self.emit(EventKind::NewMeasurement(Reading::All(measurement)));

                Ok(measurement)
            }
            Err(error) => {
                warn!("measurement failed");
                self.emit(EventKind::MeasurementError(&error));

                Err(error)
            }
        }
    }
}

/// How much longer a conversion may still be running.
///
/// Both a configuration write and a result read restart the conversion, so the
/// most recent of the two counts. Returns `None` when nothing needs to be waited for.
pub(crate) fn remaining_conversion_time(
    conversion_time: Duration,
    now: Instant,
    last_config_write: Option<Instant>,
    last_value_read: Option<Instant>,
) -> Option<Duration> {
    let elapsed = [last_config_write, last_value_read]
        .into_iter()
        .flatten()
        .map(|t| now.saturating_duration_since(t))
        .min()?;

    conversion_time
        .checked_sub(elapsed)
        .filter(|wait| wait.as_ticks() > 0)
}

/// `d` in microseconds, rounded up so a wait never ends before the last tick.
fn ceil_micros(d: Duration) -> u64 {
    (d.as_ticks() * 1_000_000).div_ceil(TICK_HZ)
}
