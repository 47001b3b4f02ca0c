//! Notifications emitted by the driver.
//!
//! Every public operation that talks to the device reports its outcome to an
//! [`EventSink`] exactly once, in addition to returning it. The sink is
//! called synchronously from inside the operation and must not block.

use crate::error::Tmp006Error;
use crate::register::data::RawSample;
use crate::setting::{SettingKind, SettingPhase, SettingValue};
#[cfg(feature = "uom")]
use uom::si::thermodynamic_temperature::degree_celsius;

/// Type tag carried by every event.
pub const DEVICE_TYPE: &str = "TMP006";

/// Calibrated result of a fresh measurement.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Object temperature in °C, two decimals.
    pub object_temperature: f64,
    /// Die temperature in °C, two decimals.
    pub die_temperature: f64,
    /// The register values both temperatures were computed from.
    pub raw: RawSample,
}

#[cfg(feature = "uom")]
impl Measurement {
    pub fn object_temperature_uom(&self) -> uom::si::f64::ThermodynamicTemperature {
        uom::si::f64::ThermodynamicTemperature::new::<degree_celsius>(self.object_temperature)
    }

    pub fn die_temperature_uom(&self) -> uom::si::f64::ThermodynamicTemperature {
        uom::si::f64::ThermodynamicTemperature::new::<degree_celsius>(self.die_temperature)
    }
}

/// Payload of [`EventKind::NewMeasurement`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    /// Result of [`Tmp006::object_temperature`](crate::Tmp006::object_temperature).
    Object(f64),
    /// Result of [`Tmp006::read_all`](crate::Tmp006::read_all).
    All(Measurement),
}

#[derive(Debug)]
pub struct Event<'a, E> {
    /// I2C address of the device.
    pub address: u8,
    /// Always [`DEVICE_TYPE`].
    pub device: &'static str,
    /// Unix seconds as reported by the driver's [`Clock::unix_seconds`](crate::clock::Clock::unix_seconds).
    ///
    /// With the default [`EmbassyClock`](crate::clock::EmbassyClock) this is seconds since boot.
    pub timestamp: u64,
    pub kind: EventKind<'a, E>,
}

#[derive(Debug)]
pub enum EventKind<'a, E> {
    InitCompleted,
    InitFailed(&'a Tmp006Error<E>),
    SettingChanged(SettingValue),
    SettingFailed {
        setting: SettingKind,
        phase: SettingPhase,
        error: &'a Tmp006Error<E>,
    },
    SoftResetStarted,
    SoftResetFailed(&'a Tmp006Error<E>),
    NewMeasurement(Reading),
    MeasurementError(&'a Tmp006Error<E>),
}

impl<E> EventKind<'_, E> {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::InitCompleted => "deviceInitCompleted",
            EventKind::InitFailed(_) => "deviceInitFailed",
            EventKind::SettingChanged(_) => "settingChanged",
            EventKind::SettingFailed { .. } => "settingFailed",
            EventKind::SoftResetStarted => "softResetStarted",
            EventKind::SoftResetFailed(_) => "softResetFailed",
            EventKind::NewMeasurement(_) => "newMeasurement",
            EventKind::MeasurementError(_) => "measurementError",
        }
    }

    /// The error carried by a failure event.
    pub fn error(&self) -> Option<&Tmp006Error<E>> {
        match self {
            EventKind::InitFailed(e)
            | EventKind::SoftResetFailed(e)
            | EventKind::MeasurementError(e) => Some(e),
            EventKind::SettingFailed { error, .. } => Some(error),
            _ => None,
        }
    }
}

pub trait EventSink<E> {
    fn emit(&mut self, event: &Event<'_, E>);
}

/// Discards all events.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoEvents;

impl<E> EventSink<E> for NoEvents {
    fn emit(&mut self, _event: &Event<'_, E>) {}
}

/// Forwards events to a closure.
pub struct FnSink<F>(pub F);

impl<F> FnSink<F> {
    /// Wraps `f`, letting the compiler infer the closure's argument type from the bound.
    pub fn new<E>(f: F) -> Self
    where
        F: FnMut(&Event<'_, E>),
    {
        Self(f)
    }
}

impl<E, F> EventSink<E> for FnSink<F>
where
    F: FnMut(&Event<'_, E>),
{
    fn emit(&mut self, event: &Event<'_, E>) {
        (self.0)(event)
    }
}

impl<E, S: EventSink<E> + ?Sized> EventSink<E> for &mut S {
    fn emit(&mut self, event: &Event<'_, E>) {
        (**self).emit(event)
    }
}
