use core::cell::{Cell, RefCell};
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

use embassy_time::{Duration, Instant};
use embedded_hal_async::delay::DelayNs;
use heapless::LinearMap;

use crate::Tmp006;
use crate::bus::Bus;
use crate::clock::Clock;
use crate::config::Configuration;
use crate::event::{Event, EventKind, EventSink, Reading};
use crate::register::config::{Config, ConfigWord};
use crate::register::data::{AmbientTemperature, ObjectVoltage};
use crate::register::id::{DeviceId, ManufacturerId, TMP006_DEVICE_ID, TMP006_MANUFACTURER_ID};
use crate::register::{REG_BYTES, Reg};
use crate::setting::{SettingKind, SettingPhase, SettingValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeBusError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Read(u8),
    Write(u8, [u8; REG_BYTES]),
}

/// Register-level model of a TMP006 sitting on a bus.
///
/// Starts out with the power-on register contents and a sample of
/// -732 / 2128 in the result registers.
pub struct FakeDevice {
    regs: LinearMap<u8, u16, 8>,
    ops: Vec<Op>,
    failing_reads: LinearMap<u8, (), 8>,
    reads_until_failure: Option<usize>,
    fail_writes: bool,
    ignore_writes: bool,
}

impl FakeDevice {
    pub fn new() -> Self {
        let mut regs = LinearMap::new();
        regs.insert(ObjectVoltage::ADDR, 0xFD24).unwrap();
        regs.insert(AmbientTemperature::ADDR, 0x0850).unwrap();
        regs.insert(Config::ADDR, ConfigWord::POWER_ON_DEFAULT.0).unwrap();
        regs.insert(ManufacturerId::ADDR, TMP006_MANUFACTURER_ID).unwrap();
        regs.insert(DeviceId::ADDR, TMP006_DEVICE_ID).unwrap();

        FakeDevice {
            regs,
            ops: Vec::new(),
            failing_reads: LinearMap::new(),
            reads_until_failure: None,
            fail_writes: false,
            ignore_writes: false,
        }
    }

    pub fn set_register(&mut self, reg: u8, value: u16) {
        self.regs.insert(reg, value).unwrap();
    }

    pub fn register(&self, reg: u8) -> u16 {
        self.regs[&reg]
    }

    pub fn fail_reads_of(&mut self, reg: u8) {
        self.failing_reads.insert(reg, ()).unwrap();
    }

    /// Fails only the `n`th read from now on, counting from 1.
    pub fn fail_nth_read(&mut self, n: usize) {
        self.reads_until_failure = Some(n);
    }

    pub fn fail_writes(&mut self) {
        self.fail_writes = true;
    }

    /// Acknowledges writes without applying them.
    pub fn ignore_writes(&mut self) {
        self.ignore_writes = true;
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }
}

impl Bus for FakeDevice {
    type Error = FakeBusError;

    async fn read_register(&mut self, reg: u8) -> Result<[u8; REG_BYTES], Self::Error> {
        self.ops.push(Op::Read(reg));
        if self.failing_reads.contains_key(&reg) {
            return Err(FakeBusError);
        }
        if let Some(n) = self.reads_until_failure {
            self.reads_until_failure = n.checked_sub(1).filter(|left| *left > 0);
            if n == 1 {
                return Err(FakeBusError);
            }
        }

        self.regs.get(&reg).map(|v| v.to_be_bytes()).ok_or(FakeBusError)
    }

    async fn write_register(&mut self, reg: u8, data: [u8; REG_BYTES]) -> Result<(), Self::Error> {
        self.ops.push(Op::Write(reg, data));
        if self.fail_writes || reg != Config::ADDR {
            return Err(FakeBusError);
        }
        if self.ignore_writes {
            return Ok(());
        }

        let word = ConfigWord::from_bytes(data);
        let stored = if word.reset_requested() { ConfigWord::POWER_ON_DEFAULT } else { word };
        self.regs.insert(reg, stored.0).unwrap();

        Ok(())
    }
}

/// Manually advanced clock, shared between clones.
#[derive(Clone, Default)]
pub struct FakeClock {
    micros: Rc<Cell<u64>>,
}

impl FakeClock {
    pub fn advance(&self, by: Duration) {
        self.micros.set(self.micros.get() + by.as_micros());
    }
}

/// Unix time the fake clock starts at.
pub const FAKE_EPOCH_SECONDS: u64 = 1_700_000_000;

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        Instant::from_micros(self.micros.get())
    }

    fn unix_seconds(&self) -> u64 {
        FAKE_EPOCH_SECONDS + self.micros.get() / 1_000_000
    }
}

/// Delay that moves a [`FakeClock`] forward instead of sleeping.
#[derive(Clone)]
pub struct FakeDelay {
    clock: FakeClock,
    total_ns: Rc<Cell<u64>>,
}

impl FakeDelay {
    pub fn new(clock: FakeClock) -> Self {
        FakeDelay { clock, total_ns: Rc::default() }
    }

    /// Everything waited so far.
    pub fn total(&self) -> Duration {
        Duration::from_micros(self.total_ns.get() / 1_000)
    }
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns.set(self.total_ns.get() + ns as u64);
        self.clock.advance(Duration::from_micros(ns as u64 / 1_000));
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub name: &'static str,
    pub address: u8,
    pub device: &'static str,
    pub timestamp: u64,
    /// `Display` text of the carried error.
    pub error: Option<String>,
    pub setting: Option<SettingValue>,
    pub failure: Option<(SettingKind, SettingPhase)>,
    pub reading: Option<Reading>,
}

/// Keeps every event, shared between clones.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<Recorded>>>,
}

impl RecordingSink {
    pub fn names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(|e| e.name).collect()
    }

    pub fn last(&self) -> Option<Recorded> {
        self.events.borrow().last().cloned()
    }
}

impl<E> EventSink<E> for RecordingSink {
    fn emit(&mut self, event: &Event<'_, E>) {
        let (setting, failure, reading) = match event.kind {
            EventKind::SettingChanged(value) => (Some(value), None, None),
            EventKind::SettingFailed { setting, phase, .. } => (None, Some((setting, phase)), None),
            EventKind::NewMeasurement(reading) => (None, None, Some(reading)),
            _ => (None, None, None),
        };

        self.events.borrow_mut().push(Recorded {
            name: event.kind.name(),
            address: event.address,
            device: event.device,
            timestamp: event.timestamp,
            error: event.kind.error().map(|e| e.to_string()),
            setting,
            failure,
            reading,
        });
    }
}

pub type TestDevice = Tmp006<FakeDevice, FakeDelay, FakeClock, RecordingSink>;

/// Handles onto the fakes a [`TestDevice`] was built with.
pub struct Harness {
    pub clock: FakeClock,
    pub delay: FakeDelay,
    pub events: RecordingSink,
}

pub fn test_device(fake: FakeDevice, config: Configuration) -> (TestDevice, Harness) {
    let clock = FakeClock::default();
    let delay = FakeDelay::new(clock.clone());
    let events = RecordingSink::default();

    let device = Tmp006::new(fake, config, delay.clone())
        .with_clock(clock.clone())
        .with_event_sink(events.clone());

    (device, Harness { clock, delay, events })
}
