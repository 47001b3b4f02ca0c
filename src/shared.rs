//! Sharing one device between tasks.
//!
//! [`Tmp006`] needs `&mut self` for everything that touches the bus, which
//! already keeps one owner from interleaving two read-modify-write sequences.
//! Tasks that share a device go through an async mutex instead; every
//! operation then runs to completion under the lock, conversion wait included.
//!
//! ```rust,no_run
//! # use embassy_sync::blocking_mutex::raw::NoopRawMutex;
//! # use embedded_hal_async::delay::DelayNs;
//! # use tmp006_rs::bus::Bus;
//! # use tmp006_rs::clock::Clock;
//! # use tmp006_rs::event::EventSink;
//! # use tmp006_rs::shared::SharedTmp006;
//! # async fn demo<B: Bus, D: DelayNs, C: Clock, S: EventSink<B::Error>>(
//! #     device: &SharedTmp006<NoopRawMutex, B, D, C, S>,
//! # ) {
//! let celsius = device.lock().await.object_temperature().await;
//! # let _ = celsius;
//! # }
//! ```

use crate::Tmp006;

/// A [`Tmp006`] behind an [`embassy_sync::mutex::Mutex`].
///
/// Pick the raw mutex by where the tasks run: `NoopRawMutex` within one
/// executor, `CriticalSectionRawMutex` across executors or interrupts.
pub type SharedTmp006<M, B, D, C, S> = embassy_sync::mutex::Mutex<M, Tmp006<B, D, C, S>>;
