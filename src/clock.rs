//! Time sources.
//!
//! The driver needs a monotonic clock to decide whether a conversion can
//! still be in flight, and a wall clock to stamp events. Both come from one
//! [`Clock`] so tests can substitute a fake.

use embassy_time::Instant;

pub trait Clock {
    /// Monotonic time, used for conversion timing.
    fn now(&self) -> Instant;

    /// Seconds since the unix epoch, used to stamp events.
    ///
    /// Defaults to seconds since the monotonic clock started, which is all a
    /// target without a real-time clock can offer.
    fn unix_seconds(&self) -> u64 {
        self.now().as_secs()
    }
}

/// Reads the embassy time driver.
#[derive(Copy, Clone, Debug, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Embassy monotonic time plus the host's real-time clock for event stamps.
#[cfg(feature = "std")]
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn unix_seconds(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
