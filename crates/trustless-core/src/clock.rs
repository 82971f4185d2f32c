//! Time sources for order expiry and request nonces.

use chrono::{DateTime, Utc};

use crate::{Error, Result};

/// Source of wall-clock time.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current time.
    fn now(&self) -> Result<DateTime<Utc>>;

    /// Current time as whole seconds since the Unix epoch.
    fn unix_seconds(&self) -> Result<u64> {
        let now = self.now()?;
        u64::try_from(now.timestamp()).map_err(|_| Error::Clock {
            message: format!("clock reports a time before the Unix epoch: {now}"),
        })
    }

    /// Current time as milliseconds since the Unix epoch.
    fn unix_millis(&self) -> Result<u64> {
        let now = self.now()?;
        u64::try_from(now.timestamp_millis()).map_err(|_| Error::Clock {
            message: format!("clock reports a time before the Unix epoch: {now}"),
        })
    }
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<DateTime<Utc>> {
        Ok(Utc::now())
    }
}

/// A clock frozen at a fixed instant, for reproducible builds.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Freeze the clock at `secs` seconds after the Unix epoch.
    pub fn at_unix(secs: i64) -> Self {
        Self(DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Result<DateTime<Utc>> {
        Ok(self.0)
    }
}
