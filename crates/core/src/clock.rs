use std::time::{SystemTime, UNIX_EPOCH};

use crate::CoreError;

/// Milliseconds since the Unix epoch.
pub type Millis = i64;

pub const MILLIS_PER_DAY: Millis = 24 * 60 * 60 * 1000;

/// Returns the current wall-clock time as milliseconds since Unix epoch.
pub fn wall_now() -> Result<Millis, CoreError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as Millis)
        .map_err(|_| CoreError::InvalidData("system clock before epoch".into()))
}

/// A clock that generates strictly increasing millisecond stamps.
///
/// Repeated ticks within the same wall millisecond (or after the wall clock
/// steps backwards) advance by one, so `updated_at` stamps produced by one
/// writer never tie or regress.
pub struct Clock {
    last: Millis,
}

impl Clock {
    pub fn new() -> Self {
        Self { last: 0 }
    }

    pub fn tick(&mut self) -> Result<Millis, CoreError> {
        let now = wall_now()?;
        let stamp = if now > self.last { now } else { self.last + 1 };
        self.last = stamp;
        Ok(stamp)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
