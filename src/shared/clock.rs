//! Time related functions and types.
//!
//! The backend uses two clocks:
//!
//! - [`Working`]: the real system clock, used in production.
//! - [`Stopped`]: a fixed clock for unit tests. It starts at the Unix epoch
//!   and can be moved with [`Stopped::local_set`].
//!
//! Code should not use these types directly but the `CurrentClock` alias
//! defined in the crate root, which picks the right one depending on whether
//! the crate is compiled for testing or not.
use std::cell::Cell;
use std::marker::PhantomData;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, SecondsFormat};

/// Duration since the Unix Epoch.
pub type DurationSinceUnixEpoch = Duration;

/// A generic structure that represents a clock.
#[derive(Debug)]
pub struct Clock<T> {
    clock: PhantomData<T>,
}

#[derive(Debug)]
pub struct WorkingClock;

#[derive(Debug)]
pub struct StoppedClock;

/// The working clock. It returns the current time.
pub type Working = Clock<WorkingClock>;
/// The stopped clock. It returns always the same fixed time.
pub type Stopped = Clock<StoppedClock>;

/// Trait for types that can be used as a timestamp clock.
pub trait Time: Sized {
    fn now() -> DurationSinceUnixEpoch;

    fn dbg_clock_type() -> String;

    /// The current time as an RFC 3339 timestamp with millisecond precision,
    /// the format used for every timestamp stored in documents.
    #[must_use]
    fn now_rfc3339() -> String {
        to_rfc3339(&Self::now())
    }
}

impl Time for Working {
    fn now() -> DurationSinceUnixEpoch {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default()
    }

    fn dbg_clock_type() -> String {
        "Working".to_owned()
    }
}

thread_local!(static FIXED_TIME: Cell<DurationSinceUnixEpoch> = const { Cell::new(Duration::ZERO) });

impl Time for Stopped {
    fn now() -> DurationSinceUnixEpoch {
        FIXED_TIME.with(Cell::get)
    }

    fn dbg_clock_type() -> String {
        "Stopped".to_owned()
    }
}

impl Stopped {
    /// Sets the time returned by the stopped clock in the current thread.
    pub fn local_set(unix_time: &DurationSinceUnixEpoch) {
        FIXED_TIME.with(|time| time.set(*unix_time));
    }

    /// Resets the stopped clock of the current thread to the Unix epoch.
    pub fn local_reset() {
        Self::local_set(&Duration::ZERO);
    }
}

/// Converts a duration since the Unix epoch into an RFC 3339 timestamp.
///
/// Durations out of the `chrono` range are rendered as the Unix epoch.
#[must_use]
pub fn to_rfc3339(duration: &DurationSinceUnixEpoch) -> String {
    let seconds = i64::try_from(duration.as_secs()).unwrap_or_default();

    DateTime::from_timestamp(seconds, duration.subsec_nanos())
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
