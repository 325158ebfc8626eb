//! Small shared helpers.

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds in a 365.25-day year, the convention used to turn unix
/// expiration timestamps into year fractions.
pub const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0;

/// Current wall-clock time as unix seconds.
///
/// A clock set before the epoch yields `0` rather than an error.
#[must_use]
pub fn current_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}

/// Year fraction between `now` and `expiration`, both unix seconds.
/// Negative once the expiration has passed.
#[must_use]
pub fn years_until(expiration: i64, now: i64) -> f64 {
    expiration.saturating_sub(now) as f64 / SECONDS_PER_YEAR
}
