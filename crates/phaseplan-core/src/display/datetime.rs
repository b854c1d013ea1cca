//! Date/time display utilities.

use std::fmt;

use jiff::{tz::TimeZone, SignedDuration, Timestamp};

/// Formats a timestamp in the system timezone as `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// Formats a duration as hours, minutes and seconds, e.g. `1h 0m 0s` or
/// `59m 59s`.
pub struct HumanDuration(pub SignedDuration);

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.as_secs();
        let sign = if total < 0 { "-" } else { "" };
        let total = total.unsigned_abs();
        let (hours, minutes, seconds) = (total / 3600, total % 3600 / 60, total % 60);

        if hours > 0 {
            write!(f, "{sign}{hours}h {minutes}m {seconds}s")
        } else if minutes > 0 {
            write!(f, "{sign}{minutes}m {seconds}s")
        } else {
            write!(f, "{sign}{seconds}s")
        }
    }
}
