//! Server-local timestamps.
//!
//! The API reads and writes timestamps as `yyyy-MM-dd HH:mm:ss.fff` in Moscow
//! time, without an offset. [`ServerDateTime`] keeps that wall-clock value as
//! it is on the wire; conversions to UTC or the caller's zone go through an
//! explicit [`TimeZones`] value built from configuration.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The time zone the server uses for all timestamps.
pub const SERVER_TIME_ZONE: Tz = chrono_tz::Europe::Moscow;

/// Format used when writing timestamps.
pub const SERVER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const PARSE_FORMAT_SECONDS: &str = "%Y-%m-%d %H:%M:%S";

/// The pair of zones used to convert server timestamps.
///
/// # Example
///
/// ```rust
/// use moysklad_api::model::{TimeZones, SERVER_TIME_ZONE};
///
/// let zones = TimeZones::new(chrono_tz::Europe::Berlin);
/// assert_eq!(zones.server(), SERVER_TIME_ZONE);
/// assert_eq!(zones.user(), chrono_tz::Europe::Berlin);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeZones {
    server: Tz,
    user: Tz,
}

impl TimeZones {
    /// Creates zones for a caller in `user`, with the server in Moscow.
    #[must_use]
    pub const fn new(user: Tz) -> Self {
        Self {
            server: SERVER_TIME_ZONE,
            user,
        }
    }

    /// Returns the server zone.
    #[must_use]
    pub const fn server(&self) -> Tz {
        self.server
    }

    /// Returns the caller's zone.
    #[must_use]
    pub const fn user(&self) -> Tz {
        self.user
    }
}

impl Default for TimeZones {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

/// A timestamp in server-local time, as sent on the wire.
///
/// Serializes as a string in [`SERVER_DATE_FORMAT`]. Parsing accepts the
/// value with or without the fractional part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServerDateTime(NaiveDateTime);

impl ServerDateTime {
    /// Wraps a server-local wall-clock value.
    #[must_use]
    pub const fn from_naive(value: NaiveDateTime) -> Self {
        Self(value)
    }

    /// Returns the server-local wall-clock value.
    #[must_use]
    pub const fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Converts a UTC instant to server-local time.
    #[must_use]
    pub fn from_utc(instant: DateTime<Utc>, zones: &TimeZones) -> Self {
        Self(instant.with_timezone(&zones.server()).naive_local())
    }

    /// Interprets a wall-clock value in the caller's zone.
    #[must_use]
    pub fn from_user(local: NaiveDateTime, zones: &TimeZones) -> Self {
        Self::from_utc(resolve(zones.user(), local), zones)
    }

    /// Returns the UTC instant of this timestamp.
    #[must_use]
    pub fn to_utc(&self, zones: &TimeZones) -> DateTime<Utc> {
        resolve(zones.server(), self.0)
    }

    /// Returns this timestamp in the caller's zone.
    #[must_use]
    pub fn to_user(&self, zones: &TimeZones) -> DateTime<Tz> {
        self.to_utc(zones).with_timezone(&zones.user())
    }
}

/// Maps a local wall-clock value to UTC.
///
/// An ambiguous value takes the earlier instant. A value inside a gap is
/// read with the offset in effect just before the gap.
fn resolve(tz: Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t.with_timezone(&Utc),
        LocalResult::None => {
            let before_gap = local - chrono::Duration::days(1);
            let offset = tz.offset_from_utc_datetime(&before_gap);
            let shifted = local - offset.fix();
            Utc.from_utc_datetime(&shifted)
        }
    }
}

impl FromStr for ServerDateTime {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveDateTime::parse_from_str(s, PARSE_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(s, PARSE_FORMAT_SECONDS))
            .map(Self)
    }
}

impl fmt::Display for ServerDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(SERVER_DATE_FORMAT))
    }
}

impl Serialize for ServerDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ServerDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use serde_json::json;

    fn naive(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_milli_opt(h, m, s, ms)
            .unwrap()
    }

    #[test]
    fn test_parse_with_and_without_fraction() {
        let value: ServerDateTime = "2024-03-15 10:20:30.123".parse().unwrap();
        assert_eq!(value.naive(), naive(10, 20, 30, 123));

        let value: ServerDateTime = "2024-03-15 10:20:30".parse().unwrap();
        assert_eq!(value.naive(), naive(10, 20, 30, 0));
    }

    #[test]
    fn test_parse_rejects_other_formats() {
        assert!("2024-03-15T10:20:30Z".parse::<ServerDateTime>().is_err());
        assert!("yesterday".parse::<ServerDateTime>().is_err());
    }

    #[test]
    fn test_display_always_writes_milliseconds() {
        let value = ServerDateTime::from_naive(naive(9, 5, 0, 0));
        assert_eq!(value.to_string(), "2024-03-15 09:05:00.000");
    }

    #[test]
    fn test_serde_uses_wire_string() {
        let value = ServerDateTime::from_naive(naive(10, 0, 0, 500));
        assert_eq!(serde_json::to_value(value).unwrap(), json!("2024-03-15 10:00:00.500"));

        let back: ServerDateTime = serde_json::from_value(json!("2024-03-15 10:00:00.500")).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_moscow_to_utc_and_back() {
        let zones = TimeZones::default();
        let server = ServerDateTime::from_naive(naive(12, 0, 0, 0));

        let utc = server.to_utc(&zones);
        assert_eq!(utc.hour(), 9);

        assert_eq!(ServerDateTime::from_utc(utc, &zones), server);
    }

    #[test]
    fn test_user_zone_conversion() {
        let zones = TimeZones::new(chrono_tz::Asia::Yekaterinburg);
        let server = ServerDateTime::from_naive(naive(12, 0, 0, 0));

        assert_eq!(server.to_user(&zones).hour(), 14);
        assert_eq!(
            ServerDateTime::from_user(naive(14, 0, 0, 0), &zones),
            server
        );
    }

    #[test]
    fn test_gap_uses_offset_from_before_the_gap() {
        let at = |y, mo, d, h, mi| {
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(h, mi, 0)
                .unwrap()
        };

        let berlin = resolve(chrono_tz::Europe::Berlin, at(2024, 3, 31, 2, 30));
        assert_eq!(berlin.naive_utc(), at(2024, 3, 31, 1, 30));

        let new_york = resolve(chrono_tz::America::New_York, at(2024, 3, 10, 2, 30));
        assert_eq!(new_york.naive_utc(), at(2024, 3, 10, 7, 30));
    }
}
