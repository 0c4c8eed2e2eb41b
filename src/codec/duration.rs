//! Durations that travel as JSON milliseconds or text
//!
//! Text is either ISO 8601 (`P1Y2M3W4DT5H6M7.5S`, 365-day years, 30-day
//! months, no calendar arithmetic) or compact units (`1h30m`, `1.5s`, `300ms`).

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const NANOS_PER_SECOND: u128 = 1_000_000_000;
const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
const DAYS_PER_YEAR: u64 = 365;
const DAYS_PER_MONTH: u64 = 30;
const DAYS_PER_WEEK: u64 = 7;

/// ISO 8601 duration grammar (weeks accepted on input only)
static ISO8601: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^P(?:(?P<years>\d+)Y)?(?:(?P<months>\d+)M)?(?:(?P<weeks>\d+)W)?(?:(?P<days>\d+)D)?(?:T(?:(?P<hours>\d+)H)?(?:(?P<minutes>\d+)M)?(?:(?P<seconds>\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("ISO 8601 duration regex is valid")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("Empty duration")]
    Empty,

    #[error("\"{value}\" is not an ISO8601 duration")]
    NotIso8601 { value: String },

    #[error("Invalid duration \"{value}\"")]
    Invalid { value: String },

    #[error("Missing unit in duration \"{value}\"")]
    MissingUnit { value: String },

    #[error("Unknown unit \"{unit}\" in duration \"{value}\"")]
    UnknownUnit { unit: String, value: String },

    #[error("Negative duration \"{value}\" is not supported")]
    Negative { value: String },

    #[error("Duration \"{value}\" is out of range")]
    Overflow { value: String },
}

/// A `std::time::Duration` with ISO 8601 and JSON support
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(pub StdDuration);

impl Duration {
    pub const ZERO: Duration = Duration(StdDuration::ZERO);

    pub fn from_millis(millis: u64) -> Self {
        Self(StdDuration::from_millis(millis))
    }

    pub fn from_secs(secs: u64) -> Self {
        Self(StdDuration::from_secs(secs))
    }

    /// Converts into a `std::time::Duration`
    #[inline]
    pub fn as_duration(&self) -> StdDuration {
        self.0
    }

    /// Whole milliseconds, saturating at `u64::MAX`
    pub fn as_millis(&self) -> u64 {
        u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
    }

    /// ISO 8601-1 rendering (no weeks)
    ///
    /// Days past whole years are split into 30-day months; a zero duration
    /// renders as `P`.
    pub fn to_iso8601(&self) -> String {
        let total_seconds = self.0.as_secs();
        let milliseconds = self.0.subsec_millis();
        let seconds = total_seconds % SECONDS_PER_MINUTE;
        let minutes = (total_seconds / SECONDS_PER_MINUTE) % 60;
        let hours = (total_seconds / SECONDS_PER_HOUR) % 24;
        let total_days = total_seconds / SECONDS_PER_DAY;
        let years = total_days / DAYS_PER_YEAR;
        let months = (total_days % DAYS_PER_YEAR) / DAYS_PER_MONTH;
        let days = (total_days % DAYS_PER_YEAR) % DAYS_PER_MONTH;

        let mut buffer = String::from("P");
        if years > 0 {
            buffer.push_str(&format!("{years}Y"));
        }
        if months > 0 {
            buffer.push_str(&format!("{months}M"));
        }
        if days > 0 {
            buffer.push_str(&format!("{days}D"));
        }
        if hours > 0 || minutes > 0 || seconds > 0 || milliseconds > 0 {
            buffer.push('T');
        }
        if hours > 0 {
            buffer.push_str(&format!("{hours}H"));
        }
        if minutes > 0 {
            buffer.push_str(&format!("{minutes}M"));
        }
        if milliseconds > 0 {
            buffer.push_str(&format!("{seconds}.{milliseconds:03}S"));
        } else if seconds > 0 {
            buffer.push_str(&format!("{seconds}S"));
        }
        buffer
    }
}

impl From<StdDuration> for Duration {
    fn from(duration: StdDuration) -> Self {
        Self(duration)
    }
}

impl From<Duration> for StdDuration {
    fn from(duration: Duration) -> Self {
        duration.0
    }
}

impl FromStr for Duration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duration(s).map(Duration)
    }
}

/// Compact unit rendering: `1h30m0s`, `1.5s`, `300ms`, `0s`
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.0.as_nanos();
        if nanos == 0 {
            return f.write_str("0s");
        }
        if nanos < 1_000 {
            return write!(f, "{nanos}ns");
        }
        if nanos < 1_000_000 {
            return f.write_str(&with_fraction(nanos, 1_000, "µs"));
        }
        if nanos < NANOS_PER_SECOND {
            return f.write_str(&with_fraction(nanos, 1_000_000, "ms"));
        }

        let total_seconds = self.0.as_secs();
        let hours = total_seconds / SECONDS_PER_HOUR;
        let minutes = (total_seconds / SECONDS_PER_MINUTE) % 60;
        let seconds = u128::from(total_seconds % SECONDS_PER_MINUTE) * NANOS_PER_SECOND
            + u128::from(self.0.subsec_nanos());

        if hours > 0 {
            write!(f, "{hours}h")?;
        }
        if hours > 0 || minutes > 0 {
            write!(f, "{minutes}m")?;
        }
        f.write_str(&with_fraction(seconds, NANOS_PER_SECOND, "s"))
    }
}

/// `value / unit` with trailing zeros trimmed from the fraction
fn with_fraction(value: u128, unit: u128, suffix: &str) -> String {
    let whole = value / unit;
    let remainder = value % unit;
    if remainder == 0 {
        return format!("{whole}{suffix}");
    }
    let width = unit.to_string().len() - 1;
    let fraction = format!("{remainder:0width$}");
    format!("{whole}.{}{suffix}", fraction.trim_end_matches('0'))
}

/// Parse an ISO 8601 duration, or compact units when the text has no `P` prefix
pub fn parse_duration(value: &str) -> Result<StdDuration, DurationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DurationError::Empty);
    }
    if trimmed.starts_with('P') {
        parse_iso8601(trimmed)
    } else {
        parse_compact(trimmed)
    }
}

fn parse_iso8601(value: &str) -> Result<StdDuration, DurationError> {
    let not_iso = || DurationError::NotIso8601 {
        value: value.to_string(),
    };
    let overflow = || DurationError::Overflow {
        value: value.to_string(),
    };

    let captures = ISO8601.captures(value).ok_or_else(not_iso)?;
    if captures.iter().skip(1).all(|group| group.is_none()) {
        return Err(not_iso());
    }

    let component = |name: &str, seconds_per_unit: u64| -> Result<u64, DurationError> {
        match captures.name(name) {
            Some(m) => m
                .as_str()
                .parse::<u64>()
                .ok()
                .and_then(|count| count.checked_mul(seconds_per_unit))
                .ok_or_else(overflow),
            None => Ok(0),
        }
    };

    let whole_seconds = [
        component("years", DAYS_PER_YEAR * SECONDS_PER_DAY)?,
        component("months", DAYS_PER_MONTH * SECONDS_PER_DAY)?,
        component("weeks", DAYS_PER_WEEK * SECONDS_PER_DAY)?,
        component("days", SECONDS_PER_DAY)?,
        component("hours", SECONDS_PER_HOUR)?,
        component("minutes", SECONDS_PER_MINUTE)?,
    ]
    .into_iter()
    .try_fold(0u64, |total, part| total.checked_add(part))
    .ok_or_else(overflow)?;

    let mut total = u128::from(whole_seconds) * NANOS_PER_SECOND;
    if let Some(m) = captures.name("seconds") {
        let (whole, fraction) = m.as_str().split_once('.').unwrap_or((m.as_str(), ""));
        let seconds = scaled_nanos(whole, fraction, NANOS_PER_SECOND).ok_or_else(overflow)?;
        total = total.checked_add(seconds).ok_or_else(overflow)?;
    }
    nanos_to_duration(total).ok_or_else(overflow)
}

/// `whole.fraction` units of `scale` nanoseconds, exact to the nanosecond
fn scaled_nanos(whole: &str, fraction: &str, scale: u128) -> Option<u128> {
    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(scale)?;
    let fraction = &fraction[..fraction.len().min(18)];
    if !fraction.is_empty() {
        let digits: u128 = fraction.parse().ok()?;
        nanos = nanos.checked_add(digits * scale / 10u128.pow(fraction.len() as u32))?;
    }
    Some(nanos)
}

fn nanos_to_duration(nanos: u128) -> Option<StdDuration> {
    let seconds = u64::try_from(nanos / NANOS_PER_SECOND).ok()?;
    Some(StdDuration::new(seconds, (nanos % NANOS_PER_SECOND) as u32))
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(60 * NANOS_PER_SECOND),
        "h" => Some(3_600 * NANOS_PER_SECOND),
        _ => None,
    }
}

/// Sequence of `<number><unit>` pairs, e.g. `1h30m` or `1.5s`
fn parse_compact(value: &str) -> Result<StdDuration, DurationError> {
    let invalid = || DurationError::Invalid {
        value: value.to_string(),
    };
    let overflow = || DurationError::Overflow {
        value: value.to_string(),
    };

    let mut rest = value;
    if let Some(unsigned) = rest.strip_prefix('+') {
        rest = unsigned;
    } else if rest.starts_with('-') {
        return Err(DurationError::Negative {
            value: value.to_string(),
        });
    }
    if rest == "0" {
        return Ok(StdDuration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let not_digit = |c: char| !c.is_ascii_digit();
    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after_whole) = rest.split_at(rest.find(not_digit).unwrap_or(rest.len()));
        let (fraction, after_number) = match after_whole.strip_prefix('.') {
            Some(after_dot) => {
                after_dot.split_at(after_dot.find(not_digit).unwrap_or(after_dot.len()))
            }
            None => ("", after_whole),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }

        let unit_end = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let (unit, remaining) = after_number.split_at(unit_end);
        if unit.is_empty() {
            return Err(DurationError::MissingUnit {
                value: value.to_string(),
            });
        }
        let scale = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            value: value.to_string(),
        })?;

        let nanos = scaled_nanos(whole, fraction, scale).ok_or_else(overflow)?;
        total = total.checked_add(nanos).ok_or_else(overflow)?;
        rest = remaining;
    }

    nanos_to_duration(total).ok_or_else(overflow)
}

/// Serialized as whole milliseconds
impl Serialize for Duration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.as_millis())
    }
}

/// Numbers are milliseconds; strings are parsed with [`parse_duration`]
impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DurationVisitor)
    }
}

struct DurationVisitor;

impl<'de> Visitor<'de> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("Invalid Duration: expected milliseconds or a duration string")
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Duration::from_millis(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u64::try_from(value)
            .map(Duration::from_millis)
            .map_err(|_| de::Error::custom(format!("Negative duration {value}ms is not supported")))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let nanos = (value * 1_000_000.0).round();
        if !nanos.is_finite() || nanos < 0.0 || nanos > u64::MAX as f64 {
            return Err(de::Error::custom(format!("Invalid Duration {value}ms")));
        }
        Ok(Duration(StdDuration::from_nanos(nanos as u64)))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        parse_duration(value)
            .map(Duration)
            .map_err(|e| de::Error::custom(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(hours: u64, minutes: u64, seconds: u64) -> StdDuration {
        StdDuration::from_secs(hours * 3600 + minutes * 60 + seconds)
    }

    #[test]
    fn iso8601_rendering() {
        assert_eq!(Duration(hms(1, 30, 0)).to_iso8601(), "PT1H30M");
        assert_eq!(Duration(hms(51, 0, 0)).to_iso8601(), "P2DT3H");
        assert_eq!(Duration::from_millis(1500).to_iso8601(), "PT1.500S");
        assert_eq!(Duration::from_millis(250).to_iso8601(), "PT0.250S");
        assert_eq!(Duration::from_secs(45 * 86_400).to_iso8601(), "P1M15D");
        assert_eq!(Duration::from_secs(400 * 86_400).to_iso8601(), "P1Y1M5D");
        assert_eq!(Duration::ZERO.to_iso8601(), "P");
    }

    #[test]
    fn parse_iso8601_components() {
        assert_eq!(parse_duration("PT1H30M").unwrap(), hms(1, 30, 0));
        assert_eq!(parse_duration("P1D").unwrap(), hms(24, 0, 0));
        assert_eq!(parse_duration("P1W").unwrap(), hms(7 * 24, 0, 0));
        assert_eq!(parse_duration("P1M").unwrap(), hms(30 * 24, 0, 0));
        assert_eq!(parse_duration("P1Y").unwrap(), hms(365 * 24, 0, 0));
        assert_eq!(
            parse_duration("PT2.5S").unwrap(),
            StdDuration::from_millis(2_500)
        );
        assert_eq!(
            parse_duration("P1DT1H1M1S").unwrap(),
            hms(25, 1, 1)
        );
    }

    #[test]
    fn iso8601_round_trips_through_rendering() {
        let original = Duration(hms(26, 3, 4) + StdDuration::from_millis(5));
        let parsed = parse_duration(&original.to_iso8601()).unwrap();
        assert_eq!(parsed, original.0);
    }

    #[test]
    fn bare_p_is_rejected() {
        assert_eq!(
            parse_duration("P").unwrap_err(),
            DurationError::NotIso8601 {
                value: "P".to_string()
            }
        );
        assert!(parse_duration("PT").is_err());
        assert!(parse_duration("P1X").is_err());
    }

    #[test]
    fn parse_compact_units() {
        assert_eq!(parse_duration("1h30m").unwrap(), hms(1, 30, 0));
        assert_eq!(parse_duration("1.5s").unwrap(), StdDuration::from_millis(1_500));
        assert_eq!(parse_duration("300ms").unwrap(), StdDuration::from_millis(300));
        assert_eq!(parse_duration("10us").unwrap(), StdDuration::from_micros(10));
        assert_eq!(parse_duration("10µs").unwrap(), StdDuration::from_micros(10));
        assert_eq!(parse_duration("42ns").unwrap(), StdDuration::from_nanos(42));
        assert_eq!(parse_duration("+2m").unwrap(), hms(0, 2, 0));
        assert_eq!(parse_duration("0").unwrap(), StdDuration::ZERO);
        assert_eq!(parse_duration(".5h").unwrap(), hms(0, 30, 0));
    }

    #[test]
    fn parse_compact_errors() {
        assert_eq!(parse_duration("").unwrap_err(), DurationError::Empty);
        assert!(matches!(
            parse_duration("-1h").unwrap_err(),
            DurationError::Negative { .. }
        ));
        assert!(matches!(
            parse_duration("12").unwrap_err(),
            DurationError::MissingUnit { .. }
        ));
        assert!(matches!(
            parse_duration("3d").unwrap_err(),
            DurationError::UnknownUnit { ref unit, .. } if unit == "d"
        ));
        assert!(matches!(
            parse_duration("h").unwrap_err(),
            DurationError::Invalid { .. }
        ));
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(Duration::ZERO.to_string(), "0s");
        assert_eq!(Duration(hms(1, 30, 0)).to_string(), "1h30m0s");
        assert_eq!(Duration::from_millis(1_500).to_string(), "1.5s");
        assert_eq!(Duration::from_millis(300).to_string(), "300ms");
        assert_eq!(Duration(StdDuration::from_micros(1_500)).to_string(), "1.5ms");
        assert_eq!(Duration(StdDuration::from_nanos(7)).to_string(), "7ns");
        assert_eq!(Duration(hms(0, 2, 3)).to_string(), "2m3s");
    }

    #[test]
    fn display_parses_back() {
        for duration in [hms(3, 0, 7), StdDuration::from_millis(1_250), StdDuration::from_nanos(990)] {
            let text = Duration(duration).to_string();
            assert_eq!(parse_duration(&text).unwrap(), duration, "{text}");
        }
    }

    #[test]
    fn json_is_milliseconds() {
        let json = serde_json::to_string(&Duration::from_secs(2)).unwrap();
        assert_eq!(json, "2000");
    }

    #[test]
    fn json_accepts_numbers_and_strings() {
        let from_int: Duration = serde_json::from_str("1500").unwrap();
        assert_eq!(from_int, Duration::from_millis(1_500));

        let from_float: Duration = serde_json::from_str("2.5").unwrap();
        assert_eq!(from_float.0, StdDuration::from_micros(2_500));

        let from_iso: Duration = serde_json::from_str(r#""PT1M""#).unwrap();
        assert_eq!(from_iso, Duration::from_secs(60));

        let from_units: Duration = serde_json::from_str(r#""2h""#).unwrap();
        assert_eq!(from_units, Duration::from_secs(7_200));
    }

    #[test]
    fn json_rejects_other_types() {
        let err = serde_json::from_str::<Duration>("true").unwrap_err();
        assert!(err.to_string().contains("Invalid Duration"));

        assert!(serde_json::from_str::<Duration>("-5").is_err());
        assert!(serde_json::from_str::<Duration>(r#""soon""#).is_err());
    }
}
