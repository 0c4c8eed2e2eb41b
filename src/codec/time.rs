//! Wall-clock time with day helpers, loose parsing and RFC 3339 JSON

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat,
    TimeZone, Utc,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Unix seconds of 0001-01-01T00:00:00Z, the zero time
const ZERO_UNIX_SECONDS: i64 = -62_135_596_800;

#[derive(Error, Debug)]
pub enum TimeParseError {
    #[error("Invalid time \"{value}\": {source}")]
    Invalid {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Time \"{value}\" does not exist in the requested offset")]
    OutOfRange { value: String },
}

/// A point in time that remembers its UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Time(pub DateTime<FixedOffset>);

impl Time {
    /// Current local time
    pub fn now() -> Self {
        Self(Local::now().fixed_offset())
    }

    /// Current time at the given offset
    pub fn now_in(offset: FixedOffset) -> Self {
        Self(Utc::now().with_timezone(&offset))
    }

    /// Current UTC time
    pub fn now_utc() -> Self {
        Self(Utc::now().fixed_offset())
    }

    /// Build a time from its calendar parts; `None` if they do not form a valid date
    #[allow(clippy::too_many_arguments)]
    pub fn date(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        nanosecond: u32,
        offset: FixedOffset,
    ) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_nano_opt(hour, minute, second, nanosecond))
            .and_then(|naive| at_offset(naive, offset))
    }

    /// 0001-01-01T00:00:00Z
    pub fn zero() -> Self {
        Self(
            DateTime::<Utc>::from_timestamp(ZERO_UNIX_SECONDS, 0)
                .unwrap_or_default()
                .fixed_offset(),
        )
    }

    /// Reports whether this is the zero time instant
    pub fn is_zero(&self) -> bool {
        self.0.timestamp() == ZERO_UNIX_SECONDS && self.0.timestamp_subsec_nanos() == 0
    }

    #[inline]
    pub fn as_datetime(&self) -> DateTime<FixedOffset> {
        self.0
    }

    /// Year, month and day in this time's offset
    pub fn ymd(&self) -> (i32, u32, u32) {
        (self.0.year(), self.0.month(), self.0.day())
    }

    pub fn offset(&self) -> FixedOffset {
        *self.0.offset()
    }

    /// Same instant expressed in UTC
    pub fn to_utc(&self) -> Self {
        Self(self.0.with_timezone(&Utc).fixed_offset())
    }

    /// Midnight of the same day
    pub fn begin_of_day(&self) -> Self {
        self.with_clock(NaiveTime::MIN)
    }

    /// 23:59:59 of the same day
    pub fn end_of_day(&self) -> Self {
        match NaiveTime::from_hms_opt(23, 59, 59) {
            Some(clock) => self.with_clock(clock),
            None => *self,
        }
    }

    /// Shifted 24 hours forward
    pub fn tomorrow(&self) -> Self {
        Self(self.0 + chrono::Duration::hours(24))
    }

    /// Shifted 24 hours back
    pub fn yesterday(&self) -> Self {
        Self(self.0 - chrono::Duration::hours(24))
    }

    pub fn after(&self, other: &Time) -> bool {
        self.0 > other.0
    }

    pub fn before(&self, other: &Time) -> bool {
        self.0 < other.0
    }

    /// Same instant, regardless of offset
    pub fn equal(&self, other: &Time) -> bool {
        self.0 == other.0
    }

    /// Format with a chrono format string (`%Y-%m-%d %H:%M`)
    pub fn format(&self, layout: &str) -> String {
        self.0.format(layout).to_string()
    }

    fn with_clock(&self, clock: NaiveTime) -> Self {
        at_offset(self.0.date_naive().and_time(clock), self.offset()).unwrap_or(*self)
    }
}

fn at_offset(naive: NaiveDateTime, offset: FixedOffset) -> Option<Time> {
    offset.from_local_datetime(&naive).single().map(Time)
}

impl Default for Time {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<DateTime<FixedOffset>> for Time {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self(value)
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.fixed_offset())
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Time {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time(s)
    }
}

/// Parse a time, placing offset-less values in the local offset
pub fn parse_time(value: &str) -> Result<Time, TimeParseError> {
    parse_time_in(value, *Local::now().offset())
}

/// Parse a time, placing offset-less values in `offset`
///
/// Accepts `now`, `today`, `tomorrow`, `yesterday`, a clock only
/// (`T15:04:05`, `T15:04:05Z`, `T15:04:05+02:00`), a date only
/// (`2006-01-02`), or RFC 3339.
pub fn parse_time_in(value: &str, offset: FixedOffset) -> Result<Time, TimeParseError> {
    let trimmed = value.trim();
    let now = Time::now_in(offset);
    match trimmed.to_lowercase().as_str() {
        "now" => return Ok(now),
        "today" => return Ok(now.begin_of_day()),
        "tomorrow" => return Ok(now.begin_of_day().tomorrow()),
        "yesterday" => return Ok(now.begin_of_day().yesterday()),
        _ => {}
    }

    let invalid = |source| TimeParseError::Invalid {
        value: value.to_string(),
        source,
    };
    let out_of_range = || TimeParseError::OutOfRange {
        value: value.to_string(),
    };

    if let Some(clock) = trimmed.strip_prefix('T') {
        // Clock only: the date part is year 0, January 1st
        let day_zero = NaiveDate::from_ymd_opt(0, 1, 1).ok_or_else(out_of_range)?;
        if let Some(utc_clock) = clock.strip_suffix('Z') {
            let clock = NaiveTime::parse_from_str(utc_clock, "%H:%M:%S").map_err(invalid)?;
            return Ok(Time(day_zero.and_time(clock).and_utc().fixed_offset()));
        }
        if clock.contains(['+', '-']) {
            let stamped = format!("0000-01-01T{clock}");
            return DateTime::parse_from_str(&stamped, "%Y-%m-%dT%H:%M:%S%:z")
                .map(Time)
                .map_err(invalid);
        }
        let clock = NaiveTime::parse_from_str(clock, "%H:%M:%S").map_err(invalid)?;
        return at_offset(day_zero.and_time(clock), offset).ok_or_else(out_of_range);
    }

    if !trimmed.contains('T') {
        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(invalid)?;
        return at_offset(date.and_time(NaiveTime::MIN), offset).ok_or_else(out_of_range);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(Time)
        .map_err(invalid)
}

/// Serialized as RFC 3339 in UTC, seconds precision
impl Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(
            &self
                .0
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        )
    }
}

/// RFC 3339; an empty string is the zero time
impl<'de> Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        if inner.is_empty() {
            return Ok(Time::zero());
        }
        DateTime::parse_from_rfc3339(&inner)
            .map(Time)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn plus_two() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    #[test]
    fn zero_time() {
        let zero = Time::zero();
        assert!(zero.is_zero());
        assert_eq!(zero.ymd(), (1, 1, 1));
        assert!(Time::default().is_zero());
        assert!(!Time::now_utc().is_zero());
    }

    #[test]
    fn day_boundaries_keep_the_date() {
        let t = Time::date(2024, 3, 15, 13, 45, 10, 500, plus_two()).unwrap();

        let begin = t.begin_of_day();
        assert_eq!(begin.ymd(), (2024, 3, 15));
        assert_eq!((begin.0.hour(), begin.0.minute(), begin.0.second()), (0, 0, 0));
        assert_eq!(begin.offset(), plus_two());

        let end = t.end_of_day();
        assert_eq!(end.ymd(), (2024, 3, 15));
        assert_eq!((end.0.hour(), end.0.minute(), end.0.second()), (23, 59, 59));
    }

    #[test]
    fn tomorrow_and_yesterday_shift_a_day() {
        let t = Time::date(2024, 2, 28, 12, 0, 0, 0, plus_two()).unwrap();
        assert_eq!(t.tomorrow().ymd(), (2024, 2, 29));
        assert_eq!(t.yesterday().ymd(), (2024, 2, 27));
        assert!(t.tomorrow().after(&t));
        assert!(t.yesterday().before(&t));
    }

    #[test]
    fn equal_ignores_offset() {
        let local = Time::date(2024, 1, 1, 6, 0, 0, 0, plus_two()).unwrap();
        let utc = Time::date(2024, 1, 1, 4, 0, 0, 0, FixedOffset::east_opt(0).unwrap()).unwrap();
        assert!(local.equal(&utc));
        assert!(local.to_utc().equal(&utc));
    }

    #[test]
    fn invalid_calendar_parts() {
        assert!(Time::date(2023, 2, 29, 0, 0, 0, 0, plus_two()).is_none());
    }

    #[test]
    fn parse_keywords() {
        let today = parse_time_in(" Today ", plus_two()).unwrap();
        assert_eq!(today.0.hour(), 0);
        assert_eq!(today.offset(), plus_two());

        let tomorrow = parse_time_in("TOMORROW", plus_two()).unwrap();
        assert_eq!(tomorrow.0 - today.0, chrono::Duration::hours(24));

        let yesterday = parse_time_in("yesterday", plus_two()).unwrap();
        assert_eq!(today.0 - yesterday.0, chrono::Duration::hours(24));

        assert!(parse_time("now").is_ok());
    }

    #[test]
    fn parse_clock_only() {
        let utc = parse_time_in("T15:04:05Z", plus_two()).unwrap();
        assert_eq!(utc.offset().local_minus_utc(), 0);
        assert_eq!((utc.0.hour(), utc.0.minute(), utc.0.second()), (15, 4, 5));
        assert_eq!(utc.ymd(), (0, 1, 1));

        let zoned = parse_time_in("T15:04:05-07:00", plus_two()).unwrap();
        assert_eq!(zoned.offset().local_minus_utc(), -7 * 3600);

        let local = parse_time_in("T15:04:05", plus_two()).unwrap();
        assert_eq!(local.offset(), plus_two());
        assert_eq!(local.0.hour(), 15);
    }

    #[test]
    fn parse_date_only() {
        let t = parse_time_in("2006-01-02", plus_two()).unwrap();
        assert_eq!(t.ymd(), (2006, 1, 2));
        assert_eq!(t.0.hour(), 0);
        assert_eq!(t.offset(), plus_two());
    }

    #[test]
    fn parse_rfc3339() {
        let t: Time = "2006-01-02T15:04:05+07:00".parse().unwrap();
        assert_eq!(t.offset().local_minus_utc(), 7 * 3600);
        assert_eq!(t.format("%Y/%m/%d %H:%M"), "2006/01/02 15:04");
    }

    #[test]
    fn parse_garbage_fails() {
        assert!(matches!(
            parse_time_in("not a time", plus_two()),
            Err(TimeParseError::Invalid { .. })
        ));
        assert!(parse_time_in("T25:00:00", plus_two()).is_err());
        assert!(parse_time_in("2006-13-02", plus_two()).is_err());
    }

    #[test]
    fn json_is_utc_rfc3339() {
        let t = Time::date(2024, 1, 2, 15, 4, 5, 123, plus_two()).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), r#""2024-01-02T13:04:05Z""#);
    }

    #[test]
    fn json_decoding() {
        let t: Time = serde_json::from_str(r#""2024-01-02T15:04:05+02:00""#).unwrap();
        assert_eq!(t.to_utc().0.hour(), 13);

        let zero: Time = serde_json::from_str(r#""""#).unwrap();
        assert!(zero.is_zero());

        assert!(serde_json::from_str::<Time>(r#""2024-01-02""#).is_err());
        assert!(serde_json::from_str::<Time>("12").is_err());
    }
}
