//! Milliseconds since the Unix epoch, the way JavaScript counts them

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::time::Time;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Build from JS epoch milliseconds; out-of-range values clamp to the epoch
    pub fn from_js_epoch(millis: i64) -> Self {
        Self(DateTime::from_timestamp_millis(millis).unwrap_or_default())
    }

    #[inline]
    pub fn js_epoch(&self) -> i64 {
        self.0.timestamp_millis()
    }

    #[inline]
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl From<Time> for Timestamp {
    fn from(value: Time) -> Self {
        Self(value.0.with_timezone(&Utc))
    }
}

impl From<Timestamp> for Time {
    fn from(value: Timestamp) -> Self {
        Time(value.0.fixed_offset())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.js_epoch())
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.js_epoch())
    }
}

/// Accepts `1700000000000` or `"1700000000000"`
impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

struct TimestampVisitor;

impl TimestampVisitor {
    fn millis<E: de::Error>(millis: i64, unexpected: de::Unexpected) -> Result<Timestamp, E> {
        DateTime::from_timestamp_millis(millis)
            .map(Timestamp)
            .ok_or_else(|| E::invalid_value(unexpected, &TimestampVisitor))
    }
}

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("milliseconds since the Unix epoch")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Self::millis(value, de::Unexpected::Signed(value))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let millis = i64::try_from(value)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))?;
        Self::millis(millis, de::Unexpected::Unsigned(value))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let millis = value
            .trim()
            .parse::<i64>()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))?;
        Self::millis(millis, de::Unexpected::Str(value))
    }
}
