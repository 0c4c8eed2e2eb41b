//! Integers that accept `1234` or `"1234"` in JSON
//!
//! Out-of-range values are rejected rather than truncated.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An integer decoded from a JSON number or a numeric string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlexInt<T = i64>(pub T);

pub type FlexInt8 = FlexInt<i8>;
pub type FlexInt16 = FlexInt<i16>;
pub type FlexInt32 = FlexInt<i32>;
pub type FlexInt64 = FlexInt<i64>;

impl<T> FlexInt<T> {
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for FlexInt<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> From<T> for FlexInt<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T: fmt::Display> fmt::Display for FlexInt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Always serialized as a number
impl<T: Serialize> Serialize for FlexInt<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for FlexInt<T>
where
    T: TryFrom<i64> + TryFrom<u64> + FromStr,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FlexIntVisitor(PhantomData))
    }
}

struct FlexIntVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for FlexIntVisitor<T>
where
    T: TryFrom<i64> + TryFrom<u64> + FromStr,
{
    type Value = FlexInt<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "an integer or a numeric string fitting in {}",
            std::any::type_name::<T>()
        )
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        <T as TryFrom<i64>>::try_from(value)
            .map(FlexInt)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        <T as TryFrom<u64>>::try_from(value)
            .map(FlexInt)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let unquoted = value.replace('"', "");
        unquoted
            .trim()
            .parse::<T>()
            .map(FlexInt)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Counters {
        wide: FlexInt,
        small: FlexInt8,
        medium: FlexInt32,
    }

    #[test]
    fn accepts_numbers_and_strings() {
        let counters: Counters =
            serde_json::from_str(r#"{"wide": "1234", "small": -12, "medium": " 42 "}"#).unwrap();

        assert_eq!(*counters.wide, 1234);
        assert_eq!(counters.small.into_inner(), -12);
        assert_eq!(counters.medium, FlexInt(42));
    }

    #[test]
    fn serializes_as_a_number() {
        assert_eq!(serde_json::to_string(&FlexInt16::from(-7)).unwrap(), "-7");
        assert_eq!(serde_json::to_string(&FlexInt64::from(1 << 40)).unwrap(), "1099511627776");
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!(serde_json::from_str::<FlexInt8>("300").is_err());
        assert!(serde_json::from_str::<FlexInt8>(r#""300""#).is_err());
        assert!(serde_json::from_str::<FlexInt16>("-40000").is_err());
    }

    #[test]
    fn non_numeric_is_rejected() {
        assert!(serde_json::from_str::<FlexInt>(r#""12a""#).is_err());
        assert!(serde_json::from_str::<FlexInt>("12.5").is_err());
        assert!(serde_json::from_str::<FlexInt>("null").is_err());
    }
}
