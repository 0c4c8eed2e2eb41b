//! URLs that travel through JSON as plain strings

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A parsed absolute URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Url(pub ::url::Url);

impl Url {
    pub fn parse(input: &str) -> Result<Self, ::url::ParseError> {
        ::url::Url::parse(input).map(Self)
    }

    #[inline]
    pub fn as_url(&self) -> &::url::Url {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> ::url::Url {
        self.0
    }
}

impl Deref for Url {
    type Target = ::url::Url;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<::url::Url> for Url {
    fn from(value: ::url::Url) -> Self {
        Self(value)
    }
}

impl FromStr for Url {
    type Err = ::url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl Serialize for Url {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for Url {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        Url::parse(&inner).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<Url>` where `""` and `null` both mean absent
///
/// ```rust,ignore
/// #[derive(Serialize, Deserialize)]
/// struct Link {
///     #[serde(default, with = "corekit::codec::url::optional")]
///     href: Option<Url>,
/// }
/// ```
pub mod optional {
    use super::Url;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<Url>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(url) => url.serialize(serializer),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Url>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(inner) if inner.is_empty() => Ok(None),
            Some(inner) => Url::parse(&inner)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
