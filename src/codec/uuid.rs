//! UUID helpers: a 22-character short form and a nil-as-empty JSON wrapper
//!
//! The short form splits the 128 bits into two big-endian `u64` halves and
//! writes each as 11 digits of a URL-safe base-64 alphabet.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
const GROUP_LEN: usize = 11;
pub const SHORT_UUID_LEN: usize = GROUP_LEN * 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UuidCodecError {
    #[error("Short UUID must be {SHORT_UUID_LEN} characters, got {length}")]
    InvalidLength { length: usize },

    #[error("Invalid character '{character}' at position {position} in short UUID")]
    InvalidCharacter { character: char, position: usize },
}

/// Encode a UUID in 22 characters
pub fn encode_uuid(id: &::uuid::Uuid) -> String {
    let (high, low) = id.as_u64_pair();
    let mut encoded = String::with_capacity(SHORT_UUID_LEN);
    encode_group(high, &mut encoded);
    encode_group(low, &mut encoded);
    encoded
}

/// Decode a UUID written by [`encode_uuid`]
pub fn decode_uuid(encoded: &str) -> Result<::uuid::Uuid, UuidCodecError> {
    let length = encoded.chars().count();
    if length != SHORT_UUID_LEN {
        return Err(UuidCodecError::InvalidLength { length });
    }
    let mut halves = [0u64; 2];
    for (position, character) in encoded.chars().enumerate() {
        let index = ALPHABET
            .iter()
            .position(|&b| b as char == character)
            .ok_or(UuidCodecError::InvalidCharacter {
                character,
                position,
            })?;
        let half = &mut halves[position / GROUP_LEN];
        // The leading digit carries 2 spare bits; they shift out
        *half = (*half << 6) | index as u64;
    }
    Ok(::uuid::Uuid::from_u64_pair(halves[0], halves[1]))
}

fn encode_group(mut number: u64, out: &mut String) {
    let mut digits = [0u8; GROUP_LEN];
    for digit in digits.iter_mut().rev() {
        *digit = ALPHABET[(number & 0x3f) as usize];
        number >>= 6;
    }
    out.extend(digits.iter().map(|&b| b as char));
}

/// A UUID whose nil value travels as `""` in JSON
///
/// `""`, `null` and a missing field (with `#[serde(default)]`) all decode to nil.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uuid(pub ::uuid::Uuid);

impl Uuid {
    pub fn new_v4() -> Self {
        Self(::uuid::Uuid::new_v4())
    }

    pub fn nil() -> Self {
        Self(::uuid::Uuid::nil())
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// The 22-character short form
    pub fn encode(&self) -> String {
        encode_uuid(&self.0)
    }
}

impl Deref for Uuid {
    type Target = ::uuid::Uuid;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<::uuid::Uuid> for Uuid {
    fn from(value: ::uuid::Uuid) -> Self {
        Self(value)
    }
}

impl From<Uuid> for ::uuid::Uuid {
    fn from(value: Uuid) -> Self {
        value.0
    }
}

/// Hyphenated form, empty when nil
impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            return Ok(());
        }
        self.0.hyphenated().fmt(f)
    }
}

impl Serialize for Uuid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Uuid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Uuid::nil()),
            Some(inner) if inner.is_empty() => Ok(Uuid::nil()),
            Some(inner) => ::uuid::Uuid::parse_str(&inner)
                .map(Uuid)
                .map_err(serde::de::Error::custom),
        }
    }
}
