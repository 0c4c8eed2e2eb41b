//! JSON-friendly value types
//!
//! Each type is a thin newtype that accepts the loose forms found in real
//! payloads and writes one canonical form back.

pub mod duration;
pub mod flexint;
pub mod time;
pub mod timestamp;
pub mod url;
pub mod uuid;

pub use self::duration::{parse_duration, Duration, DurationError};
pub use self::flexint::{FlexInt, FlexInt16, FlexInt32, FlexInt64, FlexInt8};
pub use self::time::{parse_time, parse_time_in, Time, TimeParseError};
pub use self::timestamp::Timestamp;
pub use self::url::Url;
pub use self::uuid::{decode_uuid, encode_uuid, Uuid, UuidCodecError, SHORT_UUID_LEN};
