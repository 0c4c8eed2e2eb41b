//! Corekit - polymorphic JSON decoding and everyday service helpers
//!
//! The centre of the crate is [`registry`]: a table from type tags to
//! factories that turns `{"type": "...", ...}` payloads into concrete types
//! behind a trait object. Around it sit small utilities:
//!
//! - `codec`: JSON-friendly integers, durations, times, timestamps, URLs and UUIDs
//! - `slices` / `strings`: generic collection and text helpers
//! - `env`: typed environment lookups with fallbacks
//! - `multierror`: error aggregation
//! - `resilience`: backoff delays and a periodic job runner
//! - `identity` / `decorate`: IDs, references and self links

pub mod codec;
pub mod decorate;
pub mod env;
pub mod error;
pub mod identity;
pub mod multierror;
pub mod registry;
pub mod resilience;
pub mod slices;
pub mod strings;

pub use codec::{Duration, FlexInt, Time, Timestamp, Url};
pub use decorate::{decorate, DecoratedResource, Resource};
pub use error::{CoreError, FixSuggestion, Result};
pub use identity::{Identifiable, Named, Reference, StringIdentifiable};
pub use multierror::MultiError;
pub use registry::{
    CaseInsensitiveTypeRegistry, RegistryError, TypeCarrier, TypeRegistry, DEFAULT_TAG,
};
