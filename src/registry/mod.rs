//! Polymorphic JSON decoding
//!
//! A registry maps discriminator tags to factories. Given a payload such as
//! `{"type": "dataspec1", "data": "Hello"}`, it reads the tag, picks the
//! registered type, and deserializes the whole payload into a fresh value.
//!
//! ```rust,ignore
//! use corekit::registry::TypeRegistry;
//!
//! let registry = TypeRegistry::new()
//!     .add(DataSpec1::default())
//!     .add(DataSpec2::default());
//!
//! let object = registry.unmarshal_json(payload, &["__type", "type"])?;
//! let spec = object.downcast_ref::<DataSpec1>();
//! ```
//!
//! Registries are populated once and then only read; decoding takes `&self`
//! so a registry can sit behind an `Arc` and be shared across threads.

pub mod carrier;
pub mod error;
pub mod table;

pub use carrier::{AsAny, TypeCarrier};
pub use error::RegistryError;
pub use table::{
    CaseInsensitive, CaseInsensitiveTypeRegistry, CaseSensitive, Registry, TagPolicy,
    TypeRegistry, DEFAULT_TAG,
};
