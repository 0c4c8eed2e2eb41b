//! Tag → factory table
//!
//! One generic [`Registry`] backs both variants; the [`TagPolicy`] decides
//! how tags are normalized on insert and lookup.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

use super::carrier::TypeCarrier;
use super::error::RegistryError;

/// Discriminator field used when the caller does not name one
pub const DEFAULT_TAG: &str = "type";

/// Key normalization applied to tags
pub trait TagPolicy {
    fn normalize(tag: &str) -> Cow<'_, str>;
}

/// Tags compared byte for byte
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseSensitive;

/// Tags lowercased before insert and lookup
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitive;

impl TagPolicy for CaseSensitive {
    #[inline]
    fn normalize(tag: &str) -> Cow<'_, str> {
        Cow::Borrowed(tag)
    }
}

impl TagPolicy for CaseInsensitive {
    #[inline]
    fn normalize(tag: &str) -> Cow<'_, str> {
        // Titlecase letters (`ǅ`) lowercase too but are not `is_uppercase`
        let lower = tag.to_lowercase();
        if lower == tag {
            Cow::Borrowed(tag)
        } else {
            Cow::Owned(lower)
        }
    }
}

type Factory<D> = Arc<dyn Fn(&[u8]) -> Result<Box<D>, serde_json::Error> + Send + Sync>;

struct Entry<D: ?Sized> {
    type_name: &'static str,
    factory: Factory<D>,
}

impl<D: ?Sized> Clone for Entry<D> {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name,
            factory: Arc::clone(&self.factory),
        }
    }
}

/// Polymorphic JSON registry
///
/// `D` is what decoding hands back: `dyn TypeCarrier` by default, or any
/// capability trait object the registered types can be boxed into.
pub struct Registry<P, D: ?Sized = dyn TypeCarrier> {
    types: HashMap<String, Entry<D>>,
    _policy: PhantomData<P>,
}

/// Case-sensitive registry
pub type TypeRegistry<D = dyn TypeCarrier> = Registry<CaseSensitive, D>;

/// Case-insensitive registry ("something" and "Something" are the same tag)
pub type CaseInsensitiveTypeRegistry<D = dyn TypeCarrier> = Registry<CaseInsensitive, D>;

impl<P, D: ?Sized> Default for Registry<P, D> {
    fn default() -> Self {
        Self {
            types: HashMap::new(),
            _policy: PhantomData,
        }
    }
}

impl<P, D: ?Sized> Clone for Registry<P, D> {
    fn clone(&self) -> Self {
        Self {
            types: self.types.clone(),
            _policy: PhantomData,
        }
    }
}

impl<P, D: ?Sized> fmt::Debug for Registry<P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (tag, entry) in &self.types {
            map.entry(tag, &entry.type_name);
        }
        map.finish()
    }
}

impl<P: TagPolicy> Registry<P, dyn TypeCarrier> {
    /// Create an empty registry that decodes into `Box<dyn TypeCarrier>`
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type through one of its values
    ///
    /// The prototype only provides the tag; every decode builds a fresh value.
    pub fn add<T>(self, prototype: T) -> Self
    where
        T: TypeCarrier + DeserializeOwned,
    {
        self.add_with(prototype, |value: T| -> Box<dyn TypeCarrier> { Box::new(value) })
    }

    /// Register a type through its `Default` value
    pub fn register<T>(self) -> Self
    where
        T: TypeCarrier + DeserializeOwned + Default,
    {
        self.add(T::default())
    }

    /// Non-chaining form of [`Registry::add`]
    pub fn insert<T>(&mut self, prototype: T) -> &mut Self
    where
        T: TypeCarrier + DeserializeOwned,
    {
        self.insert_with(prototype, |value: T| -> Box<dyn TypeCarrier> { Box::new(value) })
    }
}

impl<P: TagPolicy, D: ?Sized + 'static> Registry<P, D> {
    /// Register a type, boxing decoded values with `upcast`
    ///
    /// A tag registered twice keeps the last registration.
    pub fn add_with<T, F>(mut self, prototype: T, upcast: F) -> Self
    where
        T: TypeCarrier + DeserializeOwned,
        F: Fn(T) -> Box<D> + Send + Sync + 'static,
    {
        self.insert_with(prototype, upcast);
        self
    }

    /// Non-chaining form of [`Registry::add_with`]
    pub fn insert_with<T, F>(&mut self, prototype: T, upcast: F) -> &mut Self
    where
        T: TypeCarrier + DeserializeOwned,
        F: Fn(T) -> Box<D> + Send + Sync + 'static,
    {
        let tag = P::normalize(&prototype.type_tag()).into_owned();
        let type_name = std::any::type_name::<T>();
        let factory: Factory<D> =
            Arc::new(move |payload: &[u8]| serde_json::from_slice::<T>(payload).map(&upcast));

        let entry = Entry { type_name, factory };
        if let Some(previous) = self.types.insert(tag.clone(), entry) {
            tracing::debug!(
                tag = %tag,
                previous = previous.type_name,
                current = type_name,
                "Type tag re-registered, last registration wins"
            );
        } else {
            tracing::trace!(tag = %tag, type_name, "Type registered");
        }
        self
    }

    /// Decode a payload into the type named by its discriminator field
    ///
    /// `tag_names` are tried in order and the first one present wins;
    /// an empty slice means `"type"`.
    pub fn unmarshal_json(
        &self,
        payload: &[u8],
        tag_names: &[&str],
    ) -> Result<Box<D>, RegistryError> {
        let tag_names: &[&str] = if tag_names.is_empty() {
            &[DEFAULT_TAG]
        } else {
            tag_names
        };

        let fields: HashMap<String, Box<RawValue>> =
            serde_json::from_slice(payload).map_err(RegistryError::Parse)?;

        let tag = tag_names
            .iter()
            .find_map(|name| {
                fields
                    .get(*name)
                    .map(|raw| discriminator_text(raw))
                    .filter(|tag| !tag.is_empty())
            })
            .ok_or_else(|| RegistryError::MissingDiscriminator {
                tags: tag_names.iter().map(|name| name.to_string()).collect(),
            })?;

        let entry = self
            .types
            .get(P::normalize(&tag).as_ref())
            .ok_or_else(|| RegistryError::UnsupportedType { tag: tag.clone() })?;

        let value = (entry.factory)(payload).map_err(|source| RegistryError::Decode {
            tag: tag.clone(),
            source,
        })?;

        tracing::debug!(tag = %tag, type_name = entry.type_name, "Decoded polymorphic payload");
        Ok(value)
    }

    /// [`Registry::unmarshal_json`] with the default `"type"` field
    #[inline]
    pub fn unmarshal_json_default(&self, payload: &[u8]) -> Result<Box<D>, RegistryError> {
        self.unmarshal_json(payload, &[])
    }

    /// Check whether a tag is registered (under this registry's case policy)
    pub fn contains(&self, tag: &str) -> bool {
        self.types.contains_key(P::normalize(tag).as_ref())
    }

    /// Number of registered tags
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<D: ?Sized> Registry<CaseInsensitive, D> {
    /// Registered tags (lowercase), sorted ascending
    pub fn supported_types(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.types.keys().cloned().collect();
        tags.sort();
        tags
    }
}

/// Discriminator value as text: JSON strings are unescaped, anything
/// else keeps its raw form minus surrounding quotes.
fn discriminator_text(raw: &RawValue) -> String {
    serde_json::from_str::<String>(raw.get())
        .unwrap_or_else(|_| raw.get().trim_matches('"').to_string())
}
