//! Identity traits and `{"id": ...}` references

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identified by a UUID
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Identified by a free-form string
pub trait StringIdentifiable {
    fn string_id(&self) -> String;
}

pub trait Named {
    fn name(&self) -> String;
}

/// Same UUID; pairs with [`crate::slices::contains_with`]
pub fn match_identifiable<T: Identifiable + ?Sized>(a: &T, b: &T) -> bool {
    a.id() == b.id()
}

pub fn match_string_identifiable<T: StringIdentifiable + ?Sized>(a: &T, b: &T) -> bool {
    a.string_id() == b.string_id()
}

pub fn match_named<T: Named + ?Sized>(a: &T, b: &T) -> bool {
    a.name() == b.name()
}

/// A pointer to another object, serialized as `{"id": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,
}

impl Reference {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn from_identifiable<T: Identifiable + ?Sized>(item: &T) -> Self {
        Self::new(item.id().to_string())
    }

    pub fn from_string_identifiable<T: StringIdentifiable + ?Sized>(item: &T) -> Self {
        Self::new(item.string_id())
    }

    pub fn from_display<T: Display + ?Sized>(item: &T) -> Self {
        Self::new(item.to_string())
    }
}
