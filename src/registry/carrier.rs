//! Self-describing types
//!
//! A [`TypeCarrier`] reports the discriminator tag it is registered under.
//! [`AsAny`] is blanket-implemented so decoded trait objects can be
//! downcast back to their concrete type.

use std::any::Any;
use std::fmt::Debug;

/// Helper to allow downcasting from trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A value that carries its own type tag
///
/// The tag is what appears in the discriminator field of a JSON payload
/// (`{"type": "<tag>", ...}`). `Debug` is required so decoded values and
/// `Result`s holding them can be logged and unwrapped in tests.
pub trait TypeCarrier: AsAny + Debug + Send + Sync {
    /// Tells the type of this object
    fn type_tag(&self) -> String;
}

impl dyn TypeCarrier {
    /// Check whether the boxed value is a `T`
    pub fn is<T: TypeCarrier>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrow the value as a `T`
    pub fn downcast_ref<T: TypeCarrier>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the value as a `T`
    pub fn downcast_mut<T: TypeCarrier>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Take ownership of the value as a `T`
    ///
    /// On mismatch the value comes back as a `Box<dyn Any>`, which can be
    /// downcast again.
    pub fn downcast<T: TypeCarrier>(self: Box<Self>) -> Result<Box<T>, Box<dyn Any>> {
        self.into_any().downcast::<T>()
    }
}
