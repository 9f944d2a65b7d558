//! Identity-only mirror of the store hierarchy.
//!
//! A [`ModelId`] derives the same dotted ids as stores built from the same
//! lenses, without holding a value or a stream. Use it wherever a stable
//! address into the model is needed, such as validation message keys or
//! form field names.

use std::fmt;
use std::marker::PhantomData;

use crate::lens::{join_ids, Lens};

/// Address of a part of type `T` within a model.
pub trait ModelId<T> {
    fn id(&self) -> &str;

    /// Address of the part selected by `lens`.
    fn sub<X>(&self, lens: &Lens<T, X>) -> ModelIdSub<T, X> {
        ModelIdSub {
            id: join_ids(self.id(), lens.id()),
            _marker: PhantomData,
        }
    }
}

/// Starting point of a model id hierarchy, mirroring a root store.
pub struct ModelIdRoot<T> {
    id: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ModelIdRoot<T> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            _marker: PhantomData,
        }
    }
}

impl<T> Default for ModelIdRoot<T> {
    fn default() -> Self {
        Self::new("")
    }
}

impl<T> ModelId<T> for ModelIdRoot<T> {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Address derived from a parent id and a lens, mirroring a sub-store.
pub struct ModelIdSub<P, T> {
    id: String,
    _marker: PhantomData<fn(P) -> T>,
}

impl<P, T> ModelId<T> for ModelIdSub<P, T> {
    fn id(&self) -> &str {
        &self.id
    }
}

impl<T> fmt::Debug for ModelIdRoot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelIdRoot").field(&self.id).finish()
    }
}

impl<P, T> fmt::Debug for ModelIdSub<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelIdSub").field(&self.id).finish()
    }
}
