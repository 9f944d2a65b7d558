//! Composable lenses.
//!
//! A [`Lens`] describes how to read a part `T` out of a parent value `P` and
//! how to produce a new parent with that part replaced. Lenses carry an id,
//! which stores use to build dotted paths (`"person.address.street"`).
//!
//! ```text
//! Lens<P, T> + Lens<T, U>  =  Lens<P, U>
//! ```
//!
//! Lenses are expected to obey the usual laws:
//! - `get(set(p, x)) == x`
//! - `set(p, get(p)) == p`
//!
//! These are not checked at runtime. A lens that breaks them will make
//! sub-stores behave inconsistently.

mod collection;
mod nullable;

use std::fmt;
use std::ops::Add;
use std::sync::Arc;

use crate::error::LensError;

type Getter<P, T> = dyn Fn(&P) -> Result<T, LensError> + Send + Sync;
type Setter<P, T> = dyn Fn(P, T) -> Result<P, LensError> + Send + Sync;

/// Paired read/write accessor focusing a part `T` of a parent `P`.
///
/// Cloning a lens is cheap; the accessors are shared.
pub struct Lens<P, T> {
    id: Arc<str>,
    getter: Arc<Getter<P, T>>,
    setter: Arc<Setter<P, T>>,
}

impl<P, T> Clone for Lens<P, T> {
    fn clone(&self) -> Self {
        Self {
            id: Arc::clone(&self.id),
            getter: Arc::clone(&self.getter),
            setter: Arc::clone(&self.setter),
        }
    }
}

impl<P, T> fmt::Debug for Lens<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lens").field("id", &self.id).finish()
    }
}

impl<P, T> Lens<P, T> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get(&self, parent: &P) -> Result<T, LensError> {
        (self.getter)(parent)
    }

    pub fn set(&self, parent: P, value: T) -> Result<P, LensError> {
        (self.setter)(parent, value)
    }
}

impl<P: 'static, T: 'static> Lens<P, T> {
    /// Build a lens from infallible accessors.
    pub fn new<G, S>(id: impl Into<String>, get: G, set: S) -> Self
    where
        G: Fn(&P) -> T + Send + Sync + 'static,
        S: Fn(P, T) -> P + Send + Sync + 'static,
    {
        Self::try_new(id, move |p| Ok(get(p)), move |p, t| Ok(set(p, t)))
    }

    /// Build a lens whose accessors may fail to find their focus.
    pub fn try_new<G, S>(id: impl Into<String>, get: G, set: S) -> Self
    where
        G: Fn(&P) -> Result<T, LensError> + Send + Sync + 'static,
        S: Fn(P, T) -> Result<P, LensError> + Send + Sync + 'static,
    {
        Self {
            id: Arc::from(id.into()),
            getter: Arc::new(get),
            setter: Arc::new(set),
        }
    }

    /// Run `update` on the focused part and write the result back.
    pub fn apply<F>(&self, parent: P, update: F) -> anyhow::Result<P>
    where
        F: FnOnce(T) -> anyhow::Result<T>,
    {
        let focus = self.get(&parent)?;
        let next = update(focus)?;
        Ok(self.set(parent, next)?)
    }

    /// Focus further into the part this lens points at.
    pub fn compose<U: 'static>(&self, next: Lens<T, U>) -> Lens<P, U> {
        let (get_outer, get_inner) = (self.clone(), next.clone());
        let outer = self.clone();

        Lens::try_new(
            join_ids(&self.id, &next.id),
            move |p: &P| get_inner.get(&get_outer.get(p)?),
            move |p: P, u: U| {
                let middle = outer.get(&p)?;
                let middle = next.set(middle, u)?;
                outer.set(p, middle)
            },
        )
    }
}

impl<P: 'static, T: 'static, U: 'static> Add<Lens<T, U>> for Lens<P, T> {
    type Output = Lens<P, U>;

    fn add(self, rhs: Lens<T, U>) -> Self::Output {
        self.compose(rhs)
    }
}

/// Dotted concatenation of two id segments without leading or trailing dots.
pub fn join_ids(parent: &str, child: &str) -> String {
    format!("{parent}.{child}").trim_matches('.').to_string()
}
