//! Handlers turn streams of actions into store updates.
//!
//! ```text
//! Stream<A> ──bind──→ Handler<A> ──enqueue──→ Store<T>
//!                         │
//!                         └─(EmittingHandler)──→ Stream<E> ──bind──→ Handler<E>
//! ```
//!
//! Binding spawns the consuming task right away on the owning store's
//! scope, so it is cancelled together with the store.

mod applicator;
mod emitting;

use std::sync::Arc;

use futures::future::{self, BoxFuture};
use futures::stream::{self, BoxStream, Stream, StreamExt};

use crate::error::StoreError;
use crate::scope::Scope;
use crate::store::{Model, Store, Update};

pub use applicator::Applicator;
pub use emitting::{EmittingHandler, Emitter};

type Execute<A> = dyn Fn(BoxStream<'static, A>) -> BoxFuture<'static, ()> + Send + Sync;

/// Entry point accepting actions of type `A` for a store.
///
/// Create handlers with the factories on [`StoreExt`](crate::store::StoreExt).
pub struct Handler<A> {
    scope: Scope,
    execute: Arc<Execute<A>>,
}

impl<A> Clone for Handler<A> {
    fn clone(&self) -> Self {
        Self {
            scope: self.scope.clone(),
            execute: Arc::clone(&self.execute),
        }
    }
}

impl<A: Send + 'static> Handler<A> {
    pub(crate) fn new<F>(scope: Scope, execute: F) -> Self
    where
        F: Fn(BoxStream<'static, A>) -> BoxFuture<'static, ()> + Send + Sync + 'static,
    {
        Self {
            scope,
            execute: Arc::new(execute),
        }
    }

    /// Start consuming `actions`. Each action becomes one queued update, in
    /// stream order.
    ///
    /// Fails with [`StoreError::Closed`] if the owning store was torn down.
    pub fn bind<S>(&self, actions: S) -> Result<(), StoreError>
    where
        S: Stream<Item = A> + Send + 'static,
    {
        let task = (self.execute)(actions.boxed());
        if self.scope.spawn(task) {
            Ok(())
        } else {
            Err(StoreError::Closed {
                store: self.scope.name().to_string(),
            })
        }
    }

    /// Handle a single action.
    ///
    /// Every call runs as its own task; bind a stream when several actions
    /// must be applied in order.
    pub fn invoke(&self, action: A) -> Result<(), StoreError> {
        self.bind(stream::once(future::ready(action)))
    }

    /// Handler feeding `transform(actions)` into this one.
    pub(crate) fn contramap<B, F>(&self, transform: F) -> Handler<B>
    where
        B: Send + 'static,
        F: Fn(BoxStream<'static, B>) -> BoxStream<'static, A> + Send + Sync + 'static,
    {
        let execute = Arc::clone(&self.execute);
        Handler::new(self.scope.clone(), move |actions| execute(transform(actions)))
    }
}

/// Enqueue `update`, reporting failures to the root.
///
/// Returns `false` once the store is closed and the calling task should stop.
pub(crate) async fn forward<T, S>(store: &S, update: Update<T>) -> bool
where
    T: Model,
    S: Store<T> + ?Sized,
{
    match store.enqueue(update).await {
        Ok(()) => true,
        Err(error) if error.is_closed() => {
            tracing::warn!(store = %store.id(), "Store closed, stopping handler");
            false
        }
        Err(error) => {
            store.report(error);
            true
        }
    }
}
