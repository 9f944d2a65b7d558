//! Stores: observable state with a serialized update fold.
//!
//! # Architecture
//!
//! ```text
//! actions ──→ Handler ──→ enqueue(Update) ──→ SubStore ──→ … ──→ RootStore queue
//!                                                                    │ fold
//!    UI ←── data (SubStore: map + distinct) ←── data (RootStore) ←───┘
//! ```
//!
//! - **RootStore**: owns the value and the update queue; applies updates one
//!   at a time in submission order.
//! - **SubStore**: a lens-focused view; forwards writes to its parent and
//!   derives its stream from the parent's.

mod distinct;
mod hub;
mod root;
mod sub;

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{BoxStream, Stream, StreamExt};
use futures::FutureExt;
use tokio::sync::oneshot;

use crate::error::StoreError;
use crate::handler::{forward, Applicator, EmittingHandler, Emitter, Handler};
use crate::lens::Lens;
use crate::scope::Scope;

pub use distinct::distinct_until_changed;
pub use root::{ErrorHandler, RootStore};
pub use sub::SubStore;

/// Marker trait for values held in a store.
///
/// Values are replaced, never mutated in place, and compared with
/// `PartialEq` to suppress redundant notifications.
pub trait Model: Clone + PartialEq + Send + Sync + 'static {}

impl<T: Clone + PartialEq + Send + Sync + 'static> Model for T {}

/// A transformation from one store value to the next.
pub type Update<T> = Box<dyn FnOnce(T) -> anyhow::Result<T> + Send>;

/// Stream of a store's values: the latest value first, then every change.
pub type DataStream<T> = BoxStream<'static, T>;

/// Wrap an infallible function as an [`Update`].
pub fn update<T, F>(f: F) -> Update<T>
where
    F: FnOnce(T) -> T + Send + 'static,
{
    Box::new(move |value| Ok(f(value)))
}

/// Wrap a fallible function as an [`Update`].
pub fn try_update<T, F>(f: F) -> Update<T>
where
    F: FnOnce(T) -> anyhow::Result<T> + Send + 'static,
{
    Box::new(f)
}

/// Contract shared by [`RootStore`] and [`SubStore`].
pub trait Store<T: Model>: Send + Sync {
    /// Id of this store; sub-store ids extend it with their lens id.
    fn id(&self) -> &str;

    /// Dotted lens path from the root. Empty for a root store.
    fn path(&self) -> &str;

    /// Synchronous snapshot of the current value.
    fn current(&self) -> Result<T, StoreError>;

    /// Subscribe to the value stream.
    fn data(&self) -> Result<DataStream<T>, StoreError>;

    /// Queue an update. Suspends while the root's queue is full.
    fn enqueue(&self, update: Update<T>) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Lifecycle scope of the owning root.
    fn scope(&self) -> &Scope;

    /// Hand an error to the owning root's error handler.
    fn report(&self, error: StoreError);

    /// Handle on this store that does not keep its root open.
    fn downgrade(&self) -> Arc<dyn Store<T>>;
}

/// Handler and sub-store factories available on every store.
pub trait StoreExt<T: Model>: Store<T> + Clone + Sized + 'static {
    /// Handler deriving the next value from the current one and an action.
    fn handle<A, F>(&self, execute: F) -> Handler<A>
    where
        A: Send + 'static,
        F: Fn(T, A) -> T + Send + Sync + 'static,
    {
        self.try_handle(move |value, action| Ok(execute(value, action)))
    }

    /// Like [`handle`](Self::handle), but the body may fail. Failures go to
    /// the root's error handler and leave the value unchanged.
    fn try_handle<A, F>(&self, execute: F) -> Handler<A>
    where
        A: Send + 'static,
        F: Fn(T, A) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let store = self.downgrade();
        let execute = Arc::new(execute);
        Handler::new(self.scope().clone(), move |mut actions: BoxStream<'static, A>| {
            let store = store.clone();
            let execute = Arc::clone(&execute);
            async move {
                while let Some(action) = actions.next().await {
                    let execute = Arc::clone(&execute);
                    let update: Update<T> = Box::new(move |value| execute(value, action));
                    if !forward(&*store, update).await {
                        break;
                    }
                }
                tracing::debug!(store = %store.id(), "Handler input ended");
            }
            .boxed()
        })
    }

    /// Handler without an action value; bind it to a stream of `()`.
    fn handle_unit<F>(&self, execute: F) -> Handler<()>
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.handle(move |value, ()| execute(value))
    }

    /// Handler that can also emit values to other handlers.
    ///
    /// Values pushed to the [`Emitter`] are delivered to subscribers of the
    /// returned handler once the update has been applied. Each subscriber
    /// buffers up to `buffer` values; when a buffer is full, this handler
    /// waits before taking its next action.
    fn handle_and_emit<A, E, F>(&self, buffer: usize, execute: F) -> EmittingHandler<A, E>
    where
        A: Send + 'static,
        E: Clone + Send + 'static,
        F: Fn(&mut Emitter<E>, T, A) -> T + Send + Sync + 'static,
    {
        let store = self.downgrade();
        let execute = Arc::new(execute);
        EmittingHandler::new(self.scope().clone(), buffer, move |mut actions, outbound| {
            let store = store.clone();
            let execute = Arc::clone(&execute);
            async move {
                while let Some(action) = actions.next().await {
                    let (emitted_tx, emitted_rx) = oneshot::channel();
                    let execute = Arc::clone(&execute);
                    let update: Update<T> = Box::new(move |value| {
                        let mut emitter = Emitter::new();
                        let next = execute(&mut emitter, value, action);
                        let _ = emitted_tx.send(emitter.into_values());
                        Ok(next)
                    });
                    if !forward(&*store, update).await {
                        break;
                    }
                    // Dropped unsent when the update never ran or panicked.
                    if let Ok(values) = emitted_rx.await {
                        outbound.send_all(values).await;
                    }
                }
                tracing::debug!(store = %store.id(), "Emitting handler input ended");
            }
            .boxed()
        })
    }

    /// [`handle_and_emit`](Self::handle_and_emit) without an action value.
    fn handle_and_emit_unit<E, F>(&self, buffer: usize, execute: F) -> EmittingHandler<(), E>
    where
        E: Clone + Send + 'static,
        F: Fn(&mut Emitter<E>, T) -> T + Send + Sync + 'static,
    {
        self.handle_and_emit(buffer, move |emitter, value, ()| execute(emitter, value))
    }

    /// Handler replacing the value with each action.
    fn update_handler(&self) -> Handler<T> {
        self.handle(|_, value| value)
    }

    /// Asynchronous mapping step, to be chained into a handler with
    /// [`Applicator::and_then`].
    fn apply<A, X, S, F>(&self, mapper: F) -> Applicator<A, X>
    where
        A: Send + 'static,
        X: Send + 'static,
        S: Stream<Item = X> + Send + 'static,
        F: Fn(A) -> S + Send + Sync + 'static,
    {
        Applicator::new(mapper)
    }

    /// Sub-store focused through `lens`.
    fn sub<X: Model>(&self, lens: Lens<T, X>) -> SubStore<T, X> {
        SubStore::new(self.downgrade(), lens)
    }
}

impl<T: Model, S: Store<T> + Clone + 'static> StoreExt<T> for S {}

/// Sub-store factories for list-valued stores.
pub trait ListStoreExt<D: Model>: StoreExt<Vec<D>> {
    /// Sub-store following the element with the same key as `element`.
    fn sub_element<I, F>(&self, element: &D, id_provider: F) -> SubStore<Vec<D>, D>
    where
        I: PartialEq + Display + Send + Sync + 'static,
        F: Fn(&D) -> I + Send + Sync + 'static,
    {
        self.sub(Lens::element(element, id_provider))
    }

    /// Sub-store at a fixed position. Do not use it while the list itself
    /// is edited (insert, remove, reorder).
    fn sub_index(&self, index: usize) -> SubStore<Vec<D>, D> {
        self.sub(Lens::index(index))
    }
}

impl<D: Model, S: StoreExt<Vec<D>>> ListStoreExt<D> for S {}

/// Sub-store factories for map-valued stores.
pub trait MapStoreExt<K, V>: StoreExt<HashMap<K, V>>
where
    K: Eq + Hash + Clone + Display + Send + Sync + 'static,
    V: Model,
{
    fn sub_key(&self, key: K) -> SubStore<HashMap<K, V>, V> {
        self.sub(Lens::key(key))
    }
}

impl<K, V, S> MapStoreExt<K, V> for S
where
    K: Eq + Hash + Clone + Display + Send + Sync + 'static,
    V: Model,
    S: StoreExt<HashMap<K, V>>,
{
}

/// Sub-store factories for stores holding an optional value.
pub trait OptionStoreExt<P: Model>: StoreExt<Option<P>> {
    /// Sub-store through a lens on the non-optional parent.
    ///
    /// Reading or writing it while the parent is `None` fails with
    /// [`StoreError::Focus`].
    fn sub_nullable<X: Model>(&self, lens: Lens<P, X>) -> SubStore<Option<P>, X> {
        self.sub(lens.into_nullable())
    }

    /// Sub-store substituting `default` for `None` in both directions.
    fn or_default(&self, default: P) -> SubStore<Option<P>, P> {
        self.sub(Lens::or_default(default))
    }
}

impl<P: Model, S: StoreExt<Option<P>>> OptionStoreExt<P> for S {}
