use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{BoxStream, Stream, StreamExt};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use super::Handler;
use crate::error::StoreError;
use crate::scope::Scope;

/// Collects the values an emitting handler produces for one action.
pub struct Emitter<E> {
    values: Vec<E>,
}

impl<E> Emitter<E> {
    pub(crate) fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn emit(&mut self, value: E) {
        self.values.push(value);
    }

    pub(crate) fn into_values(self) -> Vec<E> {
        self.values
    }
}

/// Outbound side of an emitting handler: one bounded channel per subscriber.
pub(crate) struct Broadcaster<E> {
    buffer: usize,
    subscribers: Arc<Mutex<Vec<mpsc::Sender<E>>>>,
}

impl<E> Clone for Broadcaster<E> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer,
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<E: Clone + Send + 'static> Broadcaster<E> {
    fn new(buffer: usize) -> Self {
        Self {
            buffer: buffer.max(1),
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn subscribe(&self) -> BoxStream<'static, E> {
        let (tx, rx) = mpsc::channel(self.buffer);
        self.subscribers.lock().push(tx);
        ReceiverStream::new(rx).boxed()
    }

    /// Deliver `values` in order to every current subscriber, waiting while
    /// a subscriber's buffer is full.
    pub(crate) async fn send_all(&self, values: Vec<E>) {
        if values.is_empty() {
            return;
        }
        let subscribers = self.subscribers.lock().clone();
        if subscribers.is_empty() {
            tracing::trace!(count = values.len(), "No subscribers, emitted values discarded");
            return;
        }

        for value in values {
            for tx in &subscribers {
                // A closed receiver is pruned below.
                let _ = tx.send(value.clone()).await;
            }
        }
        self.subscribers.lock().retain(|tx| !tx.is_closed());
    }
}

/// Handler that also produces an outbound stream of `E` values.
///
/// Subscribe another store's handler to [`subscribe`](Self::subscribe) to
/// chain stores together.
pub struct EmittingHandler<A, E> {
    handler: Handler<A>,
    outbound: Broadcaster<E>,
}

impl<A, E> Clone for EmittingHandler<A, E> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            outbound: self.outbound.clone(),
        }
    }
}

impl<A: Send + 'static, E: Clone + Send + 'static> EmittingHandler<A, E> {
    pub(crate) fn new<F>(scope: Scope, buffer: usize, execute: F) -> Self
    where
        F: Fn(BoxStream<'static, A>, Broadcaster<E>) -> BoxFuture<'static, ()>
            + Send
            + Sync
            + 'static,
    {
        let outbound = Broadcaster::new(buffer);
        let task_outbound = outbound.clone();
        Self {
            handler: Handler::new(scope, move |actions| execute(actions, task_outbound.clone())),
            outbound,
        }
    }

    /// See [`Handler::bind`].
    pub fn bind<S>(&self, actions: S) -> Result<(), StoreError>
    where
        S: Stream<Item = A> + Send + 'static,
    {
        self.handler.bind(actions)
    }

    /// See [`Handler::invoke`].
    pub fn invoke(&self, action: A) -> Result<(), StoreError> {
        self.handler.invoke(action)
    }

    /// Stream of values emitted from now on.
    ///
    /// Values emitted while there are no subscribers are discarded.
    pub fn subscribe(&self) -> BoxStream<'static, E> {
        self.outbound.subscribe()
    }
}
