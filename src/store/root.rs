//! The root store: sole owner of a value and its update queue.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use futures::future::BoxFuture;
use futures::StreamExt;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

use super::hub::Hub;
use super::{DataStream, Model, Store, Update};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::scope::Scope;

/// Callback receiving errors from the fold and from handlers.
pub type ErrorHandler = Arc<dyn Fn(&StoreError) + Send + Sync>;

/// Store holding the authoritative value.
///
/// Updates from this store, its sub-stores and their handlers all go through
/// one bounded queue and are folded one at a time in submission order. A
/// folded value is published only if it differs from the previous one.
///
/// Cloning is cheap; clones share the value, queue and scope. The store is
/// closed when [`close`](Self::close) is called or the last `RootStore`
/// handle is dropped. Sub-stores and bound handlers do not keep it open.
/// Construction needs a running tokio runtime.
pub struct RootStore<T: Model> {
    inner: Arc<RootInner<T>>,
}

struct RootInner<T: Model> {
    id: String,
    queue: mpsc::Sender<Update<T>>,
    hub: Arc<Hub<T>>,
    scope: Scope,
    errors: Arc<RwLock<ErrorHandler>>,
}

impl<T: Model> Clone for RootStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Model> RootStore<T> {
    /// Create a store with a generated id and default settings.
    pub fn new(initial: T) -> Self {
        Self::with_config(initial, StoreConfig::default())
    }

    pub fn with_id(initial: T, id: impl Into<String>) -> Self {
        Self::with_config(
            initial,
            StoreConfig {
                id: Some(id.into()),
                ..StoreConfig::default()
            },
        )
    }

    pub fn with_config(initial: T, config: StoreConfig) -> Self {
        let id = config.id.unwrap_or_else(generate_id);
        let (queue, updates) = mpsc::channel(config.queue_capacity.max(1));
        let hub = Arc::new(Hub::new(initial));
        let scope = Scope::new(id.clone());
        let errors = Arc::new(RwLock::new(default_error_handler(id.clone())));

        scope.spawn(fold(
            id.clone(),
            updates,
            Arc::clone(&hub),
            Arc::clone(&errors),
        ));
        tracing::debug!(store = %id, capacity = config.queue_capacity, "Root store created");

        Self {
            inner: Arc::new(RootInner {
                id,
                queue,
                hub,
                scope,
                errors,
            }),
        }
    }

    /// Replace the error handler, returning the store for chaining.
    pub fn with_error_handler<F>(self, handler: F) -> Self
    where
        F: Fn(&StoreError) + Send + Sync + 'static,
    {
        self.set_error_handler(handler);
        self
    }

    /// Replace the error handler. It runs on the fold task and must not block.
    pub fn set_error_handler<F>(&self, handler: F)
    where
        F: Fn(&StoreError) + Send + Sync + 'static,
    {
        *self.inner.errors.write() = Arc::new(handler);
    }

    /// Tear down the store: stop the fold, cancel every handler bound to it
    /// or its sub-stores, and end all value streams.
    pub fn close(&self) {
        self.inner.close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.scope.is_closed()
    }
}

impl<T: Model> RootInner<T> {
    fn close(&self) {
        if !self.scope.is_closed() {
            tracing::debug!(store = %self.id, "Closing root store");
        }
        self.scope.close();
        self.hub.close();
    }

    fn data(&self) -> Result<DataStream<T>, StoreError> {
        if self.scope.is_closed() {
            return Err(closed(&self.id));
        }
        self.hub
            .subscribe()
            .map(|rx| UnboundedReceiverStream::new(rx).boxed())
            .ok_or_else(|| closed(&self.id))
    }

    /// Sender for the update queue, unless the store is closed.
    fn queue(&self) -> Result<mpsc::Sender<Update<T>>, StoreError> {
        if self.scope.is_closed() {
            return Err(closed(&self.id));
        }
        Ok(self.queue.clone())
    }

    fn report(&self, error: &StoreError) {
        let handler = Arc::clone(&*self.errors.read());
        handler(error);
    }
}

impl<T: Model> Drop for RootInner<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T: Model> Store<T> for RootStore<T> {
    fn id(&self) -> &str {
        &self.inner.id
    }

    fn path(&self) -> &str {
        ""
    }

    fn current(&self) -> Result<T, StoreError> {
        Ok(self.inner.hub.current())
    }

    fn data(&self) -> Result<DataStream<T>, StoreError> {
        self.inner.data()
    }

    fn enqueue(&self, update: Update<T>) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            self.inner
                .queue()?
                .send(update)
                .await
                .map_err(|_| closed(&self.inner.id))
        })
    }

    fn scope(&self) -> &Scope {
        &self.inner.scope
    }

    fn report(&self, error: StoreError) {
        self.inner.report(&error);
    }

    fn downgrade(&self) -> Arc<dyn Store<T>> {
        Arc::new(WeakRoot {
            inner: Arc::downgrade(&self.inner),
            id: self.inner.id.clone(),
            scope: self.inner.scope.clone(),
        })
    }
}

/// Handle on a root that does not keep it open.
///
/// Held by sub-stores and handler tasks. Once every [`RootStore`] handle is
/// gone the root closes and operations through this handle fail with
/// [`StoreError::Closed`].
struct WeakRoot<T: Model> {
    inner: Weak<RootInner<T>>,
    id: String,
    scope: Scope,
}

impl<T: Model> Clone for WeakRoot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
            id: self.id.clone(),
            scope: self.scope.clone(),
        }
    }
}

impl<T: Model> WeakRoot<T> {
    fn upgrade(&self) -> Result<Arc<RootInner<T>>, StoreError> {
        self.inner.upgrade().ok_or_else(|| closed(&self.id))
    }
}

impl<T: Model> Store<T> for WeakRoot<T> {
    fn id(&self) -> &str {
        &self.id
    }

    fn path(&self) -> &str {
        ""
    }

    fn current(&self) -> Result<T, StoreError> {
        Ok(self.upgrade()?.hub.current())
    }

    fn data(&self) -> Result<DataStream<T>, StoreError> {
        self.upgrade()?.data()
    }

    fn enqueue(&self, update: Update<T>) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            // Only the sender is held while waiting for queue space.
            let queue = self.upgrade()?.queue()?;
            queue.send(update).await.map_err(|_| closed(&self.id))
        })
    }

    fn scope(&self) -> &Scope {
        &self.scope
    }

    fn report(&self, error: StoreError) {
        match self.inner.upgrade() {
            Some(inner) => inner.report(&error),
            None => tracing::warn!(store = %self.id, error = %error, "Error after store was dropped"),
        }
    }

    fn downgrade(&self) -> Arc<dyn Store<T>> {
        Arc::new(self.clone())
    }
}

fn closed(id: &str) -> StoreError {
    StoreError::Closed {
        store: id.to_string(),
    }
}

/// Apply queued updates one by one, publishing each changed value.
async fn fold<T: Model>(
    id: String,
    mut updates: mpsc::Receiver<Update<T>>,
    hub: Arc<Hub<T>>,
    errors: Arc<RwLock<ErrorHandler>>,
) {
    while let Some(update) = updates.recv().await {
        let last = hub.current();
        let error = match panic::catch_unwind(AssertUnwindSafe(move || update(last))) {
            Ok(Ok(next)) => {
                hub.publish(next);
                continue;
            }
            Ok(Err(source)) => match source.downcast::<StoreError>() {
                Ok(focus @ StoreError::Focus { .. }) => focus,
                Ok(other) => StoreError::UpdateFailed {
                    store: id.clone(),
                    source: other.into(),
                },
                Err(source) => StoreError::UpdateFailed {
                    store: id.clone(),
                    source,
                },
            },
            Err(payload) => StoreError::UpdatePanicked {
                store: id.clone(),
                message: panic_message(payload.as_ref()),
            },
        };

        let handler = Arc::clone(&*errors.read());
        handler(&error);
    }
    tracing::debug!(store = %id, "Update queue closed");
}

fn default_error_handler(id: String) -> ErrorHandler {
    Arc::new(move |error: &StoreError| {
        tracing::error!(store = %id, error = %error, "Store update failed");
    })
}

fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
