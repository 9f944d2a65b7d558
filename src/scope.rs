//! Lifecycle scope shared by a root store, its sub-stores and their handlers.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Task group keyed by a store's lifetime.
///
/// Every task spawned through the scope races against the close signal and
/// is aborted when the scope closes. Clones share the same state.
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

struct ScopeInner {
    name: String,
    closed: AtomicBool,
    notify: Notify,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Scope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                name: name.into(),
                closed: AtomicBool::new(false),
                notify: Notify::new(),
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Spawn `fut` bound to this scope.
    ///
    /// Returns `false` without spawning if the scope is already closed.
    pub fn spawn<F>(&self, fut: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.inner.tasks.lock();
        if self.is_closed() {
            return false;
        }
        tasks.retain(|handle| !handle.is_finished());

        let scope = self.clone();
        tasks.push(tokio::spawn(async move {
            tokio::select! {
                _ = scope.closed() => {}
                _ = fut => {}
            }
        }));
        true
    }

    /// Close the scope and abort every task spawned through it.
    pub fn close(&self) {
        let handles = {
            let mut tasks = self.inner.tasks.lock();
            if self.inner.closed.swap(true, Ordering::SeqCst) {
                return;
            }
            std::mem::take(&mut *tasks)
        };

        tracing::debug!(scope = %self.inner.name, tasks = handles.len(), "Scope closed");
        self.inner.notify.notify_waiters();
        for handle in handles {
            handle.abort();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Resolves once the scope is closed.
    pub async fn closed(&self) {
        // Register with Notify before checking the flag, otherwise a close()
        // between the check and the await would be missed.
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_closed() {
            return;
        }
        notified.await;
    }
}
