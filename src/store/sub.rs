//! Lens-focused views on a parent store.

use std::sync::{Arc, OnceLock};

use futures::future::{self, BoxFuture};
use futures::StreamExt;

use super::distinct::distinct_until_changed;
use super::{DataStream, Model, Store, Update};
use crate::error::{LensError, StoreError};
use crate::lens::{join_ids, Lens};
use crate::scope::Scope;

/// Store exposing the part of a parent's value selected by a lens.
///
/// A sub-store has no storage and does not keep its root open. Reads go
/// through the lens against the parent's value. Writes are wrapped with the lens and forwarded to the
/// parent, so they end up as a single update in the root's queue. Creating
/// one is cheap and its id depends only on the parent and the lens, so it
/// can be recreated freely.
pub struct SubStore<P: Model, D: Model> {
    parent: Arc<dyn Store<P>>,
    lens: Lens<P, D>,
    id: OnceLock<String>,
    path: OnceLock<String>,
}

impl<P: Model, D: Model> Clone for SubStore<P, D> {
    fn clone(&self) -> Self {
        Self {
            parent: Arc::clone(&self.parent),
            lens: self.lens.clone(),
            id: self.id.clone(),
            path: self.path.clone(),
        }
    }
}

impl<P: Model, D: Model> SubStore<P, D> {
    /// `parent` should come from [`Store::downgrade`] so the sub-store does
    /// not own its root.
    pub fn new(parent: Arc<dyn Store<P>>, lens: Lens<P, D>) -> Self {
        Self {
            parent,
            lens,
            id: OnceLock::new(),
            path: OnceLock::new(),
        }
    }

    pub fn lens(&self) -> &Lens<P, D> {
        &self.lens
    }

    fn focus_error(&self, source: LensError) -> StoreError {
        StoreError::Focus {
            path: self.path().to_string(),
            source,
        }
    }
}

impl<P: Model, D: Model> Store<D> for SubStore<P, D> {
    fn id(&self) -> &str {
        self.id
            .get_or_init(|| join_ids(self.parent.id(), self.lens.id()))
    }

    fn path(&self) -> &str {
        self.path
            .get_or_init(|| join_ids(self.parent.path(), self.lens.id()))
    }

    fn current(&self) -> Result<D, StoreError> {
        let parent = self.parent.current()?;
        self.lens
            .get(&parent)
            .map_err(|source| self.focus_error(source))
    }

    fn data(&self) -> Result<DataStream<D>, StoreError> {
        let lens = self.lens.clone();
        let path = self.path().to_string();
        let focused = self.parent.data()?.filter_map(move |parent| {
            let value = match lens.get(&parent) {
                Ok(value) => Some(value),
                Err(error) => {
                    tracing::trace!(path = %path, error = %error, "Focus absent, value skipped");
                    None
                }
            };
            future::ready(value)
        });
        Ok(distinct_until_changed(focused).boxed())
    }

    fn enqueue(&self, update: Update<D>) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            // Fail fast while the focus cannot be resolved.
            self.current()?;
            let lens = self.lens.clone();
            let path = self.path().to_string();
            self.parent
                .enqueue(Box::new(move |parent: P| -> anyhow::Result<P> {
                    // The focus may be gone by the time the update is folded.
                    let focus = lens.get(&parent).map_err(|source| StoreError::Focus {
                        path: path.clone(),
                        source,
                    })?;
                    let next = update(focus)?;
                    Ok(lens
                        .set(parent, next)
                        .map_err(|source| StoreError::Focus { path, source })?)
                }))
                .await
        })
    }

    fn scope(&self) -> &Scope {
        self.parent.scope()
    }

    fn report(&self, error: StoreError) {
        self.parent.report(error);
    }

    fn downgrade(&self) -> Arc<dyn Store<D>> {
        Arc::new(self.clone())
    }
}
