use std::future::Future;
use std::sync::Arc;

use futures::stream::{self, BoxStream, Stream, StreamExt};

use super::Handler;

type Mapper<A, X> = dyn Fn(A) -> BoxStream<'static, X> + Send + Sync;

/// Asynchronous step mapping each action to a stream of results, for
/// example a remote call.
///
/// Chained steps run sequentially per action: every result for one action
/// is handed on before the next action is mapped.
pub struct Applicator<A, X> {
    mapper: Arc<Mapper<A, X>>,
}

impl<A, X> Clone for Applicator<A, X> {
    fn clone(&self) -> Self {
        Self {
            mapper: Arc::clone(&self.mapper),
        }
    }
}

impl<A: Send + 'static, X: Send + 'static> Applicator<A, X> {
    pub fn new<S, F>(mapper: F) -> Self
    where
        S: Stream<Item = X> + Send + 'static,
        F: Fn(A) -> S + Send + Sync + 'static,
    {
        Self {
            mapper: Arc::new(move |action| mapper(action).boxed()),
        }
    }

    /// Applicator producing exactly one result per action.
    pub fn from_async<Fut, F>(f: F) -> Self
    where
        Fut: Future<Output = X> + Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
    {
        Self::new(move |action| stream::once(f(action)))
    }

    /// Map every action of `actions` and concatenate the result streams.
    pub fn map_stream<S>(&self, actions: S) -> BoxStream<'static, X>
    where
        S: Stream<Item = A> + Send + 'static,
    {
        let mapper = Arc::clone(&self.mapper);
        actions.flat_map(move |action| mapper(action)).boxed()
    }

    /// Feed this step's results into `next`.
    pub fn and_then(&self, next: &Handler<X>) -> Handler<A> {
        let this = self.clone();
        next.contramap(move |actions| this.map_stream(actions))
    }

    /// Append another asynchronous step.
    pub fn then_apply<Y: Send + 'static>(&self, next: &Applicator<X, Y>) -> Applicator<A, Y> {
        let first = Arc::clone(&self.mapper);
        let next = next.clone();
        Applicator::new(move |action| next.map_stream(first(action)))
    }
}
