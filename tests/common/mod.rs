//! Shared test fixtures and stream helpers.

#![allow(dead_code, unused_imports)]

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use lensbound::{DataStream, Lens, Model, Store, StoreError};
use parking_lot::Mutex;

pub const TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    pub count: i32,
    pub label: String,
}

impl Counter {
    pub fn new(count: i32, label: &str) -> Self {
        Self {
            count,
            label: label.to_string(),
        }
    }
}

pub fn count_lens() -> Lens<Counter, i32> {
    Lens::new("count", |c: &Counter| c.count, |c, count| Counter { count, ..c })
}

pub fn label_lens() -> Lens<Counter, String> {
    Lens::new(
        "label",
        |c: &Counter| c.label.clone(),
        |c, label| Counter { label, ..c },
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: u32,
    pub text: String,
    pub done: bool,
}

pub fn todo(id: u32, text: &str) -> Todo {
    Todo {
        id,
        text: text.to_string(),
        done: false,
    }
}

pub fn done_lens() -> Lens<Todo, bool> {
    Lens::new("done", |t: &Todo| t.done, |t, done| Todo { done, ..t })
}

pub fn init_tracing() {
    lensbound::logging::init_tracing();
}

/// Next value of `stream`, failing the test on timeout or end of stream.
pub async fn next<T>(stream: &mut DataStream<T>) -> T {
    tokio::time::timeout(TIMEOUT, stream.next())
        .await
        .expect("timed out waiting for value")
        .expect("stream ended")
}

/// The next `n` values of `stream`.
pub async fn take<T>(stream: &mut DataStream<T>, n: usize) -> Vec<T> {
    let mut values = Vec::with_capacity(n);
    for _ in 0..n {
        values.push(next(stream).await);
    }
    values
}

/// Wait until the store's value satisfies `predicate` and return it.
pub async fn wait_until<T, S, F>(store: &S, predicate: F) -> T
where
    T: Model,
    S: Store<T>,
    F: Fn(&T) -> bool,
{
    let mut values = store.data().expect("store closed");
    loop {
        let value = next(&mut values).await;
        if predicate(&value) {
            return value;
        }
    }
}

/// Error handler recording every reported error as a string.
pub fn error_sink() -> (Arc<Mutex<Vec<String>>>, impl Fn(&StoreError) + Send + Sync + 'static) {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);
    (errors, move |error: &StoreError| sink.lock().push(error.to_string()))
}
