//! Reactive stores with lens-focused sub-stores.
//!
//! A [`RootStore`] owns a value and folds queued [`Update`]s into it one at
//! a time. [`SubStore`]s focus part of a parent's value through a [`Lens`],
//! forward writes up to the root and derive their value stream from the
//! parent's. [`Handler`]s connect streams of actions to stores.
//!
//! ```no_run
//! use futures::StreamExt;
//! use lensbound::{Lens, RootStore, Store, StoreExt};
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Counter {
//!     count: i32,
//!     label: String,
//! }
//!
//! # async fn run() -> Result<(), lensbound::StoreError> {
//! let store = RootStore::with_id(Counter { count: 0, label: "x".into() }, "counter");
//! let count = store.sub(Lens::new(
//!     "count",
//!     |c: &Counter| c.count,
//!     |c, count| Counter { count, ..c },
//! ));
//!
//! let increment = count.handle_unit(|n| n + 1);
//! increment.invoke(())?;
//!
//! let mut values = count.data()?;
//! while let Some(n) = values.next().await {
//!     println!("{}: {n}", count.id());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod lens;
pub mod logging;
pub mod model_id;
pub mod scope;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use error::{LensError, StoreError};
pub use handler::{Applicator, EmittingHandler, Emitter, Handler};
pub use lens::{join_ids, Lens};
pub use model_id::{ModelId, ModelIdRoot, ModelIdSub};
pub use scope::Scope;
pub use store::{
    distinct_until_changed, try_update, update, DataStream, ErrorHandler, ListStoreExt,
    MapStoreExt, Model, OptionStoreExt, RootStore, Store, StoreExt, SubStore, Update,
};
