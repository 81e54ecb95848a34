//! Domain-free plumbing for the quiz core: a keyed persistence store and a
//! cancellable periodic ticker.

pub mod store;
pub mod ticker;

pub use store::{DirStore, KeyValueStore, MemoryStore, SharedStore, StoreError};
pub use ticker::{TickToken, Ticker};
