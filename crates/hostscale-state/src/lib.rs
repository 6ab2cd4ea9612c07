//! hostscale-state — host inventory for hostscale.
//!
//! Backed by [redb](https://docs.rs/redb), provides persistent and in-memory
//! storage for the host records that scaling groups are made of.
//!
//! # Architecture
//!
//! Host records are JSON-serialized into redb's `&[u8]` value columns and
//! keyed by host id. A separate counters table hands out monotonically
//! increasing host ids and creation sequence numbers, so listings can be
//! ordered most-recently-created first even when two hosts share the same
//! creation second.
//!
//! The `HostStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and can be shared across async tasks and blocking workers.

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::HostStore;
pub use types::*;
