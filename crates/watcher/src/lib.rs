//! Change-event plumbing for Decor
//!
//! This crate provides:
//! - Typed publish/subscribe with disposable subscriptions
//! - Scoped release of grouped handles
//! - The repository change source capability
//! - An in-memory change source

pub mod dispose;
pub mod event;
pub mod memory;
pub mod source;

pub use dispose::{Disposable, DisposableSet, OnDispose};
pub use event::{Emitter, Subscription};
pub use memory::InMemoryChangeSource;
pub use source::{ChangeSnapshot, ChangeSource, Repository, SnapshotListener, WatchError};
