//! In-memory change source
//!
//! Snapshots are pushed by the host (or by tests) through [`InMemoryChangeSource::publish`]
//! and delivered only while at least one watch handle for the repository is alive.

use crate::dispose::{Disposable, OnDispose};
use crate::event::{Emitter, Subscription};
use crate::source::{ChangeSnapshot, ChangeSource, Repository, SnapshotListener, WatchError};
use ahash::{AHashMap, AHashSet};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::debug;

#[derive(Default)]
struct WatchState {
    /// Live watch handles per repository
    watched: AHashMap<Repository, usize>,
    /// Repositories that refuse to be watched
    unavailable: AHashSet<Repository>,
}

/// Change source fed by explicit `publish` calls
#[derive(Clone)]
pub struct InMemoryChangeSource {
    state: Arc<Mutex<WatchState>>,
    emitter: Arc<Emitter<ChangeSnapshot>>,
}

impl InMemoryChangeSource {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(WatchState::default())),
            emitter: Arc::new(Emitter::new()),
        }
    }

    /// Deliver a snapshot; dropped unless its repository is being watched
    ///
    /// Returns the number of listeners that received it.
    pub fn publish(&self, snapshot: ChangeSnapshot) -> usize {
        if !self.is_watched(&snapshot.repository) {
            debug!(repository = %snapshot.repository, "Dropping snapshot for unwatched repository");
            return 0;
        }
        self.emitter.fire(&snapshot)
    }

    /// Deliver a snapshot whether or not its repository is watched
    ///
    /// Models a backend event that was already queued when the watch ended.
    pub fn publish_unchecked(&self, snapshot: ChangeSnapshot) -> usize {
        self.emitter.fire(&snapshot)
    }

    pub fn is_watched(&self, repository: &Repository) -> bool {
        self.watch_count(repository) > 0
    }

    pub fn watch_count(&self, repository: &Repository) -> usize {
        self.state
            .lock()
            .watched
            .get(repository)
            .copied()
            .unwrap_or(0)
    }

    /// Make `watch` fail (or succeed again) for a repository
    pub fn set_available(&self, repository: &Repository, available: bool) {
        let mut state = self.state.lock();
        if available {
            state.unavailable.remove(repository);
        } else {
            state.unavailable.insert(repository.clone());
        }
    }

    fn release(state: &Weak<Mutex<WatchState>>, repository: &Repository) {
        let Some(state) = state.upgrade() else {
            return;
        };
        let mut state = state.lock();
        if let Some(count) = state.watched.get_mut(repository) {
            *count -= 1;
            if *count == 0 {
                state.watched.remove(repository);
                debug!(repository = %repository, "Stopped watching repository");
            }
        }
    }
}

impl Default for InMemoryChangeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChangeSource for InMemoryChangeSource {
    async fn watch(&self, repository: &Repository) -> Result<Box<dyn Disposable>, WatchError> {
        {
            let mut state = self.state.lock();
            if state.unavailable.contains(repository) {
                return Err(WatchError::Unavailable(repository.clone()));
            }
            *state.watched.entry(repository.clone()).or_insert(0) += 1;
        }
        debug!(repository = %repository, "Watching repository");

        let state = Arc::downgrade(&self.state);
        let repository = repository.clone();
        Ok(Box::new(OnDispose::new(move || {
            Self::release(&state, &repository)
        })))
    }

    fn on_change(&self, listener: SnapshotListener) -> Subscription {
        self.emitter.subscribe(listener)
    }
}
