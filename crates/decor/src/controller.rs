//! Repository-bound decoration controller
//!
//! Binds to one repository at a time. Every change snapshot from the bound
//! repository is aggregated and published as a [`DecorationUpdate`], whose
//! mapping is computed on demand against whatever hierarchy the observer
//! supplies.

use crate::config::DecorationsConfig;
use crate::error::DecoratorError;
use decor_core::{
    collect_decorations, report_unhandled, DecorationMap, Diagnostics, DominantChangeMap,
    Hierarchy, SilentDiagnostics,
};
use decor_watcher::{
    ChangeSnapshot, ChangeSource, Disposable, DisposableSet, Emitter, Repository,
    SnapshotListener, Subscription,
};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Computes the decoration mapping for a hierarchy
pub type DecorationProvider = Arc<dyn Fn(&dyn Hierarchy) -> DecorationMap + Send + Sync>;

/// Payload of the decoration-update event
#[derive(Clone)]
pub struct DecorationUpdate {
    repository: Repository,
    provider: DecorationProvider,
}

impl DecorationUpdate {
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Decorations for every node of `tree` that has a dominant change
    pub fn decorations(&self, tree: &dyn Hierarchy) -> DecorationMap {
        (self.provider)(tree)
    }
}

impl fmt::Debug for DecorationUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecorationUpdate")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct Binding {
    /// Watch handle and snapshot listener, released together
    current: Option<(Repository, DisposableSet)>,
    disposed: bool,
}

/// Keeps decorations in sync with the selected repository
pub struct ChangeDecorator {
    source: Arc<dyn ChangeSource>,
    diagnostics: Arc<dyn Diagnostics>,
    config: DecorationsConfig,
    updates: Arc<Emitter<DecorationUpdate>>,
    // Held across the watch await so selections are handled one at a time
    binding: Mutex<Binding>,
}

impl ChangeDecorator {
    pub fn new(
        source: Arc<dyn ChangeSource>,
        diagnostics: Arc<dyn Diagnostics>,
        config: DecorationsConfig,
    ) -> Self {
        Self {
            source,
            diagnostics,
            config,
            updates: Arc::new(Emitter::new()),
            binding: Mutex::new(Binding::default()),
        }
    }

    /// Subscribe to decoration updates
    pub fn on_did_change_decorations(
        &self,
        listener: impl Fn(&DecorationUpdate) + Send + Sync + 'static,
    ) -> Subscription {
        self.updates.subscribe(listener)
    }

    /// Rebind to `repository`, or unbind when `None`
    ///
    /// The previous binding is released before the new watch is requested.
    /// If the watch cannot be acquired the error is returned and the
    /// decorator stays unbound until the next selection.
    pub async fn on_repository_changed(
        &self,
        repository: Option<Repository>,
    ) -> Result<(), DecoratorError> {
        let mut binding = self.binding.lock().await;
        if binding.disposed {
            return Err(DecoratorError::Disposed);
        }

        if let Some((previous, mut handles)) = binding.current.take() {
            handles.dispose();
            debug!(repository = %previous, "Released repository binding");
        }

        let Some(repository) = repository else {
            info!("No repository selected");
            return Ok(());
        };
        info!(repository = %repository, "Repository selected");

        let watch = self.source.watch(&repository).await?;
        let mut handles = DisposableSet::new();
        handles.push(watch);
        let listener = self.source.on_change(self.snapshot_listener(repository.clone()));
        handles.push(Box::new(listener));

        binding.current = Some((repository, handles));
        Ok(())
    }

    /// Currently bound repository
    pub async fn active_repository(&self) -> Option<Repository> {
        self.binding
            .lock()
            .await
            .current
            .as_ref()
            .map(|(repository, _)| repository.clone())
    }

    /// Release the current binding; later selections are rejected
    pub async fn dispose(&self) {
        let mut binding = self.binding.lock().await;
        binding.disposed = true;
        if let Some((repository, mut handles)) = binding.current.take() {
            handles.dispose();
            debug!(repository = %repository, "Decorator disposed");
        }
    }

    /// Follow a repository-selection channel until its sender is dropped
    ///
    /// Binding failures are logged and the loop waits for the next
    /// selection; there is no retry.
    pub async fn run(&self, mut selection: watch::Receiver<Option<Repository>>) {
        let mut selected = selection.borrow_and_update().clone();
        loop {
            match self.on_repository_changed(selected).await {
                Ok(()) => {}
                Err(DecoratorError::Disposed) => break,
                Err(e) => warn!("Failed to bind repository: {}", e),
            }

            if selection.changed().await.is_err() {
                debug!("Repository selection closed");
                break;
            }
            selected = selection.borrow_and_update().clone();
        }
    }

    fn snapshot_listener(&self, repository: Repository) -> SnapshotListener {
        let updates = Arc::clone(&self.updates);
        let diagnostics = Arc::clone(&self.diagnostics);
        let config = self.config;

        Box::new(move |snapshot: &ChangeSnapshot| {
            if snapshot.repository != repository {
                return;
            }

            let changes = if !config.enabled {
                DominantChangeMap::default()
            } else if config.decorate_ancestors {
                DominantChangeMap::from_changes_under(&snapshot.changes, &repository.root)
            } else {
                DominantChangeMap::leaves_only(&snapshot.changes)
            };
            let unhandled = report_unhandled(&changes, diagnostics.as_ref());
            debug!(
                repository = %repository,
                reported = snapshot.changes.len(),
                decorated = changes.len(),
                unhandled,
                "Recomputed dominant changes"
            );

            // Unhandled records were reported above; providers stay quiet.
            let changes = Arc::new(changes);
            let provider: DecorationProvider = Arc::new(move |tree: &dyn Hierarchy| {
                collect_decorations(tree, &changes, &SilentDiagnostics)
            });
            updates.fire(&DecorationUpdate {
                repository: repository.clone(),
                provider,
            });
        })
    }
}
