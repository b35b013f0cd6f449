//! Diagnostics sink for non-fatal decoration problems

use crate::change::ChangeRecord;
use crate::path::RepoPath;
use crate::status::Status;
use parking_lot::Mutex;

/// Receives warnings about records that cannot be decorated
pub trait Diagnostics: Send + Sync {
    fn warn(&self, message: &str, record: &ChangeRecord);
}

/// Forwards diagnostics to `tracing` at WARN level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, message: &str, record: &ChangeRecord) {
        tracing::warn!(
            path = %record.path,
            status = %record.status,
            staged = record.staged,
            "{}",
            message
        );
    }
}

/// Discards every diagnostic
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentDiagnostics;

impl Diagnostics for SilentDiagnostics {
    fn warn(&self, _message: &str, _record: &ChangeRecord) {}
}

/// A captured diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub path: RepoPath,
    pub status: Status,
}

/// Keeps every diagnostic in memory, for hosts that surface them in a panel
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything collected so far
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Remove and return everything collected so far
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn warn(&self, message: &str, record: &ChangeRecord) {
        self.entries.lock().push(Diagnostic {
            message: message.to_string(),
            path: record.path.clone(),
            status: record.status,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_diagnostics_drain() {
        let sink = CollectingDiagnostics::new();
        sink.warn("first", &ChangeRecord::new("a.txt", Status::Untouched));
        sink.warn("second", &ChangeRecord::new("b.txt", Status::Untouched));

        assert_eq!(sink.len(), 2);
        let drained = sink.drain();
        assert_eq!(drained[0].message, "first");
        assert_eq!(drained[1].path, RepoPath::new("b.txt"));
        assert!(sink.is_empty());
    }
}
