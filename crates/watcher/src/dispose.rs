//! Scoped release of subscriptions and watch handles

/// A resource that can be released explicitly
///
/// `dispose` must be idempotent. Implementations usually also dispose on drop.
pub trait Disposable: Send {
    fn dispose(&mut self);
}

/// Runs a closure once, on `dispose` or on drop
pub struct OnDispose {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl OnDispose {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.release.is_none()
    }
}

impl Disposable for OnDispose {
    fn dispose(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for OnDispose {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Group of disposables released together
///
/// Members are released in reverse insertion order. Anything pushed after
/// the set was disposed is released immediately.
#[derive(Default)]
pub struct DisposableSet {
    members: Vec<Box<dyn Disposable>>,
    disposed: bool,
}

impl DisposableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mut member: Box<dyn Disposable>) {
        if self.disposed {
            member.dispose();
        } else {
            self.members.push(member);
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Disposable for DisposableSet {
    fn dispose(&mut self) {
        self.disposed = true;
        while let Some(mut member) = self.members.pop() {
            member.dispose();
        }
    }
}

impl Drop for DisposableSet {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for DisposableSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisposableSet")
            .field("members", &self.members.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}
