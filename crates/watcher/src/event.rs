//! Typed publish/subscribe

use crate::dispose::Disposable;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Slot<T> {
    id: u64,
    active: Arc<AtomicBool>,
    listener: Listener<T>,
}

struct Registry<T> {
    next_id: u64,
    slots: Vec<Slot<T>>,
}

/// Event emitter with disposable subscriptions
///
/// Listeners run synchronously inside [`Emitter::fire`], in subscription
/// order. The registry lock is not held while listeners run, so a listener
/// may subscribe or dispose subscriptions (including its own).
pub struct Emitter<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T: 'static> Emitter<T> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                slots: Vec::new(),
            })),
        }
    }

    /// Register a listener; it stays registered until the subscription is
    /// disposed or dropped
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let active = Arc::new(AtomicBool::new(true));
        let id = {
            let mut registry = self.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.slots.push(Slot {
                id,
                active: Arc::clone(&active),
                listener: Arc::new(listener),
            });
            id
        };

        let registry: Weak<Mutex<Registry<T>>> = Arc::downgrade(&self.registry);
        Subscription {
            active,
            detach: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry.lock().slots.retain(|slot| slot.id != id);
                }
            })),
        }
    }

    /// Deliver `event` to every active listener; returns how many ran
    pub fn fire(&self, event: &T) -> usize {
        let snapshot: Vec<(Arc<AtomicBool>, Listener<T>)> = self
            .registry
            .lock()
            .slots
            .iter()
            .map(|slot| (Arc::clone(&slot.active), Arc::clone(&slot.listener)))
            .collect();

        let mut delivered = 0;
        for (active, listener) in snapshot {
            // A listener disposed earlier in this round must not run.
            if active.load(Ordering::Acquire) {
                listener(event);
                delivered += 1;
            }
        }
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.registry.lock().slots.len()
    }
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.registry.lock().slots.len())
            .finish()
    }
}

/// Handle to a registered listener
///
/// Disposing (or dropping) the handle unregisters the listener and stops any
/// delivery that is already in progress from reaching it.
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    active: Arc<AtomicBool>,
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Disposable for Subscription {
    fn dispose(&mut self) {
        self.active.store(false, Ordering::Release);
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_reaches_listeners_in_order() {
        let emitter = Emitter::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = {
            let seen = Arc::clone(&seen);
            emitter.subscribe(move |value| seen.lock().push(("first", *value)))
        };
        let second = {
            let seen = Arc::clone(&seen);
            emitter.subscribe(move |value| seen.lock().push(("second", *value)))
        };

        assert_eq!(emitter.fire(&7), 2);
        assert_eq!(*seen.lock(), vec![("first", 7), ("second", 7)]);
        drop((first, second));
    }

    #[test]
    fn test_dispose_unregisters() {
        let emitter = Emitter::<u32>::new();
        let mut subscription = emitter.subscribe(|_| {});
        assert_eq!(emitter.listener_count(), 1);

        subscription.dispose();
        subscription.dispose();

        assert!(!subscription.is_active());
        assert_eq!(emitter.listener_count(), 0);
        assert_eq!(emitter.fire(&1), 0);
    }

    #[test]
    fn test_drop_unregisters() {
        let emitter = Emitter::<u32>::new();
        drop(emitter.subscribe(|_| {}));
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_disposed_mid_fire_listener_does_not_run() {
        let emitter = Emitter::<u32>::new();
        let victim: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let ran = Arc::new(AtomicBool::new(false));

        let killer = {
            let victim = Arc::clone(&victim);
            emitter.subscribe(move |_| {
                if let Some(mut subscription) = victim.lock().take() {
                    subscription.dispose();
                }
            })
        };
        let target = {
            let ran = Arc::clone(&ran);
            emitter.subscribe(move |_| ran.store(true, Ordering::SeqCst))
        };
        *victim.lock() = Some(target);

        assert_eq!(emitter.fire(&0), 1);
        assert!(!ran.load(Ordering::SeqCst));
        drop(killer);
    }

    #[test]
    fn test_subscription_outliving_emitter_is_harmless() {
        let emitter = Emitter::<u32>::new();
        let mut subscription = emitter.subscribe(|_| {});
        drop(emitter);
        subscription.dispose();
        assert!(!subscription.is_active());
    }
}
