//! Publish/subscribe fan-out shared by the record store and the record view.
//!
//! Observers are called synchronously in subscription order. A failing
//! observer (returned error or panic) is logged and skipped; delivery to the
//! remaining observers always continues and nothing unwinds into the caller
//! of [`Notifier::notify`].

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{trace, warn};

/// Callback invoked for every published event
pub type Observer<E> = Arc<dyn Fn(&E) -> anyhow::Result<()> + Send + Sync>;

struct Registry<E> {
    next_id: u64,
    observers: Vec<(u64, Observer<E>)>,
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Notifier<E> {
    source: &'static str,
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E: 'static> Notifier<E> {
    /// Create a notifier; `source` names the publisher in log output
    pub fn new(source: &'static str) -> Self {
        Self {
            source,
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                observers: Vec::new(),
            })),
        }
    }

    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = {
            let mut registry = lock(&self.registry);
            let id = registry.next_id;
            registry.next_id += 1;
            registry.observers.push((id, Arc::new(observer)));
            id
        };
        trace!(target: "notifier", "{}: observer {} subscribed", self.source, id);

        let weak: Weak<Mutex<Registry<E>>> = Arc::downgrade(&self.registry);
        Subscription {
            id,
            cancel: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    lock(&registry).observers.retain(|(oid, _)| *oid != id);
                }
            })),
        }
    }

    /// Deliver `event` to every observer subscribed at the time of the call
    pub fn notify(&self, event: &E)
    where
        E: std::fmt::Debug,
    {
        let observers: Vec<(u64, Observer<E>)> = lock(&self.registry).observers.clone();

        for (id, observer) in observers {
            match catch_unwind(AssertUnwindSafe(|| observer(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(target: "notifier", "{}: observer {} failed on {:?}: {:#}", self.source, id, event, e);
                }
                Err(_) => {
                    warn!(target: "notifier", "{}: observer {} panicked on {:?}", self.source, id, event);
                }
            }
        }
    }

    pub fn observer_count(&self) -> usize {
        lock(&self.registry).observers.len()
    }
}

/// Handle returned by [`Notifier::subscribe`].
///
/// Dropping the handle keeps the observer registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    id: u64,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
