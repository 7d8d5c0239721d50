//! Change notification: one event per committed logical mutation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// What kind of mutation completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    Marked,
    Revised,
    Imported,
    Reset,
}

type Callback = Box<dyn Fn(ChangeEvent) + Send + Sync>;
type Listeners = Arc<Mutex<Vec<(u64, Callback)>>>;

/// Observer registry. Single marks, whole batches, revisions, resets, and
/// imports each produce exactly one notification.
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Listeners,
    next_id: AtomicU64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; dropping the returned subscription unsubscribes.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(ChangeEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .expect("listener lock")
            .push((id, Box::new(listener)));
        Subscription {
            id,
            listeners: Arc::clone(&self.listeners),
        }
    }

    /// Invoke every registered listener once.
    pub fn notify(&self, event: ChangeEvent) {
        let listeners = self.listeners.lock().expect("listener lock");
        for (_, listener) in listeners.iter() {
            listener(event);
        }
    }
}

/// Active listener registration; unsubscribes on drop.
pub struct Subscription {
    id: u64,
    listeners: Listeners,
}

impl Subscription {
    /// Explicitly unsubscribe.
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
