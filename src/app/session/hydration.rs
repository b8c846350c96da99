//! Hydration gate
//!
//! The persisted session loads asynchronously at startup. Until it has, a
//! missing session means "not known yet" rather than "signed out", so auth
//! decisions wait on this gate.
//!
//! The gate is a two-state flag that only ever moves from unhydrated to
//! hydrated. Callbacks registered with [`HydrationGate::on_hydrated`] run
//! exactly once: immediately if the gate is already open, otherwise on the
//! transition.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

type Callback = Box<dyn FnOnce() + Send>;

pub struct HydrationGate {
    flag: watch::Sender<bool>,
    pending: Mutex<Vec<Callback>>,
}

impl fmt::Debug for HydrationGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HydrationGate")
            .field("hydrated", &self.is_hydrated())
            .finish_non_exhaustive()
    }
}

impl Default for HydrationGate {
    fn default() -> Self {
        Self::new()
    }
}

impl HydrationGate {
    /// A closed gate
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// An already open gate, for callers with nothing to restore
    pub fn hydrated() -> Self {
        let gate = Self::new();
        gate.mark_hydrated();
        gate
    }

    pub fn is_hydrated(&self) -> bool {
        *self.flag.borrow()
    }

    /// Open the gate and run pending callbacks
    ///
    /// Returns false if the gate was already open.
    pub fn mark_hydrated(&self) -> bool {
        let callbacks = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            if self.is_hydrated() {
                return false;
            }
            self.flag.send_replace(true);
            std::mem::take(&mut *pending)
        };

        for callback in callbacks {
            callback();
        }
        true
    }

    /// Run `callback` once the gate is open
    pub fn on_hydrated<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            if !self.is_hydrated() {
                pending.push(Box::new(callback));
                return;
            }
        }
        callback();
    }

    /// Wait until the gate is open
    pub async fn wait(&self) {
        let mut rx = self.flag.subscribe();
        // The sender lives as long as `self`, so this only returns once open
        let _ = rx.wait_for(|hydrated| *hydrated).await;
    }

    /// Subscribe to the flag
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.flag.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_starts_closed() {
        let gate = HydrationGate::new();
        assert!(!gate.is_hydrated());
        assert!(HydrationGate::hydrated().is_hydrated());
    }

    #[test]
    fn test_mark_is_one_way() {
        let gate = HydrationGate::new();
        assert!(gate.mark_hydrated());
        assert!(!gate.mark_hydrated());
        assert!(gate.is_hydrated());
    }

    #[test]
    fn test_callback_deferred_until_transition() {
        let gate = HydrationGate::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        gate.on_hydrated(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        gate.mark_hydrated();
        gate.mark_hydrated();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_callback_runs_immediately_when_open() {
        let gate = HydrationGate::hydrated();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        gate.on_hydrated(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_wait_wakes_on_transition() {
        let gate = Arc::new(HydrationGate::new());

        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.wait().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        gate.mark_hydrated();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("gate should open")
            .unwrap();
    }
}
