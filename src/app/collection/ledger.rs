//! Request stamping and cooperative abort
//!
//! Every fetch that goes to the network takes a [`RequestTicket`] carrying a
//! sequence number and an [`AbortToken`]. Issuing a newer ticket aborts the
//! previous one, and only the ticket holding the latest sequence number may
//! write collection state. A response that arrives for an older ticket is
//! dropped.

use tokio::sync::watch;
use tracing::debug;

/// Sender half of an abort signal
#[derive(Debug)]
pub struct AbortHandle {
    tx: watch::Sender<bool>,
}

/// Receiver half of an abort signal, passed into the network call
#[derive(Debug, Clone)]
pub struct AbortToken {
    rx: watch::Receiver<bool>,
}

/// Create a linked handle and token
pub fn abort_pair() -> (AbortHandle, AbortToken) {
    let (tx, rx) = watch::channel(false);
    (AbortHandle { tx }, AbortToken { rx })
}

impl AbortHandle {
    /// Mark the linked token aborted
    pub fn abort(&self) {
        self.tx.send_replace(true);
    }
}

impl AbortToken {
    /// Whether the request was aborted
    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the request is aborted; never resolves otherwise
    pub async fn aborted(mut self) {
        let closed = self.rx.wait_for(|aborted| *aborted).await.is_err();
        if closed {
            // Handle dropped without aborting: nothing can abort us any more
            std::future::pending::<()>().await;
        }
    }
}

/// A stamped network request
#[derive(Debug)]
pub struct RequestTicket {
    pub seq: u64,
    pub token: AbortToken,
}

#[derive(Debug)]
struct InFlight {
    seq: u64,
    abort: AbortHandle,
}

/// Per-collection sequence of issued requests
#[derive(Debug, Default)]
pub struct RequestLedger {
    issued: u64,
    in_flight: Option<InFlight>,
}

impl RequestLedger {
    /// Empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a network request, aborting any outstanding one
    pub fn issue(&mut self) -> RequestTicket {
        self.abort_in_flight();
        self.issued += 1;

        let (abort, token) = abort_pair();
        self.in_flight = Some(InFlight {
            seq: self.issued,
            abort,
        });

        RequestTicket {
            seq: self.issued,
            token,
        }
    }

    /// Record a request served without the network (cache hit)
    ///
    /// Returns true if an outstanding request was aborted as a result.
    pub fn supersede(&mut self) -> bool {
        self.issued += 1;
        self.abort_in_flight()
    }

    /// Whether `seq` is the latest issued request and still outstanding
    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.issued && self.in_flight.as_ref().is_some_and(|f| f.seq == seq)
    }

    /// Close out request `seq`; returns false if it was superseded
    pub fn complete(&mut self, seq: u64) -> bool {
        if self.is_current(seq) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Abort the outstanding request, if any; returns true if one was aborted
    pub fn abort_in_flight(&mut self) -> bool {
        match self.in_flight.take() {
            Some(previous) => {
                debug!("Aborting superseded request #{}", previous.seq);
                previous.abort.abort();
                true
            }
            None => false,
        }
    }

    /// Whether a request is outstanding
    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Sequence number of the most recently issued request
    pub fn latest(&self) -> u64 {
        self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_sequence_is_monotonic() {
        let mut ledger = RequestLedger::new();
        let first = ledger.issue();
        let second = ledger.issue();
        assert!(second.seq > first.seq);
        assert_eq!(ledger.latest(), second.seq);
    }

    #[test]
    fn test_newer_ticket_aborts_older() {
        let mut ledger = RequestLedger::new();
        let first = ledger.issue();
        let second = ledger.issue();

        assert!(first.token.is_aborted());
        assert!(!second.token.is_aborted());
        assert!(!ledger.is_current(first.seq));
        assert!(ledger.is_current(second.seq));
    }

    #[test]
    fn test_complete_only_latest() {
        let mut ledger = RequestLedger::new();
        let first = ledger.issue();
        let second = ledger.issue();

        assert!(!ledger.complete(first.seq));
        assert!(ledger.complete(second.seq));
        assert!(!ledger.has_in_flight());
        // Completing twice is a no-op
        assert!(!ledger.complete(second.seq));
    }

    #[test]
    fn test_supersede_aborts_in_flight() {
        let mut ledger = RequestLedger::new();
        let ticket = ledger.issue();

        assert!(ledger.supersede());
        assert!(ticket.token.is_aborted());
        assert!(!ledger.is_current(ticket.seq));
        assert!(!ledger.supersede());
    }

    #[tokio::test]
    async fn test_aborted_future_resolves() {
        let (handle, token) = abort_pair();
        let waiter = tokio::spawn(token.aborted());
        handle.abort();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("abort should wake the token")
            .unwrap();
    }

    #[tokio::test]
    async fn test_dropped_handle_never_resolves() {
        let (handle, token) = abort_pair();
        drop(handle);
        let result = tokio::time::timeout(Duration::from_millis(50), token.aborted()).await;
        assert!(result.is_err());
    }
}
