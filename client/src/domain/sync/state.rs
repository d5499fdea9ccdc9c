//! Observable state slot with request sequencing.
//!
//! The slot is a `tokio::sync::watch` channel. Its write lock is the only
//! place state changes happen, which gives each controller a single-writer
//! discipline without a separate mutex. Every remote operation takes a
//! [`Ticket`]; under [`OrderingPolicy::LastIssuedWins`] a result is applied
//! only if no later ticket has been applied already.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::warn;

use super::OrderingPolicy;
use crate::domain::RemoteResult;

/// Monotonic sequence number handed out when an operation is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    /// Raw sequence number, starting at 1.
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// Watchable `RemoteResult` slot.
#[derive(Debug)]
pub struct ObservableState<T> {
    sender: watch::Sender<RemoteResult<T>>,
    issued: AtomicU64,
    applied: AtomicU64,
    ordering: OrderingPolicy,
}

impl<T: Clone> ObservableState<T> {
    /// Create a slot in the `Loading` state.
    #[must_use]
    pub fn new(ordering: OrderingPolicy) -> Self {
        let (sender, _receiver) = watch::channel(RemoteResult::Loading);
        Self {
            sender,
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
            ordering,
        }
    }

    /// Current state, cloned.
    #[must_use]
    pub fn snapshot(&self) -> RemoteResult<T> {
        self.sender.borrow().clone()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RemoteResult<T>> {
        self.sender.subscribe()
    }

    /// Issue the next ticket.
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Publish `Loading` for a freshly issued ticket.
    pub fn show_loading(&self) {
        self.sender.send_replace(RemoteResult::Loading);
    }

    /// Apply the result of `ticket`, honouring the ordering policy.
    ///
    /// Returns `false` when the result was stale and discarded.
    pub fn settle(&self, ticket: Ticket, next: RemoteResult<T>) -> bool {
        let ordering = self.ordering;
        let applied = &self.applied;
        let accepted = self.sender.send_if_modified(move |current| {
            let newest = applied.load(Ordering::SeqCst);
            if ordering == OrderingPolicy::LastIssuedWins && ticket.0 < newest {
                return false;
            }
            applied.store(newest.max(ticket.0), Ordering::SeqCst);
            *current = next;
            true
        });
        if !accepted {
            warn!(
                sequence = ticket.0,
                "discarded stale result; a later operation already settled"
            );
        }
        accepted
    }

    /// Edit the success payload in place. Returns `None` when nothing is
    /// loaded.
    pub fn modify_success<R>(&self, edit: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut outcome = None;
        self.sender.send_if_modified(|current| match current {
            RemoteResult::Success(value) => {
                outcome = Some(edit(value));
                true
            }
            RemoteResult::Loading | RemoteResult::Error(_) => false,
        });
        outcome
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for ticket ordering.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn starts_loading_and_issues_increasing_tickets() {
        let state = ObservableState::<u8>::new(OrderingPolicy::LastIssuedWins);
        assert!(state.snapshot().is_loading());
        let first = state.issue();
        let second = state.issue();
        assert!(first < second);
        assert_eq!(first.sequence(), 1);
    }

    #[rstest]
    fn last_issued_wins_discards_older_results() {
        let state = ObservableState::new(OrderingPolicy::LastIssuedWins);
        let older = state.issue();
        let newer = state.issue();

        assert!(state.settle(newer, RemoteResult::Success("newer")));
        assert!(!state.settle(older, RemoteResult::Success("older")));
        assert_eq!(state.snapshot(), RemoteResult::Success("newer"));
    }

    #[rstest]
    fn last_resolved_wins_applies_everything() {
        let state = ObservableState::new(OrderingPolicy::LastResolvedWins);
        let older = state.issue();
        let newer = state.issue();

        assert!(state.settle(newer, RemoteResult::Success("newer")));
        assert!(state.settle(older, RemoteResult::Success("older")));
        assert_eq!(state.snapshot(), RemoteResult::Success("older"));
    }

    #[rstest]
    fn older_result_applies_while_newer_is_still_pending() {
        let state = ObservableState::new(OrderingPolicy::LastIssuedWins);
        let older = state.issue();
        let newer = state.issue();

        assert!(state.settle(older, RemoteResult::Success(1)));
        assert!(state.settle(newer, RemoteResult::Success(2)));
        assert_eq!(state.snapshot(), RemoteResult::Success(2));
    }

    #[rstest]
    fn modify_success_ignores_unloaded_state() {
        let state = ObservableState::<Vec<u8>>::new(OrderingPolicy::LastIssuedWins);
        assert_eq!(state.modify_success(|items| items.push(1)), None);

        let ticket = state.issue();
        state.settle(ticket, RemoteResult::Success(vec![]));
        assert_eq!(state.modify_success(|items| items.push(1)), Some(()));
        assert_eq!(state.snapshot(), RemoteResult::Success(vec![1]));
    }

    #[rstest]
    #[tokio::test]
    async fn subscribers_observe_settled_results() {
        let state = ObservableState::new(OrderingPolicy::LastIssuedWins);
        let mut receiver = state.subscribe();
        let ticket = state.issue();
        state.settle(ticket, RemoteResult::<u8>::Error("boom".to_owned()));

        receiver.changed().await.expect("sender alive");
        assert_eq!(
            *receiver.borrow_and_update(),
            RemoteResult::Error("boom".to_owned())
        );
    }
}
