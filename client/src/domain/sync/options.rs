//! Per-entity synchronisation settings.

/// How a controller treats add/update/remove requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationPolicy {
    /// Send the mutation, then refetch to adopt the canonical server state.
    #[default]
    PersistThenRefetch,
    /// Mutate the in-memory collection only; `submit` persists later.
    LocalOnly,
}

/// Which result wins when operations on one controller overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// A result is dropped once a later-issued operation has been applied.
    #[default]
    LastIssuedWins,
    /// Whatever resolves last overwrites the state.
    LastResolvedWins,
}

/// Synchronisation behaviour for one controller.
///
/// # Examples
/// ```
/// use client::domain::sync::{MutationPolicy, OrderingPolicy, SyncOptions};
///
/// let options = SyncOptions::default()
///     .with_mutation_policy(MutationPolicy::LocalOnly)
///     .with_ordering(OrderingPolicy::LastResolvedWins);
/// assert!(!options.guard_in_flight);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncOptions {
    /// Persist-then-refetch or local-only mutations.
    pub mutation_policy: MutationPolicy,
    /// Overlap resolution for results on the same controller.
    pub ordering: OrderingPolicy,
    /// Flip the visible state to `Loading` while a remote mutation runs.
    pub loading_on_mutation: bool,
    /// Reject new mutations while one is already in flight.
    pub guard_in_flight: bool,
}

impl SyncOptions {
    /// Replace the mutation policy.
    #[must_use]
    pub const fn with_mutation_policy(mut self, policy: MutationPolicy) -> Self {
        self.mutation_policy = policy;
        self
    }

    /// Replace the ordering policy.
    #[must_use]
    pub const fn with_ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = ordering;
        self
    }

    /// Toggle the full-screen loading state for remote mutations.
    #[must_use]
    pub const fn with_loading_on_mutation(mut self, enabled: bool) -> Self {
        self.loading_on_mutation = enabled;
        self
    }

    /// Toggle the duplicate-submission guard.
    #[must_use]
    pub const fn with_in_flight_guard(mut self, enabled: bool) -> Self {
        self.guard_in_flight = enabled;
        self
    }
}
