//! The "already allocated" latch.

use nodegrid_core::LatchPolicy;

/// Whether the initial pool has been (or is being) built.
///
/// The latch is set when an allocation attempt starts, before any source
/// runs. With [`LatchPolicy::Sticky`] it is never cleared, so a failed first
/// attempt also suppresses every later one. With
/// [`LatchPolicy::ResetOnFailure`] a failed attempt clears it again.
///
/// Not synchronized: the owning allocator is driven by a single caller.
#[derive(Debug, Clone, Default)]
pub struct AllocationState {
    allocated: bool,
    policy: LatchPolicy,
    attempts: u32,
    committed_by: Option<&'static str>,
}

impl AllocationState {
    pub fn new(policy: LatchPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Start an attempt. Returns `false` if the latch was already set, in
    /// which case the caller must do nothing.
    pub fn begin(&mut self) -> bool {
        if self.allocated {
            return false;
        }
        self.allocated = true;
        self.attempts += 1;
        true
    }

    /// Record that `source` supplied the pool.
    pub fn committed(&mut self, source: &'static str) {
        self.committed_by = Some(source);
    }

    /// Record a failed attempt.
    pub fn failed(&mut self) {
        if self.policy == LatchPolicy::ResetOnFailure {
            self.allocated = false;
        }
    }

    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    pub fn policy(&self) -> LatchPolicy {
        self.policy
    }

    /// Number of attempts that actually ran the discovery chain.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Source that populated the pool, if any attempt succeeded.
    pub fn committed_by(&self) -> Option<&'static str> {
        self.committed_by
    }

    /// Return to the unallocated state.
    ///
    /// Only for tests and for a launcher that discards its registry and
    /// starts over; calling it with a populated registry in place would
    /// commit a second pool on top of the first.
    pub fn reset(&mut self) {
        self.allocated = false;
        self.committed_by = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_is_exactly_once() {
        let mut state = AllocationState::default();
        assert!(!state.is_allocated());
        assert!(state.begin());
        assert!(state.is_allocated());
        assert!(!state.begin());
        assert_eq!(state.attempts(), 1);
    }

    #[test]
    fn sticky_survives_failure() {
        let mut state = AllocationState::new(LatchPolicy::Sticky);
        assert!(state.begin());
        state.failed();
        assert!(!state.begin());
    }

    #[test]
    fn reset_on_failure_allows_retry() {
        let mut state = AllocationState::new(LatchPolicy::ResetOnFailure);
        assert!(state.begin());
        state.failed();
        assert!(state.begin());
        assert_eq!(state.attempts(), 2);
    }

    #[test]
    fn reset_clears_latch_and_source() {
        let mut state = AllocationState::default();
        state.begin();
        state.committed("local");
        assert_eq!(state.committed_by(), Some("local"));

        state.reset();
        assert!(!state.is_allocated());
        assert!(state.committed_by().is_none());
        assert!(state.begin());
    }
}
