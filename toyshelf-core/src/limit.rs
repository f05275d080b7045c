//! Result Limiter.
//!
//! Only list-all is capped. There is no offset or cursor, so nothing past the cap
//! is reachable through list-all; every other read returns the full match set.

/// Documents returned by list-all when not configured otherwise.
pub const DEFAULT_LIST_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultLimiter {
    list_all_cap: usize,
}

impl ResultLimiter {
    pub fn new(list_all_cap: usize) -> Self {
        ResultLimiter { list_all_cap }
    }

    /// Cap applied after sorting for list-all.
    pub fn list_all(&self) -> Option<usize> {
        Some(self.list_all_cap)
    }

    /// All other reads.
    pub fn unbounded(&self) -> Option<usize> {
        None
    }
}

impl Default for ResultLimiter {
    fn default() -> Self {
        ResultLimiter::new(DEFAULT_LIST_LIMIT)
    }
}
