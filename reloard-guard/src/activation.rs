//! Per-activation bookkeeping.
//!
//! One `Activation` is allocated when a navigation starts and dropped when
//! it completes or is abandoned. The stale flag lives here, not on any
//! shared route object, so overlapping navigations can never read or
//! clobber each other's tracking state.

/// Tracking state for a single route activation.
///
/// The flag answers one question: "was the record that will be displayed
/// sourced from the cache during this activation without being verified
/// fresh?" [`StaleRecordGuard::before_navigate`] arms it; the
/// identifier-resolution path clears it.
///
/// [`StaleRecordGuard::before_navigate`]: crate::guard::StaleRecordGuard::before_navigate
#[derive(Debug)]
pub struct Activation {
    needs_reload: bool,
}

impl Activation {
    /// A fresh activation is unarmed until `before_navigate` runs; a route
    /// that skips delegation to the base hook gets no reload tracking,
    /// matching the documented integrator contract.
    pub(crate) fn new() -> Self {
        Self {
            needs_reload: false,
        }
    }

    /// Whether the record still needs a forced reload before display.
    pub fn needs_reload(&self) -> bool {
        self.needs_reload
    }

    /// Assume the record is unverified until a fetch path proves otherwise.
    pub(crate) fn mark_unverified(&mut self) {
        self.needs_reload = true;
    }

    /// The record has been (or is about to be) explicitly refreshed.
    pub(crate) fn mark_verified(&mut self) {
        self.needs_reload = false;
    }
}
