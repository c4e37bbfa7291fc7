//! RELOARD Guard - Forced Record Reload After Navigation
//!
//! In a complex system the server mutates records in manifold ways: a
//! change to one record may change the state of another, and a record may
//! be deleted by another user without notice. The client cache cannot
//! validate any of that on its own, so this crate aggressively reloads the
//! record a navigation is about to display.
//!
//! Naively reloading in the final lifecycle hook would double-load records
//! that were just fetched by identifier, so [`StaleRecordGuard`] tracks,
//! per activation, whether the record came out of the cache unverified and
//! forces a reload exactly once, and only when needed.
//!
//! # Hook composition
//!
//! Each guard operation accepts the route-specific behavior as an explicit
//! `base` closure and composes with it; see [`StaleRecordGuard`] for the
//! delegation contract. [`navigation::run_navigation`] drives the three
//! hooks in the host pipeline's fixed order.

pub mod activation;
pub mod guard;
pub mod navigation;

pub use activation::Activation;
pub use guard::StaleRecordGuard;
pub use navigation::{run_navigation, ModelSource, Route};
