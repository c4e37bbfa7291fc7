//! RELOARD Core - Types and Host-Framework Seams
//!
//! Defines the vocabulary the stale-record guard speaks: record keys,
//! the record and store capabilities a host data layer must expose, and
//! the store-side error taxonomy that passes through the guard unchanged.
//! The guard itself lives in reloard-guard.

pub mod error;
pub mod key;
pub mod record;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use key::{RecordId, RecordKey, TypeName};
pub use record::RouteRecord;
pub use store::RecordStore;
