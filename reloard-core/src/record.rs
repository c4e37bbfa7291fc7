//! The record capability a host data layer must expose.

use crate::error::StoreResult;
use crate::key::RecordId;
use async_trait::async_trait;

/// A record as seen by the route layer.
///
/// Implementations are expected to be cheap handles into the host store's
/// identity map: cloning a `RouteRecord` yields another handle to the same
/// logical record, and [`reload`](Self::reload) refreshes that shared state
/// in place rather than materializing an unrelated copy. This is what lets
/// other in-memory references observe the refreshed data.
#[async_trait]
pub trait RouteRecord: Clone + Send + Sync + Sized + 'static {
    /// The server-assigned identifier, or `None` for a transient record
    /// that was constructed locally and never saved.
    fn persisted_id(&self) -> Option<RecordId>;

    /// Re-fetch this record's data from the server, preserving local
    /// identity. Resolves to a handle to the same logical record.
    ///
    /// Callers must not invoke this on a transient record; stores are free
    /// to reject it with [`StoreError::NeverPersisted`].
    ///
    /// [`StoreError::NeverPersisted`]: crate::error::StoreError::NeverPersisted
    async fn reload(&self) -> StoreResult<Self>;
}
