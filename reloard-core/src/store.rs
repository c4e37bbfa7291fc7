//! The data-access capability a host data layer must expose.

use crate::error::StoreResult;
use crate::key::RecordKey;
use crate::record::RouteRecord;
use async_trait::async_trait;

/// Record cache plus server transport, as exposed by the host data layer.
///
/// The two operations are deliberately asymmetric: [`get_cached`] is a
/// synchronous, cache-only lookup that never touches the network, while
/// [`fetch`] is always a server round-trip. The guard relies on that split
/// to decide between reloading a cached handle and fetching fresh.
///
/// [`get_cached`]: Self::get_cached
/// [`fetch`]: Self::fetch
#[async_trait]
pub trait RecordStore: Send + Sync {
    type Record: RouteRecord;

    /// Look up a record in the local cache. Never touches the server;
    /// returns `None` on a cache miss.
    fn get_cached(&self, key: &RecordKey) -> Option<Self::Record>;

    /// Fetch a record from the server, populating the cache.
    async fn fetch(&self, key: &RecordKey) -> StoreResult<Self::Record>;
}
