//! The stale-record guard: three lifecycle operations that keep a
//! navigation from displaying an unverified cached record.

use std::sync::Arc;

use reloard_core::{RecordKey, RecordStore, RouteRecord, StoreResult};

use crate::activation::Activation;

/// Reusable route behavior that forces a record reload after navigation,
/// exactly once per activation and only when needed.
///
/// The guard wraps a host [`RecordStore`] and exposes three operations
/// matching the host's route lifecycle: [`before_navigate`],
/// [`resolve_by_identifier`], and [`after_resolve`]. Routes layer their own
/// behavior on top through the `base` closure each hook accepts.
///
/// # Delegation contract
///
/// `before_navigate` must run for the guard's tracking to work. A route
/// that composes its own pre-navigation behavior must do so through the
/// `base` closure (whose return value is propagated unchanged) rather than
/// bypassing the hook; otherwise the activation is never armed and the
/// final hook will skip the forced reload.
///
/// # Failure semantics
///
/// The guard performs no error handling of its own. Any [`StoreError`]
/// raised by the underlying reload or fetch propagates unchanged to the
/// caller, i.e. to the host's navigation-failure handling. Nothing is
/// retried, caught, or suppressed.
///
/// [`before_navigate`]: Self::before_navigate
/// [`resolve_by_identifier`]: Self::resolve_by_identifier
/// [`after_resolve`]: Self::after_resolve
/// [`StoreError`]: reloard_core::StoreError
pub struct StaleRecordGuard<S: RecordStore> {
    store: Arc<S>,
}

impl<S: RecordStore> Clone for StaleRecordGuard<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RecordStore> StaleRecordGuard<S> {
    /// Create a guard over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The store this guard resolves records against.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Allocate tracking state for one navigation. The activation is owned
    /// by that navigation alone and discarded when it ends.
    pub fn begin_activation(&self) -> Activation {
        Activation::new()
    }

    /// First hook of an activation, before any data is resolved.
    ///
    /// Arms the stale flag ("this record is not yet verified fresh"), then
    /// invokes the route-specific `base` behavior and propagates its return
    /// value unchanged.
    pub fn before_navigate<R>(
        &self,
        activation: &mut Activation,
        base: impl FnOnce(&mut Activation) -> R,
    ) -> R {
        activation.mark_unverified();
        base(activation)
    }

    /// Identifier-based loader: resolve the record for `key`, guaranteed
    /// fresh.
    ///
    /// Prefers reloading the cached copy when one exists, so that other
    /// in-memory references holding the same handle observe the refreshed
    /// data; a brand-new fetch is used only on a cache miss. Either way the
    /// result has just come from the server, so the stale flag is cleared
    /// and [`after_resolve`](Self::after_resolve) will pass the record
    /// through untouched.
    pub async fn resolve_by_identifier(
        &self,
        activation: &mut Activation,
        key: &RecordKey,
    ) -> StoreResult<S::Record> {
        activation.mark_verified();
        match self.store.get_cached(key) {
            Some(cached) => {
                tracing::debug!(key = %key, "cached record found; reloading in place");
                cached.reload().await
            }
            None => {
                tracing::debug!(key = %key, "cache miss; fetching from server");
                self.store.fetch(key).await
            }
        }
    }

    /// Final hook of an activation, once the record to display is known.
    ///
    /// Invokes the route-specific `base` behavior first, discarding its
    /// synchronous return (its side effects have already run). Then, if the
    /// stale flag is still armed — the record was handed to the route
    /// directly instead of resolved by identifier — and the record has a
    /// persisted identifier, forces a reload and yields its result as the
    /// value the navigation proceeds with. Transient records and absent
    /// models pass through unchanged, as does anything already verified by
    /// [`resolve_by_identifier`](Self::resolve_by_identifier).
    pub async fn after_resolve<R>(
        &self,
        activation: &Activation,
        resolved: Option<S::Record>,
        base: impl FnOnce(&Activation, Option<&S::Record>) -> R,
    ) -> StoreResult<Option<S::Record>> {
        let _ = base(activation, resolved.as_ref());

        match resolved {
            Some(record) if activation.needs_reload() => match record.persisted_id() {
                Some(id) => {
                    tracing::debug!(id = %id, "record supplied directly; forcing reload");
                    Ok(Some(record.reload().await?))
                }
                None => {
                    tracing::trace!("transient record; no reload possible");
                    Ok(Some(record))
                }
            },
            other => Ok(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reloard_test_utils::MockStore;

    fn guard() -> StaleRecordGuard<MockStore> {
        StaleRecordGuard::new(Arc::new(MockStore::new()))
    }

    #[test]
    fn test_before_navigate_arms_flag_and_propagates_return() {
        let guard = guard();
        let mut activation = guard.begin_activation();

        let out = guard.before_navigate(&mut activation, |_| "route result");

        assert!(activation.needs_reload());
        assert_eq!(out, "route result");
    }

    #[test]
    fn test_before_navigate_base_sees_armed_flag() {
        let guard = guard();
        let mut activation = guard.begin_activation();

        guard.before_navigate(&mut activation, |act| {
            assert!(act.needs_reload());
        });
    }

    #[tokio::test]
    async fn test_resolve_by_identifier_reloads_cached_copy() {
        let store = Arc::new(MockStore::new());
        let cached = store.seed_cached_stale("course", "7", 1, 3);
        let guard = StaleRecordGuard::new(Arc::clone(&store));
        let mut activation = guard.begin_activation();
        activation.mark_unverified();

        let resolved = guard
            .resolve_by_identifier(&mut activation, &RecordKey::new("course", "7"))
            .await
            .unwrap();

        assert!(resolved.same_identity(&cached));
        assert_eq!(resolved.version(), 3);
        assert_eq!(resolved.reload_count(), 1);
        assert_eq!(store.fetch_count(), 0);
        assert!(!activation.needs_reload());
    }

    #[tokio::test]
    async fn test_resolve_by_identifier_fetches_on_cache_miss() {
        let store = Arc::new(MockStore::new());
        store.insert_server("course", "42", 5);
        let guard = StaleRecordGuard::new(Arc::clone(&store));
        let mut activation = guard.begin_activation();
        activation.mark_unverified();

        let resolved = guard
            .resolve_by_identifier(&mut activation, &RecordKey::new("course", "42"))
            .await
            .unwrap();

        assert_eq!(resolved.version(), 5);
        assert_eq!(resolved.reload_count(), 0);
        assert_eq!(store.fetch_count(), 1);
        assert!(!activation.needs_reload());
    }

    #[tokio::test]
    async fn test_resolve_by_identifier_clears_flag_even_on_failure() {
        let store = Arc::new(MockStore::new());
        let guard = StaleRecordGuard::new(Arc::clone(&store));
        let mut activation = guard.begin_activation();
        activation.mark_unverified();

        let missing = RecordKey::new("course", "404");
        let err = guard
            .resolve_by_identifier(&mut activation, &missing)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            reloard_core::StoreError::NotFound {
                type_name: "course".into(),
                id: "404".into(),
            }
        );
        assert!(!activation.needs_reload());
    }

    #[tokio::test]
    async fn test_after_resolve_passes_absent_model_through() {
        let guard = guard();
        let mut activation = guard.begin_activation();
        activation.mark_unverified();

        let out = guard
            .after_resolve(&activation, None, |_, _| ())
            .await
            .unwrap();

        assert!(out.is_none());
    }

    #[tokio::test]
    async fn test_after_resolve_runs_base_before_reload_decision() {
        let store = Arc::new(MockStore::new());
        let record = store.seed_cached("course", "9", 2);
        let guard = StaleRecordGuard::new(Arc::clone(&store));
        let mut activation = guard.begin_activation();
        activation.mark_unverified();

        let mut base_saw_reloads = None;
        let out = guard
            .after_resolve(&activation, Some(record.clone()), |_, resolved| {
                base_saw_reloads = resolved.map(reloard_test_utils::MockRecord::reload_count);
            })
            .await
            .unwrap()
            .unwrap();

        // Base ran against the unreloaded record; the forced reload came after.
        assert_eq!(base_saw_reloads, Some(0));
        assert_eq!(out.reload_count(), 1);
        assert!(out.same_identity(&record));
    }
}
