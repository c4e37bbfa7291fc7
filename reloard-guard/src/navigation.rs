//! Navigation pipeline composition.
//!
//! The host framework invokes the guard's hooks sequentially as part of a
//! single logical navigation. This module models that pipeline: a
//! [`Route`] supplies the route-specific overrides, a [`ModelSource`] says
//! how the navigation obtains its model, and [`run_navigation`] drives the
//! hooks in the fixed order, suspending until any forced reload completes.

use reloard_core::{RecordKey, RecordStore, StoreResult};

use crate::activation::Activation;
use crate::guard::StaleRecordGuard;

/// How a navigation obtains the record it will display.
#[derive(Debug, Clone)]
pub enum ModelSource<R> {
    /// URL-style entry: the route resolves its record through the
    /// identifier loader hook.
    ByIdentifier(RecordKey),

    /// Link-style entry: the navigation already carries the target record
    /// (or nothing), bypassing the identifier loader entirely. These are
    /// the records the guard exists to re-verify.
    Provided(Option<R>),
}

/// Route-specific behavior layered on top of the guard.
///
/// Both hooks default to no-ops; a route overrides only what it needs. The
/// pipeline composes each override with the guard's base behavior, so the
/// delegation contract documented on [`StaleRecordGuard`] is upheld by
/// construction when navigations run through [`run_navigation`].
pub trait Route<S: RecordStore>: Send + Sync {
    /// Runs inside the guard's first hook, after the stale flag is armed.
    fn before_navigate(&self, _activation: &mut Activation) {}

    /// Runs inside the guard's final hook, before any forced reload. The
    /// synchronous return is discarded; only side effects matter here.
    fn after_resolve(&self, _activation: &Activation, _resolved: Option<&S::Record>) {}
}

/// The no-override route.
impl<S: RecordStore> Route<S> for () {}

/// Drive one complete activation through the guard.
///
/// Allocates fresh per-activation state, invokes the hooks in the host's
/// fixed order, and resolves once the record the navigation will proceed
/// with is verified fresh. Dropping the returned future abandons the
/// activation along with its tracking state; there is nothing to clean up.
///
/// Store failures propagate unchanged, mirroring a host transition abort.
pub async fn run_navigation<S, R>(
    guard: &StaleRecordGuard<S>,
    route: &R,
    source: ModelSource<S::Record>,
) -> StoreResult<Option<S::Record>>
where
    S: RecordStore,
    R: Route<S>,
{
    let mut activation = guard.begin_activation();

    guard.before_navigate(&mut activation, |act| route.before_navigate(act));

    let resolved = match source {
        ModelSource::ByIdentifier(key) => {
            Some(guard.resolve_by_identifier(&mut activation, &key).await?)
        }
        ModelSource::Provided(record) => record,
    };

    guard
        .after_resolve(&activation, resolved, |act, rec| {
            route.after_resolve(act, rec)
        })
        .await
}
