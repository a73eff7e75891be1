//! The Runtime Propagator.
//!
//! Runtime status is directly knowable only for root kinds: adapters,
//! bridges and the broker node, which carry an externally reported
//! [`ConnectionReport`](crate::config::ConnectionReport). Every other kind
//! derives its runtime from the published statuses of its dependency
//! neighbors: single-parent kinds inherit, combiners aggregate under a
//! configurable policy. A derived node with no upstream neighbor is
//! conservatively inactive, never unknown.
//!
//! The propagator reads the *last published* status of each neighbor. A
//! stale read (neighbor not yet re-evaluated this round) is acceptable and
//! self-corrects on the neighbor's next publish; convergence is the settle
//! loop's concern, not this module's.

use serde::{Deserialize, Serialize};

use crate::config::{ConnectionReport, ConnectionState, NodeConfig, RuntimeState};
use crate::types::{RuntimeStatus, StatusModel, StatusSource};

/// Aggregation rule for multi-parent derived kinds (combiners).
///
/// The default is [`AnyActive`](Self::AnyActive): a combiner is considered
/// live the moment at least one of the streams it consumes is live, since
/// it can still usefully combine partial data. The stricter policies are
/// selectable through the engine settings for deployments that treat a
/// partially-fed combiner as down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationPolicy {
    /// Active iff at least one upstream neighbor is active.
    #[default]
    AnyActive,
    /// Active iff every upstream neighbor is active.
    AllActive,
    /// Active iff strictly more than half of the upstream neighbors are
    /// active.
    Majority,
}

impl AggregationPolicy {
    /// Fold upstream runtime statuses under this policy. Empty input is
    /// conservatively inactive under every policy.
    #[must_use]
    pub fn aggregate(&self, upstream: &[StatusModel]) -> RuntimeStatus {
        if upstream.is_empty() {
            return RuntimeStatus::Inactive;
        }
        let live = upstream
            .iter()
            .filter(|status| status.runtime.is_active())
            .count();
        let active = match self {
            AggregationPolicy::AnyActive => live > 0,
            AggregationPolicy::AllActive => live == upstream.len(),
            AggregationPolicy::Majority => live * 2 > upstream.len(),
        };
        RuntimeStatus::from_bool(active)
    }
}

/// Derive a node's runtime status and its source.
///
/// `upstream` holds the published statuses of the node's dependency
/// neighbors in deterministic order; it is ignored for root kinds, which
/// judge liveness from their own reported connectivity instead.
#[must_use]
pub fn derive_runtime(
    config: &NodeConfig,
    upstream: &[StatusModel],
    policy: AggregationPolicy,
) -> (RuntimeStatus, StatusSource) {
    match config {
        NodeConfig::Adapter(_) | NodeConfig::Bridge(_) | NodeConfig::EdgeBroker(_) => (
            reported_runtime(config.connection_report()),
            StatusSource::Own,
        ),
        NodeConfig::Device(_)
        | NodeConfig::Host(_)
        | NodeConfig::Listener(_)
        | NodeConfig::AssetManager => (inherit_single(upstream), StatusSource::Derived),
        NodeConfig::Combiner(_) => (policy.aggregate(upstream), StatusSource::Derived),
        NodeConfig::Group => (RuntimeStatus::Inactive, StatusSource::Derived),
    }
}

/// Root-kind rule: connected, or started on a protocol with no persistent
/// session concept. A missing report is conservatively inactive.
fn reported_runtime(report: Option<ConnectionReport>) -> RuntimeStatus {
    let Some(report) = report else {
        return RuntimeStatus::Inactive;
    };
    let live = match report.connection {
        ConnectionState::Connected => true,
        ConnectionState::Stateless => report.runtime == RuntimeState::Started,
        ConnectionState::Disconnected | ConnectionState::Unknown => false,
    };
    RuntimeStatus::from_bool(live)
}

/// Single-parent rule: inherit the one upstream neighbor's runtime,
/// inactive when none exists. Malformed topologies with several parents
/// inherit from the first neighbor in id order.
fn inherit_single(upstream: &[StatusModel]) -> RuntimeStatus {
    upstream
        .first()
        .map(|status| status.runtime)
        .unwrap_or(RuntimeStatus::Inactive)
}
