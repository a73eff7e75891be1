//! Status derivation: the rules that turn configuration, topology and
//! reported connectivity into a [`StatusModel`] per node and an activity
//! flag per edge.
//!
//! The module is split along the four roles of the engine:
//!
//! - [`operational`]: the Local Status Deriver, a pure function of a
//!   node's own configuration, never of the graph
//! - [`runtime`]: the Runtime Propagator; roots read their reported
//!   connectivity, derived kinds aggregate their upstream neighbors
//! - [`edge_activity`]: the Edge Activity Annotator, kind-paired gating
//!   of the `animated` flag on originated edges
//! - [`publisher`]: the Status Publisher, the idempotent write funnel
//!   that bounds propagation
//!
//! Everything except the publisher is read-only over the store; the
//! functions here are deliberately total, absorbing missing neighbors and
//! empty configuration as conservative inactive results.

pub mod edge_activity;
pub mod operational;
pub mod publisher;
pub mod runtime;

pub use edge_activity::{desired_edge_activity, has_relevant_artifact};
pub use operational::derive_operational;
pub use publisher::PublishOutcome;
pub use runtime::{AggregationPolicy, derive_runtime};

use crate::store::TopologyStore;
use crate::types::{NodeId, StatusModel};

/// Evaluate one node: operational from its own config, runtime from its
/// reported connectivity or upstream statuses.
///
/// Returns `None` when the id no longer resolves: a node removed
/// mid-cascade is discarded, not an error.
pub fn evaluate(
    store: &TopologyStore,
    id: &NodeId,
    policy: AggregationPolicy,
) -> Option<StatusModel> {
    let record = store.get_node(id)?;
    let operational = derive_operational(&record.config);
    let upstream = store.upstream_statuses(id);
    let (runtime, source) = derive_runtime(&record.config, &upstream, policy);
    Some(StatusModel::new(operational, runtime, source))
}
