//! The Edge Activity Annotator.
//!
//! Edges originated by adapters and bridges carry an `animated` flag that
//! drives the visual data-flow animation. The flag is a conjunction of two
//! gates: the source node must be live, and its configuration must contain
//! a routing artifact that specifically targets the edge's destination
//! kind. A connected adapter with no northbound mappings animates nothing
//! toward the broker; adding one mapping flips the flag on the next
//! evaluation.

use crate::config::NodeConfig;
use crate::store::TopologyStore;
use crate::types::{EdgeId, NodeId, NodeKind};

/// Kind-paired artifact gate.
///
/// - Adapter → broker: at least one northbound mapping.
/// - Adapter → device: at least one southbound mapping.
/// - Bridge → broker: at least one remote topic filter (remote data pulled
///   into the local broker).
/// - Bridge → host: at least one local topic filter (local data forwarded
///   out).
/// - Every other pairing (combiner, group, …) is not yet wired and gates
///   to `false`.
#[must_use]
pub fn has_relevant_artifact(source: &NodeConfig, target_kind: NodeKind) -> bool {
    match (source, target_kind) {
        (NodeConfig::Adapter(adapter), NodeKind::EdgeBroker) => !adapter.northbound.is_empty(),
        (NodeConfig::Adapter(adapter), NodeKind::Device) => !adapter.southbound.is_empty(),
        (NodeConfig::Bridge(bridge), NodeKind::EdgeBroker) => !bridge.remote_filters.is_empty(),
        (NodeConfig::Bridge(bridge), NodeKind::Host) => !bridge.local_filters.is_empty(),
        _ => false,
    }
}

/// Compute the desired `animated` value for every outgoing edge of a node,
/// in edge-id order.
///
/// Read-only: the engine applies the results through the store's
/// write-if-changed primitive so unchanged edges trigger no downstream
/// re-renders. Nodes that do not originate edges, and edges whose target
/// no longer resolves, yield nothing.
#[must_use]
pub fn desired_edge_activity(store: &TopologyStore, id: &NodeId) -> Vec<(EdgeId, bool)> {
    let Some(source) = store.get_node(id) else {
        return Vec::new();
    };
    if !source.kind().originates_edges() {
        return Vec::new();
    }
    let is_connected = source.status.runtime.is_active();
    store
        .outgoing_edges(id)
        .into_iter()
        .filter_map(|edge| {
            let target = store.get_node(&edge.target)?;
            let animated = is_connected && has_relevant_artifact(&source.config, target.kind());
            Some((edge.id.clone(), animated))
        })
        .collect()
}
