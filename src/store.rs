//! Owned arena of topology nodes and edges.
//!
//! [`TopologyStore`] is the single shared mutable resource of the engine:
//! every node and edge record lives here, keyed by its stable id. All reads
//! go through the accessor methods; all writes are funneled through the
//! crate-internal mutation primitives, which the
//! [`TopologyEngine`](crate::engine::TopologyEngine) alone drives. The
//! primitives are write-if-changed: a mutation that leaves a record
//! structurally equal issues no write and bumps no version, which is what
//! bounds propagation (see the Status Publisher).
//!
//! Ownership discipline: a node's evaluation is the only writer of its own
//! `status`, and of the `animated` flag of the edges it originates. No two
//! nodes ever write the same field, so the store needs no merge or conflict
//! resolution.

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::config::{ConnectionReport, NodeConfig};
use crate::types::{EdgeId, NodeId, NodeKind, StatusModel};

/// A node and the engine-owned state attached to it.
#[derive(Clone, Debug)]
pub struct NodeRecord {
    pub id: NodeId,
    pub config: NodeConfig,
    /// Last published status; written only by the Status Publisher.
    pub status: StatusModel,
    config_version: u64,
    status_version: u64,
}

impl NodeRecord {
    fn new(id: NodeId, config: NodeConfig) -> Self {
        let status = StatusModel::initial(config.kind());
        Self {
            id,
            config,
            status,
            config_version: 1,
            status_version: 1,
        }
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.config.kind()
    }

    /// Version counter bumped whenever `config` effectively changes.
    #[must_use]
    pub fn config_version(&self) -> u64 {
        self.config_version
    }

    /// Version counter bumped whenever `status` effectively changes.
    #[must_use]
    pub fn status_version(&self) -> u64 {
        self.status_version
    }
}

/// A directed edge between two topology nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeRecord {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    /// Optional handle label distinguishing multiple connection points on
    /// the source node.
    pub handle: Option<String>,
    /// Whether the edge currently carries live, configured traffic.
    /// Written only by the Edge Activity Annotator of the source node.
    pub animated: bool,
}

/// Errors raised by explicit store mutations.
///
/// The propagation core itself is total and never raises these; they
/// surface only when the surrounding application passes an id the store
/// cannot resolve, or violates the kind discipline.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("unknown node: {id}")]
    #[diagnostic(
        code(topolight::store::unknown_node),
        help("The node may have been removed; re-read the topology before mutating.")
    )]
    UnknownNode { id: NodeId },

    #[error("unknown edge: {id}")]
    #[diagnostic(code(topolight::store::unknown_edge))]
    UnknownEdge { id: EdgeId },

    #[error("duplicate node id: {id}")]
    #[diagnostic(
        code(topolight::store::duplicate_node),
        help("Node ids must be unique; remove the existing node first.")
    )]
    DuplicateNode { id: NodeId },

    #[error("duplicate edge id: {id}")]
    #[diagnostic(code(topolight::store::duplicate_edge))]
    DuplicateEdge { id: EdgeId },

    #[error("edge {edge} references missing endpoint {node}")]
    #[diagnostic(
        code(topolight::store::missing_endpoint),
        help("Both endpoints of an edge must be inserted before the edge.")
    )]
    MissingEndpoint { edge: EdgeId, node: NodeId },

    #[error("config kind {got} does not match node {id} of kind {expected}")]
    #[diagnostic(
        code(topolight::store::kind_mismatch),
        help("A node's kind is fixed at insertion; replace the node to change it.")
    )]
    KindMismatch {
        id: NodeId,
        expected: NodeKind,
        got: NodeKind,
    },

    #[error("node {id} of kind {kind} does not accept connection reports")]
    #[diagnostic(
        code(topolight::store::not_a_root_kind),
        help("Only adapters, bridges and the broker node report connectivity.")
    )]
    NotARootKind { id: NodeId, kind: NodeKind },
}

/// The owned node/edge arena.
#[derive(Debug, Default)]
pub struct TopologyStore {
    nodes: FxHashMap<NodeId, NodeRecord>,
    edges: FxHashMap<EdgeId, EdgeRecord>,
    outgoing: FxHashMap<NodeId, Vec<EdgeId>>,
    incoming: FxHashMap<NodeId, Vec<EdgeId>>,
}

impl TopologyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Read API
    // ------------------------------------------------------------------

    pub fn get_node(&self, id: &NodeId) -> Option<&NodeRecord> {
        self.nodes.get(id)
    }

    pub fn get_edge(&self, id: &EdgeId) -> Option<&EdgeRecord> {
        self.edges.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All node ids, sorted for deterministic iteration.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Outgoing edges of a node, sorted by edge id.
    pub fn outgoing_edges(&self, id: &NodeId) -> Vec<&EdgeRecord> {
        let mut edges: Vec<&EdgeRecord> = self
            .outgoing
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|eid| self.edges.get(eid))
            .collect();
        edges.sort_by(|a, b| a.id.cmp(&b.id));
        edges
    }

    /// Incoming edges of a node, sorted by edge id.
    pub fn incoming_edges(&self, id: &NodeId) -> Vec<&EdgeRecord> {
        let mut edges: Vec<&EdgeRecord> = self
            .incoming
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|eid| self.edges.get(eid))
            .collect();
        edges.sort_by(|a, b| a.id.cmp(&b.id));
        edges
    }

    /// The nodes whose published status `id` reads when deriving its own
    /// runtime status, sorted and deduplicated.
    ///
    /// Most derived kinds read the sources of their incoming edges. A
    /// listener attaches *into* the broker (listener → broker edges), so it
    /// reads the targets of its outgoing edges instead. Root kinds and
    /// groups read nothing.
    pub fn dependency_neighbors(&self, id: &NodeId) -> Vec<NodeId> {
        let Some(record) = self.nodes.get(id) else {
            return Vec::new();
        };
        let mut neighbors: Vec<NodeId> = match record.kind() {
            NodeKind::Device | NodeKind::Host | NodeKind::AssetManager | NodeKind::Combiner => self
                .incoming_edges(id)
                .into_iter()
                .map(|edge| edge.source.clone())
                .collect(),
            NodeKind::Listener => self
                .outgoing_edges(id)
                .into_iter()
                .map(|edge| edge.target.clone())
                .collect(),
            NodeKind::Adapter | NodeKind::Bridge | NodeKind::EdgeBroker | NodeKind::Group => {
                Vec::new()
            }
        };
        neighbors.sort();
        neighbors.dedup();
        neighbors
    }

    /// The nodes that read `id`'s published status, sorted and
    /// deduplicated. This is the inverse of
    /// [`dependency_neighbors`](Self::dependency_neighbors) and drives
    /// invalidation.
    pub fn dependents_of(&self, id: &NodeId) -> Vec<NodeId> {
        let mut dependents: Vec<NodeId> = Vec::new();
        for edge in self.outgoing_edges(id) {
            if let Some(target) = self.nodes.get(&edge.target) {
                if matches!(
                    target.kind(),
                    NodeKind::Device | NodeKind::Host | NodeKind::AssetManager | NodeKind::Combiner
                ) {
                    dependents.push(target.id.clone());
                }
            }
        }
        for edge in self.incoming_edges(id) {
            if let Some(source) = self.nodes.get(&edge.source) {
                if source.kind() == NodeKind::Listener {
                    dependents.push(source.id.clone());
                }
            }
        }
        dependents.sort();
        dependents.dedup();
        dependents
    }

    /// Published statuses of `id`'s dependency neighbors, in neighbor-id
    /// order. Neighbors that no longer resolve are skipped, not errors.
    pub fn upstream_statuses(&self, id: &NodeId) -> Vec<StatusModel> {
        self.dependency_neighbors(id)
            .iter()
            .filter_map(|nid| self.nodes.get(nid))
            .map(|record| record.status)
            .collect()
    }

    // ------------------------------------------------------------------
    // Mutation primitives (crate-internal; the engine is the API surface)
    // ------------------------------------------------------------------

    pub(crate) fn insert_node(&mut self, id: NodeId, config: NodeConfig) -> Result<(), StoreError> {
        if self.nodes.contains_key(&id) {
            return Err(StoreError::DuplicateNode { id });
        }
        tracing::debug!(node = %id, kind = %config.kind(), "node inserted");
        self.nodes.insert(id.clone(), NodeRecord::new(id, config));
        Ok(())
    }

    /// Remove a node together with its incident edges. Returns the removed
    /// record and edges so the caller can invalidate the survivors.
    pub(crate) fn remove_node(
        &mut self,
        id: &NodeId,
    ) -> Result<(NodeRecord, Vec<EdgeRecord>), StoreError> {
        let record = self
            .nodes
            .remove(id)
            .ok_or_else(|| StoreError::UnknownNode { id: id.clone() })?;
        let mut incident: Vec<EdgeId> = Vec::new();
        incident.extend(self.outgoing.remove(id).unwrap_or_default());
        incident.extend(self.incoming.remove(id).unwrap_or_default());
        incident.sort();
        incident.dedup();
        let mut removed_edges = Vec::new();
        for eid in incident {
            if let Some(edge) = self.edges.remove(&eid) {
                self.unlink_edge_indexes(&edge);
                removed_edges.push(edge);
            }
        }
        tracing::debug!(node = %id, edges = removed_edges.len(), "node removed");
        Ok((record, removed_edges))
    }

    pub(crate) fn insert_edge(&mut self, edge: EdgeRecord) -> Result<(), StoreError> {
        if self.edges.contains_key(&edge.id) {
            return Err(StoreError::DuplicateEdge { id: edge.id });
        }
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(StoreError::MissingEndpoint {
                    edge: edge.id.clone(),
                    node: endpoint.clone(),
                });
            }
        }
        tracing::debug!(edge = %edge.id, source = %edge.source, target = %edge.target, "edge inserted");
        self.outgoing
            .entry(edge.source.clone())
            .or_default()
            .push(edge.id.clone());
        self.incoming
            .entry(edge.target.clone())
            .or_default()
            .push(edge.id.clone());
        self.edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    pub(crate) fn remove_edge(&mut self, id: &EdgeId) -> Result<EdgeRecord, StoreError> {
        let edge = self
            .edges
            .remove(id)
            .ok_or_else(|| StoreError::UnknownEdge { id: id.clone() })?;
        self.unlink_edge_indexes(&edge);
        tracing::debug!(edge = %id, "edge removed");
        Ok(edge)
    }

    fn unlink_edge_indexes(&mut self, edge: &EdgeRecord) {
        if let Some(out) = self.outgoing.get_mut(&edge.source) {
            out.retain(|eid| eid != &edge.id);
        }
        if let Some(inc) = self.incoming.get_mut(&edge.target) {
            inc.retain(|eid| eid != &edge.id);
        }
    }

    /// Replace a node's configuration. Write-if-changed: returns `true`
    /// and bumps the config version only when the payload actually differs.
    pub(crate) fn update_config(
        &mut self,
        id: &NodeId,
        config: NodeConfig,
    ) -> Result<bool, StoreError> {
        let record = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownNode { id: id.clone() })?;
        if record.config.kind() != config.kind() {
            return Err(StoreError::KindMismatch {
                id: id.clone(),
                expected: record.config.kind(),
                got: config.kind(),
            });
        }
        if record.config == config {
            return Ok(false);
        }
        record.config = config;
        record.config_version = record.config_version.saturating_add(1);
        tracing::debug!(node = %id, version = record.config_version, "config updated");
        Ok(true)
    }

    /// Merge a fresh connectivity report into a root node's payload.
    pub(crate) fn apply_connection_report(
        &mut self,
        id: &NodeId,
        report: ConnectionReport,
    ) -> Result<bool, StoreError> {
        let record = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownNode { id: id.clone() })?;
        if record.config.connection_report() == Some(report) {
            return Ok(false);
        }
        if !record.config.set_connection_report(report) {
            return Err(StoreError::NotARootKind {
                id: id.clone(),
                kind: record.kind(),
            });
        }
        record.config_version = record.config_version.saturating_add(1);
        tracing::debug!(node = %id, ?report, "connection report applied");
        Ok(true)
    }

    /// Publish a freshly computed status. Write-if-changed: a structurally
    /// equal model issues no write and bumps no version.
    pub(crate) fn publish_status(
        &mut self,
        id: &NodeId,
        status: StatusModel,
    ) -> Result<bool, StoreError> {
        let record = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownNode { id: id.clone() })?;
        if record.status == status {
            return Ok(false);
        }
        record.status = status;
        record.status_version = record.status_version.saturating_add(1);
        Ok(true)
    }

    /// Rewrite an edge's activity flag. Write-if-changed.
    pub(crate) fn set_edge_animated(
        &mut self,
        id: &EdgeId,
        animated: bool,
    ) -> Result<bool, StoreError> {
        let edge = self
            .edges
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownEdge { id: id.clone() })?;
        if edge.animated == animated {
            return Ok(false);
        }
        edge.animated = animated;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdapterConfig, DeviceConfig, EdgeBrokerConfig, ListenerConfig};
    use crate::types::{OperationalStatus, RuntimeStatus, StatusSource};

    fn edge(id: &str, source: &str, target: &str) -> EdgeRecord {
        EdgeRecord {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            handle: None,
            animated: false,
        }
    }

    fn seeded_store() -> TopologyStore {
        let mut store = TopologyStore::new();
        store
            .insert_node("a1".into(), NodeConfig::Adapter(AdapterConfig::new("opcua")))
            .unwrap();
        store
            .insert_node("d1".into(), NodeConfig::Device(DeviceConfig::new()))
            .unwrap();
        store
            .insert_node(
                "broker".into(),
                NodeConfig::EdgeBroker(EdgeBrokerConfig::new()),
            )
            .unwrap();
        store
            .insert_node(
                "l1".into(),
                NodeConfig::Listener(ListenerConfig::new("0.0.0.0", 1883, "tcp")),
            )
            .unwrap();
        store.insert_edge(edge("e1", "a1", "d1")).unwrap();
        store.insert_edge(edge("e2", "a1", "broker")).unwrap();
        store.insert_edge(edge("e3", "l1", "broker")).unwrap();
        store
    }

    #[test]
    fn dependency_direction_per_kind() {
        let store = seeded_store();
        // Device reads the source of its incoming edge.
        assert_eq!(
            store.dependency_neighbors(&"d1".into()),
            vec![NodeId::from("a1")]
        );
        // Listener reads the target of its outgoing edge.
        assert_eq!(
            store.dependency_neighbors(&"l1".into()),
            vec![NodeId::from("broker")]
        );
        // Root kinds read nothing.
        assert!(store.dependency_neighbors(&"a1".into()).is_empty());
        assert!(store.dependency_neighbors(&"broker".into()).is_empty());
    }

    #[test]
    fn dependents_are_the_inverse_relation() {
        let store = seeded_store();
        assert_eq!(store.dependents_of(&"a1".into()), vec![NodeId::from("d1")]);
        assert_eq!(
            store.dependents_of(&"broker".into()),
            vec![NodeId::from("l1")]
        );
        assert!(store.dependents_of(&"d1".into()).is_empty());
    }

    #[test]
    fn publish_status_is_write_if_changed() {
        let mut store = seeded_store();
        let id: NodeId = "a1".into();
        let before = store.get_node(&id).unwrap().status_version();
        let fresh = StatusModel::new(
            OperationalStatus::Active,
            RuntimeStatus::Active,
            StatusSource::Own,
        );
        assert!(store.publish_status(&id, fresh).unwrap());
        assert_eq!(store.get_node(&id).unwrap().status_version(), before + 1);
        // Same model again: no write, no bump.
        assert!(!store.publish_status(&id, fresh).unwrap());
        assert_eq!(store.get_node(&id).unwrap().status_version(), before + 1);
    }

    #[test]
    fn remove_node_drops_incident_edges() {
        let mut store = seeded_store();
        let (_, removed) = store.remove_node(&"a1".into()).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(store.get_edge(&"e1".into()).is_none());
        assert!(store.get_edge(&"e2".into()).is_none());
        assert!(store.get_edge(&"e3".into()).is_some());
        assert!(store.dependency_neighbors(&"d1".into()).is_empty());
    }

    #[test]
    fn edge_requires_known_endpoints() {
        let mut store = seeded_store();
        let err = store.insert_edge(edge("e9", "a1", "ghost")).unwrap_err();
        assert!(matches!(err, StoreError::MissingEndpoint { .. }));
    }

    #[test]
    fn kind_is_fixed_after_insertion() {
        let mut store = seeded_store();
        let err = store
            .update_config(&"d1".into(), NodeConfig::Group)
            .unwrap_err();
        assert!(matches!(err, StoreError::KindMismatch { .. }));
    }
}
