//! The incremental invalidation ledger.
//!
//! Each node's evaluation reads a declared set of inputs: its own
//! configuration, the published status of its dependency neighbors, and
//! (for edge originators) the set of edges it owns. The ledger records the
//! versions of those inputs at the node's last evaluation; a dirty node
//! whose recorded versions still match is skipped without re-derivation.
//! This is a small build-system-style invalidation graph, not a hook
//! system: mutations mark nodes dirty, `settle` drains them in rounds.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::store::TopologyStore;
use crate::types::{EdgeId, NodeId};

/// Input versions observed at a node's last evaluation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SeenVersions {
    config_version: u64,
    /// Dependency neighbors and their status versions, in id order.
    upstream: Vec<(NodeId, u64)>,
    /// Owned outgoing edges, in id order. Only edge originators react to
    /// this, but recording it unconditionally is harmless and keeps the
    /// ledger uniform.
    outgoing: Vec<EdgeId>,
}

impl SeenVersions {
    fn capture(store: &TopologyStore, id: &NodeId) -> Option<Self> {
        let record = store.get_node(id)?;
        let upstream = store
            .dependency_neighbors(id)
            .into_iter()
            .filter_map(|nid| {
                store
                    .get_node(&nid)
                    .map(|neighbor| (nid, neighbor.status_version()))
            })
            .collect();
        let outgoing = store
            .outgoing_edges(id)
            .into_iter()
            .map(|edge| edge.id.clone())
            .collect();
        Some(Self {
            config_version: record.config_version(),
            upstream,
            outgoing,
        })
    }
}

/// Dirty set plus versions-seen ledger.
#[derive(Debug, Default)]
pub(crate) struct InvalidationState {
    dirty: FxHashSet<NodeId>,
    seen: FxHashMap<NodeId, SeenVersions>,
}

impl InvalidationState {
    pub(crate) fn mark_dirty(&mut self, id: NodeId) {
        self.dirty.insert(id);
    }

    pub(crate) fn is_quiescent(&self) -> bool {
        self.dirty.is_empty()
    }

    /// Drain the current dirty set, sorted for deterministic round order.
    pub(crate) fn take_dirty(&mut self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.dirty.drain().collect();
        ids.sort();
        ids
    }

    /// Whether a node's inputs changed since its last recorded evaluation.
    ///
    /// A node with no ledger entry (never evaluated, or forgotten after
    /// removal and re-insertion) always runs.
    pub(crate) fn should_run(&self, store: &TopologyStore, id: &NodeId) -> bool {
        let Some(current) = SeenVersions::capture(store, id) else {
            return false;
        };
        self.seen.get(id) != Some(&current)
    }

    /// Record the input versions a node was just evaluated against.
    pub(crate) fn record_seen(&mut self, store: &TopologyStore, id: &NodeId) {
        if let Some(current) = SeenVersions::capture(store, id) {
            self.seen.insert(id.clone(), current);
        }
    }

    /// Drop all memory of a node. Called on removal so a later re-insertion
    /// under the same id starts from a clean slate.
    pub(crate) fn forget(&mut self, id: &NodeId) {
        self.dirty.remove(id);
        self.seen.remove(id);
    }
}
