//! Topology construction with structural validation.
//!
//! [`TopologyBuilder`] assembles nodes and edges with a fluent API and
//! compiles them into a running [`TopologyEngine`]. Compilation is where
//! the construction rules live: duplicate ids, dangling edge endpoints and
//! dependency cycles are rejected here, which is precisely why the
//! propagator itself never needs cycle detection: a compiled topology is
//! acyclic along the dependency relation by construction.
//!
//! # Quick Start
//!
//! ```rust
//! use topolight::builder::TopologyBuilder;
//! use topolight::config::{
//!     AdapterConfig, DeviceConfig, EdgeBrokerConfig, NodeConfig, NorthboundMapping,
//! };
//!
//! # fn main() -> miette::Result<()> {
//! let mut engine = TopologyBuilder::new()
//!     .add_node(
//!         "a1",
//!         NodeConfig::Adapter(
//!             AdapterConfig::new("opcua")
//!                 .with_northbound(NorthboundMapping::new("tank/level", "site/tank/level")),
//!         ),
//!     )
//!     .add_node("d1", NodeConfig::Device(DeviceConfig::new()))
//!     .add_node("broker", NodeConfig::EdgeBroker(EdgeBrokerConfig::new()))
//!     .add_edge("a1", "d1")
//!     .add_edge("a1", "broker")
//!     .with_silent_events()
//!     .compile()?;
//!
//! let report = engine.settle();
//! assert!(report.converged);
//! # Ok(())
//! # }
//! ```

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::config::NodeConfig;
use crate::engine::{EngineSettings, EventBusConfig, TopologyEngine};
use crate::store::{EdgeRecord, StoreError, TopologyStore};
use crate::types::{EdgeId, NodeId};
use crate::utils::id_generator::IdGenerator;

/// Structural validation errors raised by [`TopologyBuilder::compile`].
#[derive(Debug, Error, Diagnostic)]
pub enum TopologyCompileError {
    #[error("topology has no nodes")]
    #[diagnostic(
        code(topolight::builder::empty_topology),
        help("Add at least one node before compiling.")
    )]
    EmptyTopology,

    #[error("duplicate node id: {id}")]
    #[diagnostic(
        code(topolight::builder::duplicate_node),
        help("Node ids must be unique across the topology.")
    )]
    DuplicateNode { id: NodeId },

    #[error("duplicate edge id: {id}")]
    #[diagnostic(code(topolight::builder::duplicate_edge))]
    DuplicateEdge { id: EdgeId },

    #[error("edge {edge} references unknown node {node}")]
    #[diagnostic(
        code(topolight::builder::unknown_endpoint),
        help("Every edge endpoint must be added with add_node first.")
    )]
    UnknownEndpoint { edge: EdgeId, node: NodeId },

    #[error("dependency cycle through node {id}")]
    #[diagnostic(
        code(topolight::builder::dependency_cycle),
        help(
            "Status derivation requires an acyclic dependency relation; \
             remove one of the edges closing the cycle."
        )
    )]
    DependencyCycle { id: NodeId },
}

struct EdgeSpec {
    id: Option<EdgeId>,
    source: NodeId,
    target: NodeId,
    handle: Option<String>,
}

/// Builder for constructing validated topologies with a fluent API.
///
/// Nodes and edges are collected declaratively; [`compile`](Self::compile)
/// validates the structure and hands back a [`TopologyEngine`] with every
/// node enqueued for its initial evaluation (so the first
/// [`settle`](TopologyEngine::settle) computes the whole graph).
pub struct TopologyBuilder {
    nodes: Vec<(NodeId, NodeConfig)>,
    edges: Vec<EdgeSpec>,
    settings: EngineSettings,
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyBuilder {
    /// Creates a new, empty topology builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            settings: EngineSettings::default(),
        }
    }

    /// Adds a node to the topology. The node's kind is implied by its
    /// configuration payload and fixed from then on.
    #[must_use]
    pub fn add_node(mut self, id: impl Into<NodeId>, config: NodeConfig) -> Self {
        self.nodes.push((id.into(), config));
        self
    }

    /// Adds an edge with a generated id.
    #[must_use]
    pub fn add_edge(mut self, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        self.edges.push(EdgeSpec {
            id: None,
            source: source.into(),
            target: target.into(),
            handle: None,
        });
        self
    }

    /// Adds an edge with an explicit, application-supplied id.
    #[must_use]
    pub fn add_edge_with_id(
        mut self,
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        self.edges.push(EdgeSpec {
            id: Some(id.into()),
            source: source.into(),
            target: target.into(),
            handle: None,
        });
        self
    }

    /// Adds an edge with an explicit id and a handle label distinguishing
    /// the connection point on the source node.
    #[must_use]
    pub fn add_edge_with_handle(
        mut self,
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        handle: impl Into<String>,
    ) -> Self {
        self.edges.push(EdgeSpec {
            id: Some(id.into()),
            source: source.into(),
            target: target.into(),
            handle: Some(handle.into()),
        });
        self
    }

    /// Configures engine settings for the compiled topology.
    #[must_use]
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Shorthand: compile with no event sinks attached.
    #[must_use]
    pub fn with_silent_events(mut self) -> Self {
        self.settings = self
            .settings
            .with_event_bus(EventBusConfig::silent());
        self
    }

    /// Validates the topology and compiles it into a running engine.
    ///
    /// # Errors
    ///
    /// - [`TopologyCompileError::EmptyTopology`] when no nodes were added
    /// - [`TopologyCompileError::DuplicateNode`] / [`DuplicateEdge`](TopologyCompileError::DuplicateEdge)
    ///   on id collisions
    /// - [`TopologyCompileError::UnknownEndpoint`] when an edge references
    ///   a node that was never added
    /// - [`TopologyCompileError::DependencyCycle`] when the dependency
    ///   relation used for runtime derivation would loop
    pub fn compile(self) -> Result<TopologyEngine, TopologyCompileError> {
        if self.nodes.is_empty() {
            return Err(TopologyCompileError::EmptyTopology);
        }

        let mut store = TopologyStore::new();
        for (id, config) in self.nodes {
            store
                .insert_node(id, config)
                .map_err(|err| match err {
                    StoreError::DuplicateNode { id } => TopologyCompileError::DuplicateNode { id },
                    other => unreachable_store_error(other),
                })?;
        }

        let edge_ids = IdGenerator::new("edge");
        for spec in self.edges {
            let id = spec.id.unwrap_or_else(|| EdgeId::new(edge_ids.generate()));
            store
                .insert_edge(EdgeRecord {
                    id,
                    source: spec.source,
                    target: spec.target,
                    handle: spec.handle,
                    animated: false,
                })
                .map_err(|err| match err {
                    StoreError::DuplicateEdge { id } => TopologyCompileError::DuplicateEdge { id },
                    StoreError::MissingEndpoint { edge, node } => {
                        TopologyCompileError::UnknownEndpoint { edge, node }
                    }
                    other => unreachable_store_error(other),
                })?;
        }

        detect_dependency_cycle(&store)?;

        let event_bus = self.settings.event_bus.build_event_bus();
        Ok(TopologyEngine::from_parts(store, self.settings, event_bus))
    }
}

/// The insertion sequence above can only produce the mapped variants; any
/// other store error here is a programming bug, not a user mistake.
fn unreachable_store_error(err: StoreError) -> TopologyCompileError {
    unreachable!("unexpected store error during compile: {err}")
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Done,
}

/// Depth-first search over the dependency relation. The relation is the
/// one the Runtime Propagator walks (dependency neighbors, not raw edge
/// direction), so a listener's outgoing edge to the broker counts toward
/// the listener's dependencies.
fn detect_dependency_cycle(store: &TopologyStore) -> Result<(), TopologyCompileError> {
    let mut states: FxHashMap<NodeId, VisitState> = FxHashMap::default();
    for id in store.node_ids() {
        if !states.contains_key(&id) {
            visit(store, &id, &mut states)?;
        }
    }
    Ok(())
}

fn visit(
    store: &TopologyStore,
    id: &NodeId,
    states: &mut FxHashMap<NodeId, VisitState>,
) -> Result<(), TopologyCompileError> {
    states.insert(id.clone(), VisitState::InProgress);
    for neighbor in store.dependency_neighbors(id) {
        match states.get(&neighbor) {
            Some(VisitState::InProgress) => {
                return Err(TopologyCompileError::DependencyCycle { id: neighbor });
            }
            Some(VisitState::Done) => {}
            None => visit(store, &neighbor, states)?,
        }
    }
    states.insert(id.clone(), VisitState::Done);
    Ok(())
}
