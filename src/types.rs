//! Core types for the topolight status-propagation engine.
//!
//! This module defines the fundamental types used throughout the system
//! for identifying nodes and edges in a gateway topology and for the two
//! status axes the engine derives for every node.
//!
//! # Key Types
//!
//! - [`NodeId`] / [`EdgeId`]: Opaque stable identifiers
//! - [`NodeKind`]: The closed set of node kinds a gateway topology contains
//! - [`StatusModel`]: The `{operational, runtime, source}` triple owned by
//!   the engine and published onto every node record
//!
//! # Status Axes
//!
//! Operational and runtime status are independent axes and stay independent
//! all the way to publication: a bridge with no topic filters but a live
//! connection is `operational = Inactive, runtime = Active`, and consumers
//! decide how to combine the two visually.
//!
//! # Examples
//!
//! ```rust
//! use topolight::types::{NodeKind, OperationalStatus, RuntimeStatus, StatusModel};
//!
//! let kind = NodeKind::Adapter;
//! assert!(kind.is_root());
//! assert!(kind.originates_edges());
//!
//! // Every node enters the graph with the conservative default.
//! let initial = StatusModel::initial(kind);
//! assert_eq!(initial.operational, OperationalStatus::Inactive);
//! assert_eq!(initial.runtime, RuntimeStatus::Inactive);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable identifier for a topology node.
///
/// Node ids are supplied by the surrounding application (they typically
/// mirror backend entity ids) and are never interpreted by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Opaque, stable identifier for a topology edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EdgeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifies the kind of a node within a gateway topology.
///
/// The set is closed on purpose: every per-kind rule in the engine matches
/// this enum exhaustively, so adding a kind is a compile-time-enforced
/// decision rather than a silently-defaulting branch.
///
/// # Classification
///
/// - **Root kinds** ([`is_root`](Self::is_root)): receive runtime status
///   directly from an externally reported connection state.
/// - **Derived kinds**: inherit or aggregate runtime status from their
///   dependency neighbors.
/// - **Edge originators** ([`originates_edges`](Self::originates_edges)):
///   the kinds whose outgoing edges carry an activity flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    /// Protocol adapter polling or subscribing to field devices.
    Adapter,
    /// MQTT bridge connecting the local broker to a remote host.
    Bridge,
    /// Field device exposed by an adapter.
    Device,
    /// Remote broker host a bridge forwards to.
    Host,
    /// Network listener feeding the local broker.
    Listener,
    /// Data-combining unit consuming several upstream streams.
    Combiner,
    /// Visual grouping container with no routing behaviour of its own.
    Group,
    /// The gateway's own broker node.
    EdgeBroker,
    /// Asset-manager service attached to the broker.
    AssetManager,
}

impl NodeKind {
    /// Encode a NodeKind into its persisted string form.
    ///
    /// The encoding matches the wire labels used by topology consumers:
    /// `Adapter` → `"ADAPTER"`, `EdgeBroker` → `"EDGE_BROKER"`, and so on.
    #[must_use]
    pub fn encode(&self) -> &'static str {
        match self {
            NodeKind::Adapter => "ADAPTER",
            NodeKind::Bridge => "BRIDGE",
            NodeKind::Device => "DEVICE",
            NodeKind::Host => "HOST",
            NodeKind::Listener => "LISTENER",
            NodeKind::Combiner => "COMBINER",
            NodeKind::Group => "GROUP",
            NodeKind::EdgeBroker => "EDGE_BROKER",
            NodeKind::AssetManager => "ASSET_MANAGER",
        }
    }

    /// Decode a persisted string form back into a NodeKind.
    ///
    /// Returns `None` for unrecognized labels so callers can degrade
    /// gracefully instead of panicking on a topology extension.
    pub fn decode(s: &str) -> Option<Self> {
        match s {
            "ADAPTER" => Some(NodeKind::Adapter),
            "BRIDGE" => Some(NodeKind::Bridge),
            "DEVICE" => Some(NodeKind::Device),
            "HOST" => Some(NodeKind::Host),
            "LISTENER" => Some(NodeKind::Listener),
            "COMBINER" => Some(NodeKind::Combiner),
            "GROUP" => Some(NodeKind::Group),
            "EDGE_BROKER" => Some(NodeKind::EdgeBroker),
            "ASSET_MANAGER" => Some(NodeKind::AssetManager),
            _ => None,
        }
    }

    /// Returns `true` for kinds whose runtime status comes directly from an
    /// externally reported connection state.
    #[must_use]
    pub fn is_root(&self) -> bool {
        matches!(
            self,
            NodeKind::Adapter | NodeKind::Bridge | NodeKind::EdgeBroker
        )
    }

    /// Returns `true` for kinds whose outgoing edges carry an activity flag.
    #[must_use]
    pub fn originates_edges(&self) -> bool {
        matches!(self, NodeKind::Adapter | NodeKind::Bridge)
    }

    /// The status source this kind publishes with.
    #[must_use]
    pub fn status_source(&self) -> StatusSource {
        if self.is_root() {
            StatusSource::Own
        } else {
            StatusSource::Derived
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/// Whether a node's own configuration contains enough routing artifacts to
/// do meaningful work, independent of connectivity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationalStatus {
    Active,
    Inactive,
}

impl OperationalStatus {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, OperationalStatus::Active)
    }

    /// `Active` when the condition holds, `Inactive` otherwise.
    #[must_use]
    pub fn from_bool(active: bool) -> Self {
        if active {
            OperationalStatus::Active
        } else {
            OperationalStatus::Inactive
        }
    }
}

impl fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationalStatus::Active => write!(f, "ACTIVE"),
            OperationalStatus::Inactive => write!(f, "INACTIVE"),
        }
    }
}

/// Whether a node (or, for derived nodes, its upstream dependency) is
/// currently connected/started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuntimeStatus {
    Active,
    Inactive,
}

impl RuntimeStatus {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, RuntimeStatus::Active)
    }

    /// `Active` when the condition holds, `Inactive` otherwise.
    #[must_use]
    pub fn from_bool(active: bool) -> Self {
        if active {
            RuntimeStatus::Active
        } else {
            RuntimeStatus::Inactive
        }
    }
}

impl fmt::Display for RuntimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeStatus::Active => write!(f, "ACTIVE"),
            RuntimeStatus::Inactive => write!(f, "INACTIVE"),
        }
    }
}

/// How a node's runtime status was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusSource {
    /// Runtime comes directly from an externally reported connection state.
    Own,
    /// Runtime is a deterministic aggregate of upstream neighbors' statuses.
    Derived,
}

impl fmt::Display for StatusSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusSource::Own => write!(f, "OWN"),
            StatusSource::Derived => write!(f, "DERIVED"),
        }
    }
}

/// The computed status triple published onto every node record.
///
/// Owned by the engine: only the Status Publisher writes it, every consumer
/// (rendering, edge annotation, downstream derivation) reads it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusModel {
    pub operational: OperationalStatus,
    pub runtime: RuntimeStatus,
    pub source: StatusSource,
}

impl StatusModel {
    /// The conservative model a node carries when it enters the graph,
    /// before its first evaluation.
    #[must_use]
    pub fn initial(kind: NodeKind) -> Self {
        Self {
            operational: OperationalStatus::Inactive,
            runtime: RuntimeStatus::Inactive,
            source: kind.status_source(),
        }
    }

    #[must_use]
    pub fn new(
        operational: OperationalStatus,
        runtime: RuntimeStatus,
        source: StatusSource,
    ) -> Self {
        Self {
            operational,
            runtime,
            source,
        }
    }
}

impl fmt::Display for StatusModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "operational={} runtime={} source={}",
            self.operational, self.runtime, self.source
        )
    }
}
