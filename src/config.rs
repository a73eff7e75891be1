//! Per-kind node configuration payloads and backend connectivity reports.
//!
//! [`NodeConfig`] is a closed tagged union: one variant per [`NodeKind`],
//! matched exhaustively by the status derivation rules. The payloads hold
//! exactly the routing artifacts the Local Status Deriver and the Edge
//! Activity Annotator inspect: northbound/southbound mappings for
//! adapters, local/remote topic filters for bridges, tags for devices,
//! data-combining mappings for combiners, plus, on root kinds, the last
//! externally reported [`ConnectionReport`].
//!
//! Configuration is data the surrounding application edits; the engine only
//! ever reads it. Absent or empty collections are valid and simply evaluate
//! to an inactive operational status.
//!
//! # Examples
//!
//! ```rust
//! use topolight::config::{AdapterConfig, NodeConfig, NorthboundMapping};
//! use topolight::types::NodeKind;
//!
//! let config = NodeConfig::Adapter(
//!     AdapterConfig::new("opcua")
//!         .with_northbound(NorthboundMapping::new("boiler/temp", "factory/boiler/temp")),
//! );
//! assert_eq!(config.kind(), NodeKind::Adapter);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::NodeKind;

/// Connection state reported by the backend for a root node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionState {
    Connected,
    Disconnected,
    /// The protocol has no persistent session concept; liveness is judged
    /// from the runtime state instead.
    Stateless,
    Unknown,
}

/// Process state reported by the backend for a root node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuntimeState {
    Started,
    Stopped,
}

/// Externally reported connectivity for a root node.
///
/// The engine never invents this: it is pushed in through
/// [`TopologyEngine::apply_connection_report`](crate::engine::TopologyEngine::apply_connection_report)
/// whenever the surrounding application receives fresh backend state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionReport {
    pub connection: ConnectionState,
    pub runtime: RuntimeState,
}

impl ConnectionReport {
    #[must_use]
    pub fn new(connection: ConnectionState, runtime: RuntimeState) -> Self {
        Self {
            connection,
            runtime,
        }
    }

    /// Shorthand for a started, connected endpoint.
    #[must_use]
    pub fn connected() -> Self {
        Self::new(ConnectionState::Connected, RuntimeState::Started)
    }

    /// Shorthand for a stopped, disconnected endpoint.
    #[must_use]
    pub fn disconnected() -> Self {
        Self::new(ConnectionState::Disconnected, RuntimeState::Stopped)
    }

    /// Shorthand for a started endpoint whose protocol has no session.
    #[must_use]
    pub fn stateless_started() -> Self {
        Self::new(ConnectionState::Stateless, RuntimeState::Started)
    }
}

/// A northbound mapping: device tag → broker topic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NorthboundMapping {
    /// Source tag on the device.
    pub tag: String,
    /// Destination topic on the local broker.
    pub topic: String,
}

impl NorthboundMapping {
    pub fn new(tag: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            topic: topic.into(),
        }
    }
}

/// A southbound mapping: broker topic filter → device tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SouthboundMapping {
    /// Topic filter subscribed on the local broker.
    pub topic_filter: String,
    /// Destination tag on the device.
    pub tag: String,
}

impl SouthboundMapping {
    pub fn new(topic_filter: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            topic_filter: topic_filter.into(),
            tag: tag.into(),
        }
    }
}

/// A tag exposed by a field device.
///
/// The `definition` blob carries the protocol-specific address untouched;
/// the engine only counts tags, it never interprets them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTag {
    pub name: String,
    #[serde(default)]
    pub definition: Value,
}

impl DeviceTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: Value::Null,
        }
    }

    #[must_use]
    pub fn with_definition(mut self, definition: Value) -> Self {
        self.definition = definition;
        self
    }
}

/// A data-combining mapping: several upstream sources into one destination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinerMapping {
    /// Destination topic for the combined payload.
    pub destination: String,
    /// Upstream topic/tag references the combination reads.
    pub sources: Vec<String>,
}

impl CombinerMapping {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }
}

/// Configuration payload of a protocol adapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AdapterConfig {
    /// Protocol identifier (e.g. `opcua`, `modbus`, `s7`).
    pub protocol: String,
    /// Whether the adapter can also write back to the device. A
    /// unidirectional (read-only) adapter needs no southbound mappings to
    /// be operationally active.
    pub bidirectional: bool,
    pub northbound: Vec<NorthboundMapping>,
    pub southbound: Vec<SouthboundMapping>,
    /// Last externally reported connectivity, if any has arrived yet.
    pub report: Option<ConnectionReport>,
}

impl AdapterConfig {
    pub fn new(protocol: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn bidirectional(mut self) -> Self {
        self.bidirectional = true;
        self
    }

    #[must_use]
    pub fn with_northbound(mut self, mapping: NorthboundMapping) -> Self {
        self.northbound.push(mapping);
        self
    }

    #[must_use]
    pub fn with_southbound(mut self, mapping: SouthboundMapping) -> Self {
        self.southbound.push(mapping);
        self
    }

    #[must_use]
    pub fn with_report(mut self, report: ConnectionReport) -> Self {
        self.report = Some(report);
        self
    }
}

/// Configuration payload of an MQTT bridge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BridgeConfig {
    /// Hostname of the remote broker.
    pub remote_host: String,
    /// Topic filters forwarded from the local broker to the remote host.
    pub local_filters: Vec<String>,
    /// Topic filters pulled from the remote host into the local broker.
    pub remote_filters: Vec<String>,
    /// Last externally reported connectivity, if any has arrived yet.
    pub report: Option<ConnectionReport>,
}

impl BridgeConfig {
    pub fn new(remote_host: impl Into<String>) -> Self {
        Self {
            remote_host: remote_host.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_local_filter(mut self, filter: impl Into<String>) -> Self {
        self.local_filters.push(filter.into());
        self
    }

    #[must_use]
    pub fn with_remote_filter(mut self, filter: impl Into<String>) -> Self {
        self.remote_filters.push(filter.into());
        self
    }

    #[must_use]
    pub fn with_report(mut self, report: ConnectionReport) -> Self {
        self.report = Some(report);
        self
    }
}

/// Configuration payload of a field device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeviceConfig {
    pub tags: Vec<DeviceTag>,
}

impl DeviceConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tag(mut self, tag: DeviceTag) -> Self {
        self.tags.push(tag);
        self
    }
}

/// Configuration payload of a data combiner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CombinerConfig {
    pub mappings: Vec<CombinerMapping>,
}

impl CombinerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mapping(mut self, mapping: CombinerMapping) -> Self {
        self.mappings.push(mapping);
        self
    }
}

/// Descriptor of a remote broker host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HostConfig {
    pub hostname: String,
    pub port: u16,
}

impl HostConfig {
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
        }
    }
}

/// Descriptor of a network listener on the local broker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ListenerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Transport label shown to consumers (e.g. `tcp`, `ws`, `tls-tcp`).
    pub transport: String,
}

impl ListenerConfig {
    pub fn new(bind_address: impl Into<String>, port: u16, transport: impl Into<String>) -> Self {
        Self {
            bind_address: bind_address.into(),
            port,
            transport: transport.into(),
        }
    }
}

/// Configuration payload of the gateway's own broker node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EdgeBrokerConfig {
    /// Last externally reported broker state, if any has arrived yet.
    pub report: Option<ConnectionReport>,
}

impl EdgeBrokerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_report(mut self, report: ConnectionReport) -> Self {
        self.report = Some(report);
        self
    }
}

/// Kind-specific configuration payload of a topology node.
///
/// One variant per [`NodeKind`]; [`kind`](Self::kind) recovers the pairing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeConfig {
    Adapter(AdapterConfig),
    Bridge(BridgeConfig),
    Device(DeviceConfig),
    Host(HostConfig),
    Listener(ListenerConfig),
    Combiner(CombinerConfig),
    Group,
    EdgeBroker(EdgeBrokerConfig),
    AssetManager,
}

impl NodeConfig {
    /// The node kind this payload belongs to.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeConfig::Adapter(_) => NodeKind::Adapter,
            NodeConfig::Bridge(_) => NodeKind::Bridge,
            NodeConfig::Device(_) => NodeKind::Device,
            NodeConfig::Host(_) => NodeKind::Host,
            NodeConfig::Listener(_) => NodeKind::Listener,
            NodeConfig::Combiner(_) => NodeKind::Combiner,
            NodeConfig::Group => NodeKind::Group,
            NodeConfig::EdgeBroker(_) => NodeKind::EdgeBroker,
            NodeConfig::AssetManager => NodeKind::AssetManager,
        }
    }

    /// The externally reported connectivity carried by root kinds, if any.
    #[must_use]
    pub fn connection_report(&self) -> Option<ConnectionReport> {
        match self {
            NodeConfig::Adapter(adapter) => adapter.report,
            NodeConfig::Bridge(bridge) => bridge.report,
            NodeConfig::EdgeBroker(broker) => broker.report,
            _ => None,
        }
    }

    /// Store a fresh connectivity report on a root-kind payload.
    ///
    /// Returns `false` (payload untouched) for kinds that do not carry one.
    pub(crate) fn set_connection_report(&mut self, report: ConnectionReport) -> bool {
        match self {
            NodeConfig::Adapter(adapter) => {
                adapter.report = Some(report);
                true
            }
            NodeConfig::Bridge(bridge) => {
                bridge.report = Some(report);
                true
            }
            NodeConfig::EdgeBroker(broker) => {
                broker.report = Some(report);
                true
            }
            _ => false,
        }
    }
}
