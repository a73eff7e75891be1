//! # Topolight: Topology Status Propagation Engine
//!
//! Topolight derives a consistent `{operational, runtime}` status for every
//! node of a message-gateway topology (adapters, bridges, devices,
//! listeners, combiners, hosts, the broker node) plus an `animated`
//! activity flag for every edge, and keeps both correct as the graph and
//! the underlying configuration change continuously.
//!
//! ## Core Concepts
//!
//! - **Operational status**: does the node's own configuration contain at
//!   least one meaningful routing artifact? Always derived locally, never
//!   from the graph.
//! - **Runtime status**: is the node (or the upstream source it depends
//!   on) currently connected/started? Root kinds read it from externally
//!   reported connectivity; every other kind inherits or aggregates it.
//! - **Edge activity**: an edge animates only when its source is live
//!   *and* configured to forward data toward that specific target kind.
//! - **Settle loop**: mutations mark affected nodes dirty; deterministic
//!   evaluation rounds with write-if-changed publication cascade the
//!   change outward and provably quiesce.
//!
//! ## Quick Start
//!
//! ```rust
//! use topolight::builder::TopologyBuilder;
//! use topolight::config::{
//!     AdapterConfig, ConnectionReport, DeviceConfig, DeviceTag, EdgeBrokerConfig, NodeConfig,
//!     NorthboundMapping,
//! };
//! use topolight::types::{OperationalStatus, RuntimeStatus};
//!
//! # fn main() -> miette::Result<()> {
//! // An OPC-UA adapter feeding one device tag into the broker.
//! let mut engine = TopologyBuilder::new()
//!     .add_node(
//!         "adapter-1",
//!         NodeConfig::Adapter(
//!             AdapterConfig::new("opcua")
//!                 .with_northbound(NorthboundMapping::new("boiler/temp", "site/boiler/temp")),
//!         ),
//!     )
//!     .add_node(
//!         "device-1",
//!         NodeConfig::Device(DeviceConfig::new().with_tag(DeviceTag::new("boiler/temp"))),
//!     )
//!     .add_node("broker", NodeConfig::EdgeBroker(EdgeBrokerConfig::new()))
//!     .add_edge_with_id("e-north", "adapter-1", "broker")
//!     .add_edge_with_id("e-south", "adapter-1", "device-1")
//!     .with_silent_events()
//!     .compile()?;
//!
//! // Initial evaluation: everything configured, nothing connected yet.
//! engine.settle();
//! assert_eq!(
//!     engine.status_of(&"adapter-1".into()).unwrap().operational,
//!     OperationalStatus::Active
//! );
//! assert_eq!(
//!     engine.status_of(&"device-1".into()).unwrap().runtime,
//!     RuntimeStatus::Inactive
//! );
//!
//! // The backend reports the adapter connected: liveness cascades to the
//! // device, and the northbound edge starts animating.
//! engine.apply_connection_report(&"adapter-1".into(), ConnectionReport::connected())?;
//! engine.settle();
//! assert_eq!(
//!     engine.status_of(&"device-1".into()).unwrap().runtime,
//!     RuntimeStatus::Active
//! );
//! assert_eq!(engine.edge_animated(&"e-north".into()), Some(true));
//! # Ok(())
//! # }
//! ```
//!
//! ## Observing Status Changes
//!
//! Every effective write is emitted on the engine's event bus:
//!
//! ```rust
//! use topolight::builder::TopologyBuilder;
//! use topolight::config::{EdgeBrokerConfig, NodeConfig};
//! use topolight::event_bus::MemorySink;
//!
//! # fn main() -> miette::Result<()> {
//! let mut engine = TopologyBuilder::new()
//!     .add_node("broker", NodeConfig::EdgeBroker(EdgeBrokerConfig::new()))
//!     .with_silent_events()
//!     .compile()?;
//!
//! let sink = MemorySink::new();
//! engine.event_bus().add_sink(sink.clone());
//! engine.settle();
//! assert!(!sink.snapshot().is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Guide
//!
//! - [`types`] - Ids, node kinds and the status axes
//! - [`config`] - Per-kind configuration payloads and connectivity reports
//! - [`store`] - The owned node/edge arena and its read API
//! - [`status`] - The pure derivation rules (operational, runtime, edge
//!   activity) and the idempotent publisher
//! - [`engine`] - Incremental invalidation and the settle loop
//! - [`builder`] - Validated topology construction
//! - [`event_bus`] - Status event fan-out to pluggable sinks
//! - [`telemetry`] - Formatting and tracing bootstrap

pub mod builder;
pub mod config;
pub mod engine;
pub mod event_bus;
pub mod status;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod utils;
