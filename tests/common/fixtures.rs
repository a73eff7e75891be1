use topolight::builder::TopologyBuilder;
use topolight::config::{
    AdapterConfig, BridgeConfig, CombinerConfig, CombinerMapping, ConnectionReport, DeviceConfig,
    DeviceTag, EdgeBrokerConfig, HostConfig, ListenerConfig, NodeConfig, NorthboundMapping,
    SouthboundMapping,
};
use topolight::engine::TopologyEngine;

/// Read-only adapter with one northbound mapping.
#[allow(dead_code)]
pub fn configured_adapter() -> NodeConfig {
    NodeConfig::Adapter(
        AdapterConfig::new("opcua")
            .with_northbound(NorthboundMapping::new("boiler/temp", "site/boiler/temp")),
    )
}

/// Bidirectional adapter with one northbound and one southbound mapping.
#[allow(dead_code)]
pub fn bidirectional_adapter() -> NodeConfig {
    NodeConfig::Adapter(
        AdapterConfig::new("modbus")
            .bidirectional()
            .with_northbound(NorthboundMapping::new("valve/state", "site/valve/state"))
            .with_southbound(SouthboundMapping::new("site/valve/set", "valve/set")),
    )
}

/// Device exposing a single tag.
#[allow(dead_code)]
pub fn tagged_device() -> NodeConfig {
    NodeConfig::Device(DeviceConfig::new().with_tag(DeviceTag::new("boiler/temp")))
}

#[allow(dead_code)]
pub fn empty_device() -> NodeConfig {
    NodeConfig::Device(DeviceConfig::new())
}

#[allow(dead_code)]
pub fn broker() -> NodeConfig {
    NodeConfig::EdgeBroker(EdgeBrokerConfig::new().with_report(ConnectionReport::connected()))
}

#[allow(dead_code)]
pub fn listener() -> NodeConfig {
    NodeConfig::Listener(ListenerConfig::new("0.0.0.0", 1883, "tcp"))
}

#[allow(dead_code)]
pub fn remote_host() -> NodeConfig {
    NodeConfig::Host(HostConfig::new("remote.example", 8883))
}

/// Bridge with one local and one remote topic filter.
#[allow(dead_code)]
pub fn configured_bridge() -> NodeConfig {
    NodeConfig::Bridge(
        BridgeConfig::new("remote.example")
            .with_local_filter("site/#")
            .with_remote_filter("cloud/commands/#"),
    )
}

/// Combiner with one data-combining mapping.
#[allow(dead_code)]
pub fn configured_combiner() -> NodeConfig {
    NodeConfig::Combiner(
        CombinerConfig::new()
            .with_mapping(CombinerMapping::new("combined/line1").with_source("site/boiler/temp")),
    )
}

/// The Scenario-A workspace: bidirectional adapter `a1` (connected) wired
/// to device `d1` (one tag) and the broker, settled once.
#[allow(dead_code)]
pub fn scenario_a_engine() -> TopologyEngine {
    let mut engine = TopologyBuilder::new()
        .add_node(
            "a1",
            NodeConfig::Adapter(
                AdapterConfig::new("modbus")
                    .bidirectional()
                    .with_northbound(NorthboundMapping::new("valve/state", "site/valve/state"))
                    .with_southbound(SouthboundMapping::new("site/valve/set", "valve/set"))
                    .with_report(ConnectionReport::connected()),
            ),
        )
        .add_node("d1", tagged_device())
        .add_node("broker", broker())
        .add_edge_with_id("e-north", "a1", "broker")
        .add_edge_with_id("e-south", "a1", "d1")
        .with_silent_events()
        .compile()
        .expect("scenario A topology compiles");
    engine.settle();
    engine
}
