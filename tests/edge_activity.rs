mod common;

use common::*;
use topolight::builder::TopologyBuilder;
use topolight::config::{
    AdapterConfig, ConnectionReport, NodeConfig, NorthboundMapping, SouthboundMapping,
};
use topolight::types::NodeId;

#[test]
fn connected_adapter_without_mappings_animates_nothing() {
    let mut engine = TopologyBuilder::new()
        .add_node(
            "a1",
            NodeConfig::Adapter(
                AdapterConfig::new("opcua").with_report(ConnectionReport::connected()),
            ),
        )
        .add_node("broker", broker())
        .add_edge_with_id("e-north", "a1", "broker")
        .with_silent_events()
        .compile()
        .unwrap();
    engine.settle();
    assert_animated(&engine, "e-north", false);

    // Adding one northbound mapping flips the flag on the next evaluation.
    let id: NodeId = "a1".into();
    engine
        .update_config(
            &id,
            NodeConfig::Adapter(
                AdapterConfig::new("opcua")
                    .with_report(ConnectionReport::connected())
                    .with_northbound(NorthboundMapping::new("boiler/temp", "site/boiler/temp")),
            ),
        )
        .unwrap();
    engine.settle();
    assert_animated(&engine, "e-north", true);
}

#[test]
fn disconnected_adapter_animates_nothing_despite_mappings() {
    let mut engine = TopologyBuilder::new()
        .add_node("a1", configured_adapter())
        .add_node("broker", broker())
        .add_edge_with_id("e-north", "a1", "broker")
        .with_silent_events()
        .compile()
        .unwrap();
    engine.settle();
    assert_animated(&engine, "e-north", false);

    engine
        .apply_connection_report(&"a1".into(), ConnectionReport::connected())
        .unwrap();
    engine.settle();
    assert_animated(&engine, "e-north", true);

    engine
        .apply_connection_report(&"a1".into(), ConnectionReport::disconnected())
        .unwrap();
    engine.settle();
    assert_animated(&engine, "e-north", false);
}

#[test]
fn device_edge_gates_on_southbound_mappings() {
    // Northbound-only adapter: broker edge animates, device edge does not.
    let mut engine = TopologyBuilder::new()
        .add_node(
            "a1",
            NodeConfig::Adapter(
                AdapterConfig::new("opcua")
                    .with_report(ConnectionReport::connected())
                    .with_northbound(NorthboundMapping::new("boiler/temp", "site/boiler/temp")),
            ),
        )
        .add_node("d1", tagged_device())
        .add_node("broker", broker())
        .add_edge_with_id("e-north", "a1", "broker")
        .add_edge_with_id("e-south", "a1", "d1")
        .with_silent_events()
        .compile()
        .unwrap();
    engine.settle();
    assert_animated(&engine, "e-north", true);
    assert_animated(&engine, "e-south", false);

    engine
        .update_config(
            &"a1".into(),
            NodeConfig::Adapter(
                AdapterConfig::new("opcua")
                    .bidirectional()
                    .with_report(ConnectionReport::connected())
                    .with_northbound(NorthboundMapping::new("boiler/temp", "site/boiler/temp"))
                    .with_southbound(SouthboundMapping::new("site/boiler/set", "boiler/set")),
            ),
        )
        .unwrap();
    engine.settle();
    assert_animated(&engine, "e-south", true);
}

#[test]
fn bridge_edges_pair_with_filter_direction() {
    let mut engine = TopologyBuilder::new()
        .add_node(
            "b1",
            {
                use topolight::config::BridgeConfig;
                // Local filters only: data flows out to the host, nothing
                // is pulled into the broker.
                NodeConfig::Bridge(
                    BridgeConfig::new("remote.example")
                        .with_local_filter("site/#")
                        .with_report(ConnectionReport::connected()),
                )
            },
        )
        .add_node("h1", remote_host())
        .add_node("broker", broker())
        .add_edge_with_id("e-host", "b1", "h1")
        .add_edge_with_id("e-broker", "b1", "broker")
        .with_silent_events()
        .compile()
        .unwrap();
    engine.settle();
    assert_animated(&engine, "e-host", true);
    assert_animated(&engine, "e-broker", false);

    engine
        .update_config(&"b1".into(), {
            use topolight::config::BridgeConfig;
            NodeConfig::Bridge(
                BridgeConfig::new("remote.example")
                    .with_local_filter("site/#")
                    .with_remote_filter("cloud/commands/#")
                    .with_report(ConnectionReport::connected()),
            )
        })
        .unwrap();
    engine.settle();
    assert_animated(&engine, "e-broker", true);
}

#[test]
fn edges_to_unwired_target_kinds_never_animate() {
    let mut engine = TopologyBuilder::new()
        .add_node(
            "a1",
            NodeConfig::Adapter(
                AdapterConfig::new("opcua")
                    .with_report(ConnectionReport::connected())
                    .with_northbound(NorthboundMapping::new("boiler/temp", "site/boiler/temp")),
            ),
        )
        .add_node("c1", configured_combiner())
        .add_edge_with_id("e-comb", "a1", "c1")
        .with_silent_events()
        .compile()
        .unwrap();
    engine.settle();
    assert_animated(&engine, "e-comb", false);
}

#[test]
fn attaching_an_edge_later_gets_annotated() {
    let mut engine = TopologyBuilder::new()
        .add_node(
            "a1",
            NodeConfig::Adapter(
                AdapterConfig::new("opcua")
                    .with_report(ConnectionReport::connected())
                    .with_northbound(NorthboundMapping::new("boiler/temp", "site/boiler/temp")),
            ),
        )
        .add_node("broker", broker())
        .with_silent_events()
        .compile()
        .unwrap();
    engine.settle();

    let edge = engine.connect("a1", "broker").unwrap();
    engine.settle();
    assert_eq!(engine.edge_animated(&edge), Some(true));
}
