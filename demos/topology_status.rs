//! End-to-end walkthrough: build a small gateway workspace, feed it
//! connectivity reports, and watch statuses and edge activity converge.
//!
//! Run with: `cargo run --example topology_status`

use topolight::builder::TopologyBuilder;
use topolight::config::{
    AdapterConfig, BridgeConfig, CombinerConfig, CombinerMapping, ConnectionReport, DeviceConfig,
    DeviceTag, EdgeBrokerConfig, HostConfig, ListenerConfig, NodeConfig, NorthboundMapping,
    SouthboundMapping,
};
use topolight::telemetry::{self, FormatterMode, PlainFormatter, TelemetryFormatter};

fn main() -> miette::Result<()> {
    telemetry::init_tracing()?;

    let mut engine = TopologyBuilder::new()
        .add_node("broker", NodeConfig::EdgeBroker(EdgeBrokerConfig::new()))
        .add_node(
            "tcp-listener",
            NodeConfig::Listener(ListenerConfig::new("0.0.0.0", 1883, "tcp")),
        )
        .add_node(
            "adapter-opcua",
            NodeConfig::Adapter(
                AdapterConfig::new("opcua")
                    .bidirectional()
                    .with_northbound(NorthboundMapping::new("boiler/temp", "site/boiler/temp"))
                    .with_southbound(SouthboundMapping::new("site/boiler/set", "boiler/set")),
            ),
        )
        .add_node(
            "boiler",
            NodeConfig::Device(DeviceConfig::new().with_tag(DeviceTag::new("boiler/temp"))),
        )
        .add_node(
            "bridge-cloud",
            NodeConfig::Bridge(
                BridgeConfig::new("cloud.example")
                    .with_local_filter("site/#")
                    .with_remote_filter("cloud/commands/#"),
            ),
        )
        .add_node(
            "cloud-host",
            NodeConfig::Host(HostConfig::new("cloud.example", 8883)),
        )
        .add_node(
            "combiner-line1",
            NodeConfig::Combiner(
                CombinerConfig::new().with_mapping(
                    CombinerMapping::new("combined/line1")
                        .with_source("site/boiler/temp")
                        .with_source("cloud/commands/line1"),
                ),
            ),
        )
        .add_edge_with_id("e-opcua-north", "adapter-opcua", "broker")
        .add_edge_with_id("e-opcua-south", "adapter-opcua", "boiler")
        .add_edge_with_id("e-bridge-broker", "bridge-cloud", "broker")
        .add_edge_with_id("e-bridge-host", "bridge-cloud", "cloud-host")
        .add_edge_with_id("e-opcua-combiner", "adapter-opcua", "combiner-line1")
        .add_edge_with_id("e-bridge-combiner", "bridge-cloud", "combiner-line1")
        .add_edge_with_id("e-listener", "tcp-listener", "broker")
        .compile()?;

    println!("== initial evaluation (nothing connected) ==");
    engine.settle();
    print_summary(&engine);

    println!("== backend reports arrive ==");
    engine.apply_connection_report(&"broker".into(), ConnectionReport::connected())?;
    engine.apply_connection_report(&"adapter-opcua".into(), ConnectionReport::connected())?;
    engine.apply_connection_report(&"bridge-cloud".into(), ConnectionReport::connected())?;
    let report = engine.settle();
    println!(
        "settled in {} rounds ({} status writes, {} edge writes)",
        report.rounds, report.status_writes, report.edge_writes
    );
    print_summary(&engine);

    println!("== the adapter drops its connection ==");
    engine.apply_connection_report(&"adapter-opcua".into(), ConnectionReport::disconnected())?;
    engine.settle();
    print_summary(&engine);

    Ok(())
}

fn print_summary(engine: &topolight::engine::TopologyEngine) {
    let formatter = PlainFormatter::with_mode(FormatterMode::Auto);
    print!("{}", formatter.render_summary(engine.store()).join_lines());
    println!();
}
