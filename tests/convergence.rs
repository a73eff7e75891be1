mod common;

use common::*;
use topolight::builder::TopologyBuilder;
use topolight::config::ConnectionReport;
use topolight::engine::EngineSettings;
use topolight::event_bus::{Event, MemorySink};
use topolight::types::{OperationalStatus, RuntimeStatus};

/// Linear chain: adapter -> device -> combiner.
fn chain_engine() -> topolight::engine::TopologyEngine {
    let mut engine = TopologyBuilder::new()
        .add_node("a1", configured_adapter())
        .add_node("d1", tagged_device())
        .add_node("c1", configured_combiner())
        .add_edge("a1", "d1")
        .add_edge("d1", "c1")
        .with_silent_events()
        .compile()
        .unwrap();
    engine.settle();
    engine
}

#[test]
fn settled_graph_produces_zero_writes() {
    let mut engine = chain_engine();
    let report = engine.settle();
    assert_eq!(report.rounds, 0);
    assert_eq!(report.status_writes, 0);
    assert_eq!(report.edge_writes, 0);
    assert!(report.evaluated.is_empty());
    assert!(report.converged);
}

#[test]
fn identical_config_update_triggers_nothing() {
    let mut engine = chain_engine();
    let changed = engine
        .update_config(&"d1".into(), tagged_device())
        .unwrap();
    assert!(!changed);
    let report = engine.settle();
    assert_eq!(report.status_writes, 0);
}

#[test]
fn redundant_connection_report_triggers_nothing() {
    let mut engine = chain_engine();
    engine
        .apply_connection_report(&"a1".into(), ConnectionReport::connected())
        .unwrap();
    engine.settle();

    let changed = engine
        .apply_connection_report(&"a1".into(), ConnectionReport::connected())
        .unwrap();
    assert!(!changed);
    let report = engine.settle();
    assert_eq!(report.rounds, 0);
    assert_eq!(report.status_writes, 0);
}

#[test]
fn root_change_cascades_in_depth_rounds() {
    let mut engine = chain_engine();
    engine
        .apply_connection_report(&"a1".into(), ConnectionReport::connected())
        .unwrap();
    let report = engine.settle();

    // One round per level of the chain: adapter, then device, then combiner.
    assert_eq!(report.rounds, 3);
    assert_eq!(report.status_writes, 3);
    assert!(report.converged);
    assert_status(&engine, "c1", OperationalStatus::Active, RuntimeStatus::Active);
}

#[test]
fn events_fire_only_for_effective_writes() {
    let mut engine = chain_engine();
    let sink = MemorySink::new();
    engine.event_bus().add_sink(sink.clone());

    engine
        .apply_connection_report(&"a1".into(), ConnectionReport::connected())
        .unwrap();
    let report = engine.settle();

    let status_events = sink
        .snapshot()
        .iter()
        .filter(|event| matches!(event, Event::NodeStatus(_)))
        .count();
    assert_eq!(status_events, report.status_writes);

    // A second settle on the quiesced graph emits no further change events.
    sink.clear();
    engine.settle();
    assert!(
        sink.snapshot()
            .iter()
            .all(|event| matches!(event, Event::Settled(_)))
    );
}

#[test]
fn round_cap_reports_non_convergence() {
    let mut engine = TopologyBuilder::new()
        .add_node("a1", configured_adapter())
        .with_settings(
            EngineSettings::default()
                .with_max_rounds(0)
                .with_silent_event_bus(),
        )
        .compile()
        .unwrap();
    // The initial evaluation is pending but the cap forbids any round.
    let report = engine.settle();
    assert!(!report.converged);
    assert_eq!(report.rounds, 0);

    // Raising the cap is not possible on a running engine; a fresh settle
    // with the same cap keeps reporting honestly instead of spinning.
    let again = engine.settle();
    assert!(!again.converged);
}

#[test]
fn evaluation_order_is_deterministic() {
    let build = || {
        let mut engine = TopologyBuilder::new()
            .add_node("a1", configured_adapter())
            .add_node("a2", configured_adapter())
            .add_node("d1", tagged_device())
            .add_node("d2", tagged_device())
            .add_edge("a1", "d1")
            .add_edge("a2", "d2")
            .with_silent_events()
            .compile()
            .unwrap();
        engine.settle()
    };
    let first = build();
    let second = build();
    assert_eq!(first.evaluated, second.evaluated);
}
