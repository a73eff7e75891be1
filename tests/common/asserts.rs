use topolight::engine::TopologyEngine;
use topolight::types::{NodeId, OperationalStatus, RuntimeStatus};

#[allow(dead_code)]
pub fn assert_status(
    engine: &TopologyEngine,
    id: &str,
    operational: OperationalStatus,
    runtime: RuntimeStatus,
) {
    let node: NodeId = id.into();
    let status = engine
        .status_of(&node)
        .unwrap_or_else(|| panic!("node {id} should exist"));
    assert_eq!(
        status.operational, operational,
        "node {id}: expected operational {operational}, got {}",
        status.operational
    );
    assert_eq!(
        status.runtime, runtime,
        "node {id}: expected runtime {runtime}, got {}",
        status.runtime
    );
}

#[allow(dead_code)]
pub fn assert_animated(engine: &TopologyEngine, edge: &str, expected: bool) {
    let animated = engine
        .edge_animated(&edge.into())
        .unwrap_or_else(|| panic!("edge {edge} should exist"));
    assert_eq!(animated, expected, "edge {edge}: expected animated={expected}");
}
