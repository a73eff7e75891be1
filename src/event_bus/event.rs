use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::types::{EdgeId, NodeId, NodeKind, StatusModel};

/// A status event emitted by the engine.
///
/// Events are emitted only for effective writes: an unchanged status or
/// activity flag produces nothing. `Diagnostic` carries engine-level
/// observations (e.g. the settle loop hitting its round cap).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    NodeStatus(NodeStatusEvent),
    EdgeActivity(EdgeActivityEvent),
    Settled(SettledEvent),
    Diagnostic(DiagnosticEvent),
}

/// A node's published status changed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeStatusEvent {
    pub node: NodeId,
    pub kind: NodeKind,
    pub previous: StatusModel,
    pub current: StatusModel,
    #[serde(default = "Utc::now")]
    pub when: DateTime<Utc>,
}

/// An edge's activity flag flipped.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgeActivityEvent {
    pub edge: EdgeId,
    pub source: NodeId,
    pub animated: bool,
    #[serde(default = "Utc::now")]
    pub when: DateTime<Utc>,
}

/// A settle pass finished.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettledEvent {
    pub rounds: u32,
    pub status_writes: usize,
    pub edge_writes: usize,
    pub converged: bool,
    #[serde(default = "Utc::now")]
    pub when: DateTime<Utc>,
}

/// Engine-scoped observation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosticEvent {
    pub scope: String,
    pub message: String,
}

impl Event {
    pub fn node_status(
        node: NodeId,
        kind: NodeKind,
        previous: StatusModel,
        current: StatusModel,
    ) -> Self {
        Event::NodeStatus(NodeStatusEvent {
            node,
            kind,
            previous,
            current,
            when: Utc::now(),
        })
    }

    pub fn edge_activity(edge: EdgeId, source: NodeId, animated: bool) -> Self {
        Event::EdgeActivity(EdgeActivityEvent {
            edge,
            source,
            animated,
            when: Utc::now(),
        })
    }

    pub fn settled(rounds: u32, status_writes: usize, edge_writes: usize, converged: bool) -> Self {
        Event::Settled(SettledEvent {
            rounds,
            status_writes,
            edge_writes,
            converged,
            when: Utc::now(),
        })
    }

    pub fn diagnostic(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Event::Diagnostic(DiagnosticEvent {
            scope: scope.into(),
            message: message.into(),
        })
    }

    /// Short label identifying what the event is about.
    pub fn scope_label(&self) -> &str {
        match self {
            Event::NodeStatus(e) => e.node.as_str(),
            Event::EdgeActivity(e) => e.edge.as_str(),
            Event::Settled(_) => "settle",
            Event::Diagnostic(e) => e.scope.as_str(),
        }
    }

    /// Convert the event to a structured JSON value with a normalized
    /// schema: `{"type", "scope", "payload"}`.
    pub fn to_json_value(&self) -> Value {
        let (event_type, payload) = match self {
            Event::NodeStatus(e) => ("node_status", json!(e)),
            Event::EdgeActivity(e) => ("edge_activity", json!(e)),
            Event::Settled(e) => ("settled", json!(e)),
            Event::Diagnostic(e) => ("diagnostic", json!(e)),
        };
        json!({
            "type": event_type,
            "scope": self.scope_label(),
            "payload": payload,
        })
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::NodeStatus(e) => write!(
                f,
                "[{}] {} status: {} -> {}",
                e.kind, e.node, e.previous, e.current
            ),
            Event::EdgeActivity(e) => {
                write!(f, "[edge] {} ({}) animated={}", e.edge, e.source, e.animated)
            }
            Event::Settled(e) => write!(
                f,
                "[settle] rounds={} status_writes={} edge_writes={} converged={}",
                e.rounds, e.status_writes, e.edge_writes, e.converged
            ),
            Event::Diagnostic(e) => write!(f, "[{}] {}", e.scope, e.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OperationalStatus, RuntimeStatus, StatusSource};

    #[test]
    fn json_schema_is_normalized() {
        let event = Event::edge_activity("e1".into(), "a1".into(), true);
        let value = event.to_json_value();
        assert_eq!(value["type"], "edge_activity");
        assert_eq!(value["scope"], "e1");
        assert_eq!(value["payload"]["animated"], true);
    }

    #[test]
    fn scope_labels() {
        let model = StatusModel::new(
            OperationalStatus::Active,
            RuntimeStatus::Active,
            StatusSource::Own,
        );
        let event = Event::node_status("a1".into(), NodeKind::Adapter, model, model);
        assert_eq!(event.scope_label(), "a1");
        assert_eq!(Event::settled(2, 3, 1, true).scope_label(), "settle");
        assert_eq!(Event::diagnostic("engine", "msg").scope_label(), "engine");
    }
}
