//! The Local Status Deriver.
//!
//! `operational` answers one question per kind: does this node's own
//! configuration contain at least one meaningful routing artifact? It is a
//! pure function of the configuration payload, never of neighboring
//! nodes, and has no error cases: absent or empty collections simply
//! evaluate to inactive.

use crate::config::NodeConfig;
use crate::types::OperationalStatus;

/// Derive a node's operational status from its own configuration.
///
/// Kind rules:
/// - **Adapter**: active iff it has at least one northbound mapping, and,
///   when bidirectional, at least one southbound mapping as well. A
///   read-only adapter needs no southbound mappings.
/// - **Bridge**: active iff at least one local or remote topic filter is
///   configured.
/// - **Device**: active iff it exposes at least one tag.
/// - **Combiner**: active iff it has at least one data-combining mapping.
/// - **Host, Listener, AssetManager, EdgeBroker**: always active; they
///   represent an always-meaningful endpoint or service, not a
///   user-configured routing unit.
/// - **Group**: conservatively inactive; a grouping container carries no
///   routing artifacts of its own.
#[must_use]
pub fn derive_operational(config: &NodeConfig) -> OperationalStatus {
    match config {
        NodeConfig::Adapter(adapter) => {
            let northbound_ok = !adapter.northbound.is_empty();
            let southbound_ok = !adapter.bidirectional || !adapter.southbound.is_empty();
            OperationalStatus::from_bool(northbound_ok && southbound_ok)
        }
        NodeConfig::Bridge(bridge) => OperationalStatus::from_bool(
            !bridge.local_filters.is_empty() || !bridge.remote_filters.is_empty(),
        ),
        NodeConfig::Device(device) => OperationalStatus::from_bool(!device.tags.is_empty()),
        NodeConfig::Combiner(combiner) => {
            OperationalStatus::from_bool(!combiner.mappings.is_empty())
        }
        NodeConfig::Host(_)
        | NodeConfig::Listener(_)
        | NodeConfig::AssetManager
        | NodeConfig::EdgeBroker(_) => OperationalStatus::Active,
        NodeConfig::Group => OperationalStatus::Inactive,
    }
}
