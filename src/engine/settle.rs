//! The settle loop: deterministic rounds of re-evaluation until quiescence.

use tracing::instrument;

use super::invalidation::InvalidationState;
use super::settings::EngineSettings;
use crate::config::{ConnectionReport, NodeConfig};
use crate::event_bus::{Event, EventBus};
use crate::status::{self, desired_edge_activity, publisher};
use crate::store::{EdgeRecord, StoreError, TopologyStore};
use crate::types::{EdgeId, NodeId, StatusModel};
use crate::utils::id_generator::IdGenerator;

/// Result of driving one settle pass to quiescence (or to the round cap).
///
/// # Examples
///
/// ```rust,no_run
/// use topolight::engine::SettleReport;
///
/// fn analyze(report: &SettleReport) {
///     println!("settled in {} rounds", report.rounds);
///     println!(
///         "evaluated {} nodes, skipped {}",
///         report.evaluated.len(),
///         report.skipped.len()
///     );
///     if !report.converged {
///         println!("round cap hit; check the topology for cycles");
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettleReport {
    /// Number of rounds the pass ran.
    pub rounds: u32,
    /// Nodes that were re-derived, in evaluation order.
    pub evaluated: Vec<NodeId>,
    /// Dirty nodes skipped because their recorded input versions matched.
    pub skipped: Vec<NodeId>,
    /// Effective status publications (suppressed no-op writes not counted).
    pub status_writes: usize,
    /// Effective edge activity rewrites.
    pub edge_writes: usize,
    /// `false` only when the round cap was hit before quiescence.
    pub converged: bool,
}

/// The Topology Status Propagation Engine.
///
/// Owns the [`TopologyStore`] and funnels every mutation through its API so
/// each change marks exactly the affected nodes dirty. [`settle`](Self::settle)
/// then re-derives statuses in deterministic rounds until no further writes
/// occur. The caller decides when to settle: after a single edit for
/// interactive use, or after a batch of edits for bulk loads.
///
/// # Examples
///
/// ```rust
/// use topolight::builder::TopologyBuilder;
/// use topolight::config::{AdapterConfig, ConnectionReport, NodeConfig, NorthboundMapping};
/// use topolight::types::RuntimeStatus;
///
/// # fn main() -> miette::Result<()> {
/// let mut engine = TopologyBuilder::new()
///     .add_node(
///         "a1",
///         NodeConfig::Adapter(
///             AdapterConfig::new("opcua")
///                 .with_northbound(NorthboundMapping::new("tank/level", "site/tank/level")),
///         ),
///     )
///     .with_silent_events()
///     .compile()?;
/// engine.settle();
///
/// engine.apply_connection_report(&"a1".into(), ConnectionReport::connected())?;
/// let report = engine.settle();
/// assert_eq!(report.status_writes, 1);
/// assert_eq!(
///     engine.status_of(&"a1".into()).unwrap().runtime,
///     RuntimeStatus::Active
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TopologyEngine {
    store: TopologyStore,
    invalidation: InvalidationState,
    settings: EngineSettings,
    event_bus: EventBus,
    edge_ids: IdGenerator,
}

impl TopologyEngine {
    /// Create an engine over an empty topology.
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        let event_bus = settings.event_bus.build_event_bus();
        Self::from_parts(TopologyStore::new(), settings, event_bus)
    }

    /// Internal (crate) factory used by the builder; every pre-loaded node
    /// is enqueued for its initial evaluation.
    pub(crate) fn from_parts(
        store: TopologyStore,
        settings: EngineSettings,
        event_bus: EventBus,
    ) -> Self {
        let mut invalidation = InvalidationState::default();
        for id in store.node_ids() {
            invalidation.mark_dirty(id);
        }
        Self {
            store,
            invalidation,
            settings,
            event_bus,
            edge_ids: IdGenerator::new("edge"),
        }
    }

    /// Read access to the underlying store.
    #[must_use]
    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The bus engine events are emitted on; attach sinks here before
    /// settling to observe status changes.
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// A node's last published status.
    #[must_use]
    pub fn status_of(&self, id: &NodeId) -> Option<StatusModel> {
        self.store.get_node(id).map(|record| record.status)
    }

    /// An edge's current activity flag.
    #[must_use]
    pub fn edge_animated(&self, id: &EdgeId) -> Option<bool> {
        self.store.get_edge(id).map(|edge| edge.animated)
    }

    // ------------------------------------------------------------------
    // Mutation API
    // ------------------------------------------------------------------

    /// Insert a node; it is enqueued for its initial evaluation.
    pub fn insert_node(
        &mut self,
        id: impl Into<NodeId>,
        config: NodeConfig,
    ) -> Result<(), StoreError> {
        let id = id.into();
        self.store.insert_node(id.clone(), config)?;
        self.invalidation.mark_dirty(id);
        Ok(())
    }

    /// Remove a node together with its incident edges. Surviving neighbors
    /// that read the node (or lost an edge) are enqueued for re-evaluation.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<(), StoreError> {
        let dependents = self.store.dependents_of(id);
        let (_, removed_edges) = self.store.remove_node(id)?;
        self.invalidation.forget(id);
        for dependent in dependents {
            self.invalidation.mark_dirty(dependent);
        }
        for edge in removed_edges {
            for endpoint in [edge.source, edge.target] {
                if self.store.get_node(&endpoint).is_some() {
                    self.invalidation.mark_dirty(endpoint);
                }
            }
        }
        Ok(())
    }

    /// Insert an edge with an explicit id. Both endpoints are enqueued:
    /// either side may gain a dependency or a flag to annotate.
    pub fn insert_edge(&mut self, edge: EdgeRecord) -> Result<(), StoreError> {
        let (source, target) = (edge.source.clone(), edge.target.clone());
        self.store.insert_edge(edge)?;
        self.invalidation.mark_dirty(source);
        self.invalidation.mark_dirty(target);
        Ok(())
    }

    /// Insert an edge with a generated id and return it.
    pub fn connect(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Result<EdgeId, StoreError> {
        let id = EdgeId::new(self.edge_ids.generate());
        self.insert_edge(EdgeRecord {
            id: id.clone(),
            source: source.into(),
            target: target.into(),
            handle: None,
            animated: false,
        })?;
        Ok(id)
    }

    /// Remove an edge; both surviving endpoints are enqueued.
    pub fn remove_edge(&mut self, id: &EdgeId) -> Result<(), StoreError> {
        let edge = self.store.remove_edge(id)?;
        for endpoint in [edge.source, edge.target] {
            if self.store.get_node(&endpoint).is_some() {
                self.invalidation.mark_dirty(endpoint);
            }
        }
        Ok(())
    }

    /// Replace a node's configuration. Returns whether anything changed;
    /// an effective change enqueues the node.
    pub fn update_config(&mut self, id: &NodeId, config: NodeConfig) -> Result<bool, StoreError> {
        let changed = self.store.update_config(id, config)?;
        if changed {
            self.invalidation.mark_dirty(id.clone());
        }
        Ok(changed)
    }

    /// Merge a fresh backend connectivity report into a root node.
    pub fn apply_connection_report(
        &mut self,
        id: &NodeId,
        report: ConnectionReport,
    ) -> Result<bool, StoreError> {
        let changed = self.store.apply_connection_report(id, report)?;
        if changed {
            self.invalidation.mark_dirty(id.clone());
        }
        Ok(changed)
    }

    // ------------------------------------------------------------------
    // Settle loop
    // ------------------------------------------------------------------

    /// Drain the dirty set in deterministic rounds until quiescence.
    ///
    /// Each round evaluates the currently-dirty nodes in id order: derive
    /// operational and runtime status, publish write-if-changed, and (for
    /// edge originators) re-annotate outgoing edges. An effective status
    /// publication enqueues the node's dependents for the next round, so a
    /// change at a root reaches all transitive dependents within
    /// `depth(graph)` rounds and then quiesces.
    ///
    /// The loop is bounded by [`EngineSettings::max_rounds`]; an acyclic
    /// topology never reaches the cap. Hitting it (construction rules were
    /// bypassed and a dependency cycle exists) logs a warning and reports
    /// `converged = false` instead of spinning.
    #[instrument(skip(self), fields(nodes = self.store.node_count()))]
    pub fn settle(&mut self) -> SettleReport {
        let mut report = SettleReport {
            converged: true,
            ..Default::default()
        };

        while !self.invalidation.is_quiescent() {
            if report.rounds >= self.settings.max_rounds {
                tracing::warn!(
                    rounds = report.rounds,
                    max_rounds = self.settings.max_rounds,
                    "settle round cap hit before quiescence; topology may contain a dependency cycle"
                );
                self.event_bus.emit(Event::diagnostic(
                    "engine",
                    format!(
                        "settle round cap ({}) hit before quiescence",
                        self.settings.max_rounds
                    ),
                ));
                report.converged = false;
                break;
            }
            report.rounds += 1;

            for id in self.invalidation.take_dirty() {
                // A node removed mid-cascade no longer resolves; its
                // pending recomputation is simply discarded.
                if self.store.get_node(&id).is_none() {
                    self.invalidation.forget(&id);
                    continue;
                }
                if !self.invalidation.should_run(&self.store, &id) {
                    report.skipped.push(id);
                    continue;
                }
                self.evaluate_node(&id, &mut report);
            }
        }

        tracing::debug!(
            rounds = report.rounds,
            status_writes = report.status_writes,
            edge_writes = report.edge_writes,
            converged = report.converged,
            "settle pass finished"
        );
        self.event_bus.emit(Event::settled(
            report.rounds,
            report.status_writes,
            report.edge_writes,
            report.converged,
        ));
        report
    }

    fn evaluate_node(&mut self, id: &NodeId, report: &mut SettleReport) {
        let Some(model) = status::evaluate(&self.store, id, self.settings.aggregation_policy)
        else {
            return;
        };
        let kind = match self.store.get_node(id) {
            Some(record) => record.kind(),
            None => return,
        };

        let outcome = match publisher::publish(&mut self.store, id, model) {
            Ok(outcome) => outcome,
            // The record was present a moment ago; treat a racing removal
            // as a discarded evaluation.
            Err(_) => return,
        };
        self.invalidation.record_seen(&self.store, id);
        report.evaluated.push(id.clone());

        if outcome.changed {
            report.status_writes += 1;
            self.event_bus.emit(Event::node_status(
                id.clone(),
                kind,
                outcome.previous,
                outcome.current,
            ));
            for dependent in self.store.dependents_of(id) {
                self.invalidation.mark_dirty(dependent);
            }
        }

        // Edge activity depends on the node's configuration as well as its
        // runtime, so originators re-annotate on every evaluation even
        // when the published status is unchanged.
        if kind.originates_edges() {
            for (edge_id, animated) in desired_edge_activity(&self.store, id) {
                match self.store.set_edge_animated(&edge_id, animated) {
                    Ok(true) => {
                        report.edge_writes += 1;
                        self.event_bus
                            .emit(Event::edge_activity(edge_id, id.clone(), animated));
                    }
                    Ok(false) => {}
                    Err(_) => {}
                }
            }
        }
    }
}
