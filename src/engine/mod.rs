//! The propagation engine: incremental invalidation plus the settle loop.
//!
//! There is no central scheduler in the reactive sense; the engine is the
//! explicit, deterministic replacement for one. Mutations mark the nodes
//! whose declared inputs changed; [`TopologyEngine::settle`] re-derives
//! exactly those nodes, publishes write-if-changed, and lets effective
//! publications cascade to dependents round by round until no further
//! writes occur.
//!
//! Correctness relies on two properties rather than on evaluation order:
//! re-evaluating a node with the same inputs always yields the same output
//! (idempotent recomputation), and a publish that changes nothing triggers
//! nothing (the write-if-changed discipline). Together they bound any
//! cascade to `depth(graph)` rounds.

mod invalidation;
mod settings;
mod settle;

pub use settings::{EngineSettings, EventBusConfig, SinkConfig};
pub use settle::{SettleReport, TopologyEngine};
