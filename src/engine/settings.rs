use crate::event_bus::{EventBus, MemorySink, StdOutSink};
use crate::status::AggregationPolicy;

/// Engine-level settings: the combiner aggregation policy, the defensive
/// round cap of the settle loop, and the event bus wiring.
#[derive(Clone, Debug)]
pub struct EngineSettings {
    /// Upper bound on settle rounds. A healthy acyclic topology quiesces
    /// within `depth(graph)` rounds; hitting this cap means the
    /// construction rules were bypassed and is reported, not fatal.
    pub max_rounds: u32,
    /// Aggregation rule for multi-parent derived kinds.
    pub aggregation_policy: AggregationPolicy,
    /// Sinks the engine's event bus is built with.
    pub event_bus: EventBusConfig,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_rounds: Self::resolve_max_rounds(None),
            aggregation_policy: AggregationPolicy::default(),
            event_bus: EventBusConfig::default(),
        }
    }
}

impl EngineSettings {
    pub const DEFAULT_MAX_ROUNDS: u32 = 64;

    fn resolve_max_rounds(provided: Option<u32>) -> u32 {
        if let Some(rounds) = provided {
            return rounds;
        }
        dotenvy::dotenv().ok();
        std::env::var("TOPOLIGHT_MAX_ROUNDS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(Self::DEFAULT_MAX_ROUNDS)
    }

    pub fn new(max_rounds: Option<u32>, aggregation_policy: AggregationPolicy) -> Self {
        Self {
            max_rounds: Self::resolve_max_rounds(max_rounds),
            aggregation_policy,
            event_bus: EventBusConfig::default(),
        }
    }

    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    #[must_use]
    pub fn with_aggregation_policy(mut self, policy: AggregationPolicy) -> Self {
        self.aggregation_policy = policy;
        self
    }

    #[must_use]
    pub fn with_event_bus(mut self, event_bus: EventBusConfig) -> Self {
        self.event_bus = event_bus;
        self
    }

    #[must_use]
    pub fn with_silent_event_bus(self) -> Self {
        self.with_event_bus(EventBusConfig::silent())
    }
}

/// Declarative sink selection for the engine's event bus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkConfig {
    StdOut,
    Memory,
}

#[derive(Clone, Debug)]
pub struct EventBusConfig {
    pub sinks: Vec<SinkConfig>,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self::with_stdout_only()
    }
}

impl EventBusConfig {
    #[must_use]
    pub fn new(sinks: Vec<SinkConfig>) -> Self {
        Self { sinks }
    }

    /// No sinks at all; events are dropped unless a sink is attached later.
    #[must_use]
    pub fn silent() -> Self {
        Self::new(Vec::new())
    }

    #[must_use]
    pub fn with_stdout_only() -> Self {
        Self::new(vec![SinkConfig::StdOut])
    }

    #[must_use]
    pub fn add_sink(mut self, sink: SinkConfig) -> Self {
        if !self.sinks.contains(&sink) {
            self.sinks.push(sink);
        }
        self
    }

    pub fn build_event_bus(&self) -> EventBus {
        let bus = EventBus::empty();
        for sink in &self.sinks {
            match sink {
                SinkConfig::StdOut => bus.add_sink(StdOutSink::default()),
                SinkConfig::Memory => bus.add_sink(MemorySink::new()),
            }
        }
        bus
    }
}
