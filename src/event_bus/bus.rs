use std::fmt;
use std::sync::{Arc, Mutex};

use super::event::Event;
use super::sink::{EventSink, StdOutSink};

/// EventBus receives engine events and broadcasts them to multiple sinks.
///
/// Dispatch is synchronous: `emit` hands the event to every sink before
/// returning, matching the engine's single-threaded evaluation model. A
/// sink that fails is logged and skipped; one misbehaving consumer never
/// poisons the propagation pass.
#[derive(Clone)]
pub struct EventBus {
    sinks: Arc<Mutex<Vec<Box<dyn EventSink>>>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sink_count = self.sinks.lock().map(|s| s.len()).unwrap_or(0);
        f.debug_struct("EventBus")
            .field("sinks", &sink_count)
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_sink(StdOutSink::default())
    }
}

impl EventBus {
    /// Create an EventBus with no sinks; events are dropped until one is
    /// added.
    pub fn empty() -> Self {
        Self {
            sinks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create an EventBus with a single sink.
    pub fn with_sink<T>(sink: T) -> Self
    where
        T: EventSink + 'static,
    {
        Self {
            sinks: Arc::new(Mutex::new(vec![Box::new(sink)])),
        }
    }

    /// Create an EventBus with multiple sinks.
    pub fn with_sinks(sinks: Vec<Box<dyn EventSink>>) -> Self {
        Self {
            sinks: Arc::new(Mutex::new(sinks)),
        }
    }

    /// Dynamically add a sink (useful for attaching a consumer mid-session).
    pub fn add_sink<T: EventSink + 'static>(&self, sink: T) {
        self.sinks.lock().unwrap().push(Box::new(sink));
    }

    /// Add an already-boxed sink.
    pub fn add_boxed_sink(&self, sink: Box<dyn EventSink>) {
        self.sinks.lock().unwrap().push(sink);
    }

    /// Broadcast an event to all sinks.
    pub fn emit(&self, event: Event) {
        let mut sinks = self.sinks.lock().expect("event bus sinks poisoned");
        for sink in sinks.iter_mut() {
            if let Err(error) = sink.handle(&event) {
                tracing::warn!(%error, "event sink failed to handle event");
            }
        }
    }
}
