//! Status event fan-out for rendering and monitoring consumers.
//!
//! The engine emits an [`Event`] for every *effective* write (a node
//! status that actually changed, an edge activity flag that actually
//! flipped, a settle pass that finished), never for suppressed no-op
//! writes. Consumers attach [`EventSink`]s to the [`EventBus`]; dispatch is
//! synchronous, matching the engine's single-threaded model, and a
//! [`ChannelSink`] hands events to a flume channel when a consumer wants
//! to drain them on its own thread.

mod bus;
mod event;
mod sink;

pub use bus::EventBus;
pub use event::{
    DiagnosticEvent, EdgeActivityEvent, Event, NodeStatusEvent, SettledEvent,
};
pub use sink::{ChannelSink, EventSink, MemorySink, StdOutSink};
