use std::io::IsTerminal;

use miette::IntoDiagnostic;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::event_bus::Event;
use crate::store::TopologyStore;

pub const ACTIVE_COLOR: &str = "\x1b[32m"; // green
pub const INACTIVE_COLOR: &str = "\x1b[35m"; // magenta / dark pink
pub const RESET_COLOR: &str = "\x1b[0m";

/// Formatter color mode for telemetry output.
///
/// Controls whether ANSI color codes are included in formatted output:
/// - [`FormatterMode::Auto`]: Automatically detects TTY capability via `stderr.is_terminal()`
/// - [`FormatterMode::Colored`]: Always include color codes (for forced color output)
/// - [`FormatterMode::Plain`]: Never include color codes (for logs/files)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatterMode {
    /// Auto-detect TTY capability (checks `stderr.is_terminal()`)
    #[default]
    Auto,
    /// Always include ANSI color codes
    Colored,
    /// Never include ANSI color codes
    Plain,
}

impl FormatterMode {
    /// Auto-detect formatter mode based on stderr TTY capability.
    pub fn auto_detect() -> Self {
        if std::io::stderr().is_terminal() {
            FormatterMode::Colored
        } else {
            FormatterMode::Plain
        }
    }

    /// Returns true if this mode should use colored output.
    ///
    /// For `Auto` mode, performs TTY detection on each call.
    pub fn is_colored(&self) -> bool {
        match self {
            FormatterMode::Auto => std::io::stderr().is_terminal(),
            FormatterMode::Colored => true,
            FormatterMode::Plain => false,
        }
    }
}

/// Rendered output for a telemetry item that can be consumed by sinks.
#[derive(Clone, Debug, Default)]
pub struct EventRender {
    pub context: Option<String>,
    pub lines: Vec<String>,
}

impl EventRender {
    pub fn join_lines(&self) -> String {
        self.lines.join("")
    }
}

pub trait TelemetryFormatter: Send + Sync {
    fn render_event(&self, event: &Event) -> EventRender;
    fn render_summary(&self, store: &TopologyStore) -> EventRender;
}

/// Plain text formatter with optional ANSI color codes.
///
/// Color output is controlled by [`FormatterMode`]:
/// - `Auto`: Uses color when stderr is a TTY
/// - `Colored`: Always uses color
/// - `Plain`: Never uses color
pub struct PlainFormatter {
    mode: FormatterMode,
}

impl PlainFormatter {
    /// Create a new formatter with auto-detected color mode.
    pub fn new() -> Self {
        Self {
            mode: FormatterMode::Auto,
        }
    }

    /// Create a new formatter with explicit color mode.
    pub fn with_mode(mode: FormatterMode) -> Self {
        Self { mode }
    }

    fn paint(&self, ansi_code: &str, text: &str) -> String {
        if self.mode.is_colored() {
            format!("{ansi_code}{text}{RESET_COLOR}")
        } else {
            text.to_string()
        }
    }

    fn status_word(&self, active: bool, word: &str) -> String {
        let color = if active { ACTIVE_COLOR } else { INACTIVE_COLOR };
        self.paint(color, word)
    }
}

impl Default for PlainFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryFormatter for PlainFormatter {
    fn render_event(&self, event: &Event) -> EventRender {
        let line = match event {
            Event::NodeStatus(e) => {
                let current = self.status_word(
                    e.current.runtime.is_active(),
                    &e.current.to_string(),
                );
                format!("[{}] {} status: {} -> {}\n", e.kind, e.node, e.previous, current)
            }
            Event::EdgeActivity(e) => {
                let flag = self.status_word(e.animated, &e.animated.to_string());
                format!("[edge] {} ({}) animated={}\n", e.edge, e.source, flag)
            }
            _ => format!("{event}\n"),
        };
        EventRender {
            context: Some(event.scope_label().to_string()),
            lines: vec![line],
        }
    }

    /// Render a one-line-per-node status table, in node-id order.
    fn render_summary(&self, store: &TopologyStore) -> EventRender {
        let mut lines = Vec::new();
        for id in store.node_ids() {
            let Some(record) = store.get_node(&id) else {
                continue;
            };
            let status = record.status;
            lines.push(format!(
                "{:<16} {:<14} operational={:<18} runtime={:<18} source={}\n",
                id.to_string(),
                record.kind().to_string(),
                self.status_word(status.operational.is_active(), &status.operational.to_string()),
                self.status_word(status.runtime.is_active(), &status.runtime.to_string()),
                status.source,
            ));
        }
        for id in store.node_ids() {
            for edge in store.outgoing_edges(&id) {
                lines.push(format!(
                    "{:<16} {} -> {} animated={}\n",
                    edge.id.to_string(),
                    edge.source,
                    edge.target,
                    self.status_word(edge.animated, &edge.animated.to_string()),
                ));
            }
        }
        EventRender {
            context: Some("summary".to_string()),
            lines,
        }
    }
}

/// Install the tracing subscriber stack: env-filtered fmt output plus an
/// error layer for span traces, and miette's fancy report handler.
///
/// Intended for binaries and demos; libraries embedding the engine should
/// wire their own subscriber instead.
pub fn init_tracing() -> miette::Result<()> {
    miette::set_panic_hook();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(ErrorLayer::default())
        .try_init()
        .into_diagnostic()
}
