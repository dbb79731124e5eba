//! Player-facing error reporting.

use std::sync::{Arc, Mutex};

/// Sink for messages the player must see.
///
/// Gameplay errors (insufficient funds, failed saves) are reported here;
/// they never abort the session.
pub trait ErrorReporter {
    /// Show a message, replacing whatever was shown before.
    fn show(&self, message: &str);

    /// Clear the currently shown message.
    fn dismiss(&self);
}

#[derive(Debug, Default)]
struct Panel {
    message: String,
    visible: bool,
}

/// Reporter backed by a shared panel. Clones observe the same panel, so
/// tests can hold one handle and assert on what the recorder reported.
#[derive(Debug, Clone, Default)]
pub struct PanelReporter {
    panel: Arc<Mutex<Panel>>,
}

impl PanelReporter {
    /// Create a reporter with a hidden, empty panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently shown message, if the panel is visible.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let panel = self.panel.lock().ok()?;
        panel.visible.then(|| panel.message.clone())
    }

    /// Whether the panel is currently visible.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.panel.lock().map(|p| p.visible).unwrap_or(false)
    }
}

impl ErrorReporter for PanelReporter {
    fn show(&self, message: &str) {
        if let Ok(mut panel) = self.panel.lock() {
            panel.message = message.to_string();
            panel.visible = true;
        }
    }

    fn dismiss(&self) {
        if let Ok(mut panel) = self.panel.lock() {
            panel.message.clear();
            panel.visible = false;
        }
    }
}

/// Reporter that forwards messages to the tracing subscriber. Used by the
/// CLI, where there is no panel to show.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn show(&self, message: &str) {
        tracing::warn!(message, "player-facing error");
    }

    fn dismiss(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_starts_hidden() {
        let reporter = PanelReporter::new();
        assert!(!reporter.visible());
        assert_eq!(reporter.message(), None);
    }

    #[test]
    fn test_show_replaces_previous_message() {
        let reporter = PanelReporter::new();
        reporter.show("first");
        reporter.show("second");
        assert_eq!(reporter.message().as_deref(), Some("second"));
    }

    #[test]
    fn test_dismiss_hides_the_panel() {
        let reporter = PanelReporter::new();
        reporter.show("oops");
        reporter.dismiss();
        assert!(!reporter.visible());
        assert_eq!(reporter.message(), None);
    }

    #[test]
    fn test_clones_observe_the_same_panel() {
        let reporter = PanelReporter::new();
        let observer = reporter.clone();
        reporter.show("shared");
        assert_eq!(observer.message().as_deref(), Some("shared"));
    }
}
