//! In-memory result screen for the terminal front-end.

use super::{Panel, PanelState, Snapshot, ViewRenderer};
use crate::format;

/// Placeholder shown for a tab that has not been searched yet.
pub const EMPTY_PLACEHOLDER: &str = "Enter a protein name to start exploring.";

/// The "page" the terminal front-end draws: search input, a transient
/// status line, and the result panels.
#[derive(Debug, Clone, Default)]
pub struct PanelView {
    input: String,
    status: Option<String>,
    screen: Snapshot,
}

impl PanelView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transient message next to the search input (validation errors etc.)
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// True while nothing has been rendered into the results container
    pub fn is_empty(&self) -> bool {
        !self.screen.results_visible()
    }

    pub fn panel(&self, panel: Panel) -> Option<&PanelState> {
        self.screen.panel(panel)
    }

    /// Visible panels in display order
    pub fn visible_panels(&self) -> Vec<(Panel, &PanelState)> {
        if !self.screen.results_visible() {
            return Vec::new();
        }
        self.screen
            .panels()
            .filter(|(_, state)| state.visible)
            .collect()
    }

    /// Concatenated HTML of the visible panels, one `<section>` per panel
    pub fn render_html(&self) -> String {
        self.visible_panels()
            .into_iter()
            .map(|(panel, state)| {
                format!(
                    "<section class=\"{}\"><h3>{}</h3>{}</section>",
                    panel_class(panel),
                    panel.title(),
                    state.html
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Plain-text rendering for the terminal
    pub fn render_text(&self) -> String {
        let panels = self.visible_panels();
        if panels.is_empty() {
            return EMPTY_PLACEHOLDER.to_string();
        }

        let mut out = String::new();
        for (panel, state) in panels {
            out.push_str(&format!("== {} ==\n", panel.title()));
            let text = format::html_to_text(&state.html);
            if !text.is_empty() {
                out.push_str(&text);
                out.push('\n');
            }
            out.push('\n');
        }
        out.trim_end().to_string()
    }
}

fn panel_class(panel: Panel) -> &'static str {
    match panel {
        Panel::SearchResults => "search-results",
        Panel::ProteinInfo => "protein-info-section",
        Panel::Structure => "structure-section",
        Panel::Analysis => "analysis-section",
        Panel::Drugs => "drugs-section",
    }
}

impl ViewRenderer for PanelView {
    fn save_visible_state(&self) -> Snapshot {
        self.screen.clone()
    }

    fn restore_visible_state(&mut self, snapshot: Option<&Snapshot>) {
        self.screen = snapshot.cloned().unwrap_or_default();
    }

    fn input_text(&self) -> String {
        self.input.clone()
    }

    fn set_input_text(&mut self, text: &str) {
        self.input = text.to_string();
    }

    fn clear_transient(&mut self) {
        self.status = None;
    }

    fn show_panel(&mut self, panel: Panel, state: PanelState) {
        self.screen.set_results_visible(true);
        self.screen.set_panel(panel, state);
    }
}
