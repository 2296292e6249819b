//! Result views and their snapshots.
//!
//! This module provides the boundary between the tab manager and whatever
//! draws search results:
//! - `ViewRenderer`: the two verbs the manager needs (save / restore) plus the live search input
//! - `Snapshot`: an opaque capture of rendered results
//! - `Panel` / `PanelState`: the result panels a snapshot is made of
//! - `PanelView`: the in-memory screen used by the terminal front-end

mod panels;

pub use panels::PanelView;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The result panels of the explorer page, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    /// Query refinement status
    SearchResults,
    /// UniProt details with the embedded structure block
    ProteinInfo,
    /// Stand-alone structure section (superseded by the embedded block)
    Structure,
    /// Textual analysis
    Analysis,
    /// ChEMBL drug associations
    Drugs,
}

impl Panel {
    /// All panels in display order
    pub fn all() -> &'static [Panel] {
        &[
            Panel::SearchResults,
            Panel::ProteinInfo,
            Panel::Structure,
            Panel::Analysis,
            Panel::Drugs,
        ]
    }

    /// Heading shown above the panel
    pub fn title(&self) -> &'static str {
        match self {
            Panel::SearchResults => "Search",
            Panel::ProteinInfo => "Protein Information",
            Panel::Structure => "3D Structure",
            Panel::Analysis => "Protein Analysis",
            Panel::Drugs => "Drug Associations",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Visibility and content of one panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelState {
    pub visible: bool,
    pub html: String,
}

impl PanelState {
    /// A visible panel with the given content
    pub fn shown(html: impl Into<String>) -> Self {
        Self {
            visible: true,
            html: html.into(),
        }
    }

    /// A hidden panel that keeps whatever content it had
    pub fn hidden(html: impl Into<String>) -> Self {
        Self {
            visible: false,
            html: html.into(),
        }
    }
}

/// Opaque capture of a view's rendered results.
///
/// Produced and consumed by a [`ViewRenderer`]; the tab manager only stores
/// and replays it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    results_visible: bool,
    panels: BTreeMap<Panel, PanelState>,
}

impl Snapshot {
    /// Start an empty capture (results container hidden, no panels).
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_results_visible(&mut self, visible: bool) {
        self.results_visible = visible;
    }

    pub(crate) fn results_visible(&self) -> bool {
        self.results_visible
    }

    pub(crate) fn set_panel(&mut self, panel: Panel, state: PanelState) {
        self.panels.insert(panel, state);
    }

    /// Change visibility of a panel, keeping its content.
    pub(crate) fn set_panel_visible(&mut self, panel: Panel, visible: bool) {
        self.panels.entry(panel).or_default().visible = visible;
    }

    pub(crate) fn panel(&self, panel: Panel) -> Option<&PanelState> {
        self.panels.get(&panel)
    }

    pub(crate) fn panels(&self) -> impl Iterator<Item = (Panel, &PanelState)> {
        self.panels.iter().map(|(panel, state)| (*panel, state))
    }
}

/// What the tab manager needs from the component that draws results.
///
/// Implemented by [`PanelView`] and by recording fakes in tests.
pub trait ViewRenderer {
    /// Capture everything currently on screen.
    fn save_visible_state(&self) -> Snapshot;

    /// Put a capture back on screen, or show the empty placeholder for `None`.
    fn restore_visible_state(&mut self, snapshot: Option<&Snapshot>);

    /// Current contents of the search input.
    fn input_text(&self) -> String;

    fn set_input_text(&mut self, text: &str);

    /// Clear transient UI next to the search input (suggestions, errors, ...).
    fn clear_transient(&mut self) {}

    /// Mount a single panel update while a search is running.
    fn show_panel(&mut self, panel: Panel, state: PanelState);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_panel_visible_keeps_content() {
        let mut snapshot = Snapshot::new();
        snapshot.set_panel(Panel::Analysis, PanelState::shown("<p>x</p>"));
        snapshot.set_panel_visible(Panel::Analysis, false);

        assert_eq!(
            snapshot.panel(Panel::Analysis),
            Some(&PanelState::hidden("<p>x</p>"))
        );
    }

    #[test]
    fn hiding_an_unknown_panel_creates_an_empty_hidden_one() {
        let mut snapshot = Snapshot::new();
        snapshot.set_panel_visible(Panel::Structure, false);
        assert_eq!(
            snapshot.panel(Panel::Structure),
            Some(&PanelState::default())
        );
    }

    #[test]
    fn panels_iterate_in_display_order() {
        let mut snapshot = Snapshot::new();
        snapshot.set_panel(Panel::Drugs, PanelState::shown("d"));
        snapshot.set_panel(Panel::SearchResults, PanelState::shown("s"));
        let order: Vec<Panel> = snapshot.panels().map(|(panel, _)| panel).collect();
        assert_eq!(order, vec![Panel::SearchResults, Panel::Drugs]);
    }
}
