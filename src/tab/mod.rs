//! Search tab management
//!
//! This module provides the tab infrastructure of the explorer:
//! - `SearchTab`: one independent search session (query, focus subject, rendered snapshot)
//! - `SearchTabManager`: coordinates the tabs and the view they share
//! - `TabId`: unique identifier for each tab

mod manager;

pub use manager::{DeleteOutcome, SearchTabManager, TabError};

use crate::search::SearchId;
use crate::view::Snapshot;
use chrono::{DateTime, Local};

/// Unique identifier for a tab; assigned in creation order and never reused.
pub type TabId = u64;

/// Observable mode of a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabMode {
    /// Never searched: no rendered snapshot
    Empty,
    /// Holds the rendered results of its last completed search
    Populated,
}

/// One independent search session.
#[derive(Debug, Clone)]
pub struct SearchTab {
    /// Unique identifier for this tab
    pub id: TabId,
    /// Label shown in the tab list
    pub display_name: String,
    /// Last search string entered while this tab was active
    pub query_text: String,
    /// Resolved subject of the most recent completed search
    pub focus_subject: Option<String>,
    /// Rendered results of the last completed search
    pub rendered_snapshot: Option<Snapshot>,
    /// Creation time (informational)
    pub created_at: DateTime<Local>,
    /// Newest search started from this tab that has not completed yet
    pending_search: Option<SearchId>,
}

impl SearchTab {
    /// Create a tab with a generated name such as "Search 3"
    pub(crate) fn new(id: TabId, prefix: &str, tab_number: usize) -> Self {
        Self {
            id,
            display_name: format!("{prefix} {tab_number}"),
            query_text: String::new(),
            focus_subject: None,
            rendered_snapshot: None,
            created_at: Local::now(),
            pending_search: None,
        }
    }

    pub fn mode(&self) -> TabMode {
        if self.rendered_snapshot.is_some() {
            TabMode::Populated
        } else {
            TabMode::Empty
        }
    }

    pub fn is_searching(&self) -> bool {
        self.pending_search.is_some()
    }

    pub(crate) fn pending_search(&self) -> Option<SearchId> {
        self.pending_search
    }

    pub(crate) fn set_pending_search(&mut self, search_id: Option<SearchId>) {
        self.pending_search = search_id;
    }

    /// No query, focus subject or results have ever been recorded
    pub fn is_untouched(&self) -> bool {
        self.query_text.is_empty()
            && self.focus_subject.is_none()
            && self.rendered_snapshot.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tab_is_empty_and_named() {
        let tab = SearchTab::new(7, "Search", 2);
        assert_eq!(tab.id, 7);
        assert_eq!(tab.display_name, "Search 2");
        assert_eq!(tab.mode(), TabMode::Empty);
        assert!(tab.is_untouched());
        assert!(!tab.is_searching());
    }

    #[test]
    fn tab_with_results_is_not_untouched() {
        let mut tab = SearchTab::new(1, "Search", 1);
        tab.rendered_snapshot = Some(Snapshot::new());
        assert!(!tab.is_untouched());
    }

    #[test]
    fn snapshot_makes_tab_populated() {
        let mut tab = SearchTab::new(1, "Search", 1);
        tab.rendered_snapshot = Some(Snapshot::new());
        assert_eq!(tab.mode(), TabMode::Populated);
    }
}
