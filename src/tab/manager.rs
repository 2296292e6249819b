//! Tab manager for coordinating search tabs that share one result view

use super::{SearchTab, TabId};
use crate::search::{SearchCompletion, SearchId, SearchTicket};
use crate::view::{Panel, PanelState, Snapshot, ViewRenderer};
use thiserror::Error;

/// The one reportable refusal of the tab manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TabError {
    #[error("Cannot delete the last tab. At least one tab must remain.")]
    LastTab,
}

/// Result of a delete request that was not refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The caller declined the confirmation
    Cancelled,
    /// No tab has this id
    NotFound,
}

/// Manages the search tabs and the view they take turns drawing into.
///
/// All operations are synchronous and run on the caller's thread. Exactly one
/// tab is active at any time and the collection is never emptied.
pub struct SearchTabManager<V: ViewRenderer> {
    /// All tabs, in display order
    tabs: Vec<SearchTab>,
    /// Currently active tab ID
    active_tab_id: Option<TabId>,
    /// Counter for generating unique tab IDs
    next_tab_id: TabId,
    /// Counter for search tickets; a tab only accepts its newest ticket
    next_search_id: SearchId,
    /// Prefix of generated tab names ("Search" -> "Search 2")
    name_prefix: String,
    view: V,
}

impl<V: ViewRenderer> SearchTabManager<V> {
    /// Create the manager with its single initial tab, active and shown empty.
    pub fn new(view: V, name_prefix: impl Into<String>) -> Self {
        let mut manager = Self {
            tabs: Vec::new(),
            active_tab_id: None,
            next_tab_id: 1,
            next_search_id: 1,
            name_prefix: name_prefix.into(),
            view,
        };

        let id = manager.push_tab();
        manager.active_tab_id = Some(id);
        manager.load_active();

        log::info!("Initialized tab manager with tab {}", id);
        manager
    }

    fn push_tab(&mut self) -> TabId {
        let id = self.next_tab_id;
        self.next_tab_id += 1;

        // Tab number is based on current count, not unique ID
        let tab_number = self.tabs.len() + 1;
        self.tabs
            .push(SearchTab::new(id, &self.name_prefix, tab_number));
        id
    }

    /// Create a new tab, switch to it, and return its ID
    pub fn create_tab(&mut self) -> TabId {
        let id = self.push_tab();
        self.switch_to(id);
        self.view.clear_transient();

        log::info!("Created new tab {} (total: {})", id, self.tabs.len());
        id
    }

    /// Switch to a tab by ID; unknown IDs are ignored.
    ///
    /// The outgoing tab is saved before the active ID changes, then the
    /// target tab is loaded into the view.
    pub fn switch_to(&mut self, id: TabId) {
        if !self.tabs.iter().any(|t| t.id == id) {
            log::debug!("Ignoring switch to unknown tab {}", id);
            return;
        }

        self.save_active();
        self.active_tab_id = Some(id);
        self.load_active();
        log::debug!("Switched to tab {}", id);
    }

    /// Capture what is on screen into the active tab.
    fn save_active(&mut self) {
        let Some(active_id) = self.active_tab_id else {
            return;
        };
        let snapshot = self.view.save_visible_state();
        let input = self.view.input_text();

        if let Some(tab) = self.tabs.iter_mut().find(|t| t.id == active_id) {
            // A never-searched tab showing nothing stays empty
            if tab.rendered_snapshot.is_some() || snapshot != Snapshot::default() {
                tab.rendered_snapshot = Some(snapshot);
            }
            tab.query_text = input;
        }
    }

    /// Put the active tab's saved state back on screen.
    fn load_active(&mut self) {
        let Some(tab) = self.active_tab() else {
            return;
        };
        let snapshot = tab.rendered_snapshot.clone();
        let query = tab.query_text.clone();

        self.view.restore_visible_state(snapshot.as_ref());
        self.view.set_input_text(&query);
    }

    /// Rename a tab. Blank names and unknown IDs are ignored.
    ///
    /// Returns true if the name changed.
    pub fn rename_tab(&mut self, id: TabId, proposed_name: &str) -> bool {
        let name = proposed_name.trim();
        if name.is_empty() {
            return false;
        }

        let is_active = self.active_tab_id == Some(id);
        let Some(tab) = self.get_tab_mut(id) else {
            return false;
        };

        tab.display_name = name.to_string();
        // A tab that was never searched also takes the name as its query
        let seeded = tab.is_untouched();
        if seeded {
            tab.query_text = name.to_string();
        }
        if seeded && is_active {
            self.view.set_input_text(name);
        }

        log::debug!("Renamed tab {} to '{}'", id, name);
        true
    }

    /// Delete a tab after the caller confirms it.
    ///
    /// Refused with [`TabError::LastTab`] while only one tab exists. When the
    /// active tab is deleted, the first remaining tab becomes active and is
    /// loaded.
    pub fn delete_tab(
        &mut self,
        id: TabId,
        confirm: impl FnOnce(&SearchTab) -> bool,
    ) -> Result<DeleteOutcome, TabError> {
        if self.tabs.len() <= 1 {
            log::warn!("Refusing to delete tab {}: it is the last tab", id);
            return Err(TabError::LastTab);
        }

        let Some(idx) = self.tabs.iter().position(|t| t.id == id) else {
            return Ok(DeleteOutcome::NotFound);
        };
        if !confirm(&self.tabs[idx]) {
            log::debug!("Deletion of tab {} cancelled", id);
            return Ok(DeleteOutcome::Cancelled);
        }

        log::info!("Deleting tab {} (index {})", id, idx);
        self.tabs.remove(idx);

        if self.active_tab_id == Some(id) {
            self.active_tab_id = self.tabs.first().map(|t| t.id);
            self.load_active();
        }

        Ok(DeleteOutcome::Deleted)
    }

    /// Store the on-screen results, query and resolved subject in the
    /// active tab.
    pub fn capture_active_tab_snapshot(&mut self, subject: Option<&str>) {
        let snapshot = self.view.save_visible_state();
        let input = self.view.input_text();

        if let Some(tab) = self.active_tab_mut() {
            tab.rendered_snapshot = Some(snapshot);
            tab.query_text = input;
            if let Some(subject) = subject {
                tab.focus_subject = Some(subject.to_string());
            }
            log::debug!("Captured snapshot for tab {}", tab.id);
        }
    }

    /// Record a search started from `tab_id` and hand out its ticket.
    ///
    /// Returns `None` for an unknown tab.
    pub fn begin_search(&mut self, tab_id: TabId, query: &str) -> Option<SearchTicket> {
        let search_id = self.next_search_id;
        let is_active = self.active_tab_id == Some(tab_id);

        let tab = self.get_tab_mut(tab_id)?;
        tab.query_text = query.to_string();
        tab.set_pending_search(Some(search_id));
        self.next_search_id += 1;

        if is_active {
            self.view.set_input_text(query);
            self.view.clear_transient();
        }

        log::debug!("Search {} started in tab {}: '{}'", search_id, tab_id, query);
        Some(SearchTicket {
            tab_id,
            search_id,
            query: query.to_string(),
        })
    }

    /// Mount an intermediate panel update, if its tab is the one on screen.
    ///
    /// Progress for background tabs is dropped; their completion carries the
    /// full result.
    pub fn apply_progress(
        &mut self,
        tab_id: TabId,
        search_id: SearchId,
        panel: Panel,
        state: PanelState,
    ) {
        if self.active_tab_id != Some(tab_id) {
            return;
        }
        let current = self
            .get_tab(tab_id)
            .is_some_and(|tab| tab.pending_search() == Some(search_id));
        if current {
            self.view.show_panel(panel, state);
        }
    }

    /// Attribute a finished search to the tab that started it.
    ///
    /// If that tab is on screen the result is shown and captured; otherwise it
    /// is stored directly. Completions for deleted tabs or superseded searches
    /// are dropped; returns whether the completion was applied.
    pub fn on_search_completed(&mut self, completion: SearchCompletion) -> bool {
        let SearchCompletion {
            tab_id,
            search_id,
            query,
            subject,
            snapshot,
        } = completion;

        let is_active = self.active_tab_id == Some(tab_id);
        let Some(tab) = self.get_tab_mut(tab_id) else {
            log::debug!("Dropping search {}: tab {} no longer exists", search_id, tab_id);
            return false;
        };
        if tab.pending_search() != Some(search_id) {
            log::debug!("Dropping superseded search {} for tab {}", search_id, tab_id);
            return false;
        }
        tab.set_pending_search(None);

        if is_active {
            self.view.restore_visible_state(Some(&snapshot));
            self.capture_active_tab_snapshot(Some(&subject));
        } else {
            tab.rendered_snapshot = Some(snapshot);
            tab.query_text = query;
            tab.focus_subject = Some(subject);
            log::debug!("Stored background result for tab {}", tab_id);
        }
        true
    }

    /// Get a reference to the active tab
    pub fn active_tab(&self) -> Option<&SearchTab> {
        self.active_tab_id
            .and_then(|id| self.tabs.iter().find(|t| t.id == id))
    }

    fn active_tab_mut(&mut self) -> Option<&mut SearchTab> {
        let active_id = self.active_tab_id;
        active_id.and_then(move |id| self.tabs.iter_mut().find(|t| t.id == id))
    }

    /// Focus subject of the active tab, used as chat context
    pub fn focus_subject(&self) -> Option<&str> {
        self.active_tab().and_then(|t| t.focus_subject.as_deref())
    }

    /// Switch to the next tab (wraps around)
    pub fn next_tab(&mut self) {
        if self.tabs.len() <= 1 {
            return;
        }
        let current_idx = self.active_tab_index().unwrap_or(0);
        let next_id = self.tabs[(current_idx + 1) % self.tabs.len()].id;
        self.switch_to(next_id);
    }

    /// Switch to the previous tab (wraps around)
    pub fn prev_tab(&mut self) {
        if self.tabs.len() <= 1 {
            return;
        }
        let current_idx = self.active_tab_index().unwrap_or(0);
        let prev_idx = if current_idx == 0 {
            self.tabs.len() - 1
        } else {
            current_idx - 1
        };
        let prev_id = self.tabs[prev_idx].id;
        self.switch_to(prev_id);
    }

    /// Switch to tab by position (1-based, as shown in the tab list)
    pub fn switch_to_index(&mut self, index: usize) {
        if index > 0 && index <= self.tabs.len() {
            let id = self.tabs[index - 1].id;
            self.switch_to(id);
        }
    }

    /// Position of the active tab in display order
    pub fn active_tab_index(&self) -> Option<usize> {
        let active_id = self.active_tab_id?;
        self.tabs.iter().position(|t| t.id == active_id)
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn active_tab_id(&self) -> Option<TabId> {
        self.active_tab_id
    }

    /// Get all tabs as a slice
    pub fn tabs(&self) -> &[SearchTab] {
        &self.tabs
    }

    pub fn get_tab(&self, id: TabId) -> Option<&SearchTab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    fn get_tab_mut(&mut self, id: TabId) -> Option<&mut SearchTab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}
