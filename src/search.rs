//! The protein search pipeline.
//!
//! A search refines the user's text into a protein name, then fills the
//! result panels one backend call at a time: protein details with the
//! structure block, analysis, and drug associations. The flow renders into
//! its own [`Snapshot`] rather than the live view, so a search keeps going
//! (and keeps its results) when the user switches tabs mid-flight.
//!
//! Every panel update is reported to the registered [`SearchHook`] as
//! [`SearchEvent::Progress`], and the finished snapshot exactly once as
//! [`SearchEvent::Completed`].

use crate::format;
use crate::tab::TabId;
use crate::view::{Panel, PanelState, Snapshot};
use protein_explorer_api::{ProteinApi, ProteinInfo, RefinedQuery};
use thiserror::Error;

/// Identifies one search run; a tab only accepts results of its newest run.
pub type SearchId = u64;

/// Issued by the tab manager when a search starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    /// Tab that started the search and receives its results
    pub tab_id: TabId,
    pub search_id: SearchId,
    pub query: String,
}

/// Final outcome of a search, routed back to the originating tab.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCompletion {
    pub tab_id: TabId,
    pub search_id: SearchId,
    pub query: String,
    /// Refined protein name (or the raw query when refinement failed)
    pub subject: String,
    pub snapshot: Snapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// One panel changed while the search is running
    Progress {
        tab_id: TabId,
        search_id: SearchId,
        panel: Panel,
        state: PanelState,
    },
    Completed(SearchCompletion),
}

/// Post-search hook, registered once and called by the flow itself.
pub type SearchHook = Box<dyn Fn(SearchEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Please enter a protein name")]
    EmptyQuery,
}

/// Trim the search input, rejecting blank queries.
pub fn normalize_query(input: &str) -> Result<String, SearchError> {
    let query = input.trim();
    if query.is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    Ok(query.to_string())
}

/// One running search: the off-screen result page plus where to report it.
pub struct SearchFlow<'a> {
    tab_id: TabId,
    search_id: SearchId,
    hook: &'a dyn Fn(SearchEvent),
    screen: Snapshot,
}

impl<'a> SearchFlow<'a> {
    /// Run `ticket` to completion against `api`.
    ///
    /// Blocking; call it from a worker thread. Backend failures are rendered
    /// into the affected panels, so a search always completes.
    pub fn run(
        ticket: SearchTicket,
        api: &dyn ProteinApi,
        hook: &'a dyn Fn(SearchEvent),
    ) -> SearchCompletion {
        let mut flow = SearchFlow {
            tab_id: ticket.tab_id,
            search_id: ticket.search_id,
            hook,
            screen: Snapshot::new(),
        };

        log::info!(
            "Search {} (tab {}): '{}'",
            ticket.search_id,
            ticket.tab_id,
            ticket.query
        );
        let subject = flow.execute(api, &ticket.query);

        let completion = SearchCompletion {
            tab_id: ticket.tab_id,
            search_id: ticket.search_id,
            query: ticket.query,
            subject,
            snapshot: flow.screen,
        };
        hook(SearchEvent::Completed(completion.clone()));
        completion
    }

    /// Returns the resolved subject.
    fn execute(&mut self, api: &dyn ProteinApi, query: &str) -> String {
        self.show(Panel::SearchResults, format::loading("Refining search..."));

        let refined = api.refine_query(query).unwrap_or_else(|e| {
            log::warn!("Query refinement failed, searching '{}' as typed: {}", query, e);
            RefinedQuery::fallback(query)
        });
        let subject = match refined.protein_name.trim() {
            "" => query.to_string(),
            name => name.to_string(),
        };
        log::debug!("Refined '{}' to '{}'", query, subject);

        self.hide(Panel::SearchResults);
        self.show(
            Panel::ProteinInfo,
            format::loading("Loading protein information..."),
        );

        match api.protein_info(&subject) {
            Ok(info) => self.render_protein(api, &subject, &info),
            Err(e) => {
                log::error!("Protein lookup for '{}' failed: {}", subject, e);
                self.show(Panel::ProteinInfo, format::error(&format!("Error: {e}")));
                self.hide(Panel::Structure);
                self.hide(Panel::Analysis);
                self.hide(Panel::Drugs);
            }
        }

        subject
    }

    fn render_protein(&mut self, api: &dyn ProteinApi, subject: &str, info: &ProteinInfo) {
        self.show(
            Panel::ProteinInfo,
            format::protein_details(&info.function, &format::structure_loading()),
        );

        let structure = match api.protein_structure(subject) {
            Ok(data) => match data.pdb() {
                Some(pdb) => format::structure_found(&data, pdb),
                None => format::structure_unavailable(),
            },
            Err(e) => {
                log::error!("Structure lookup for '{}' failed: {}", subject, e);
                format::structure_unavailable()
            }
        };
        self.show(
            Panel::ProteinInfo,
            format::protein_details(&info.function, &structure),
        );
        // The structure lives inside the protein details block
        self.hide(Panel::Structure);

        self.show(
            Panel::Analysis,
            format::loading("Loading protein analysis from UniProt..."),
        );
        let analysis = match api.protein_analysis(subject) {
            Ok(data) => format::analysis_content(data.analysis.as_deref()),
            Err(e) => {
                log::error!("Analysis for '{}' failed: {}", subject, e);
                format::error(&format!("Error loading analysis: {e}"))
            }
        };
        self.show(Panel::Analysis, analysis);

        self.show(
            Panel::Drugs,
            format::loading("Loading drug information from ChEMBL..."),
        );
        let drugs = match api.drug_associations(subject) {
            Ok(data) if data.drug_associations.drugs.is_empty() => {
                format::info("No drug associations found for this protein")
            }
            Ok(data) => format::drugs_content(&data.drug_associations),
            Err(e) => {
                log::error!("Drug lookup for '{}' failed: {}", subject, e);
                format::error(&format!("Error loading drug information: {e}"))
            }
        };
        self.show(Panel::Drugs, drugs);
    }

    fn show(&mut self, panel: Panel, html: String) {
        let state = PanelState::shown(html);
        self.screen.set_results_visible(true);
        self.screen.set_panel(panel, state.clone());
        self.report(panel, state);
    }

    /// Hide a panel, keeping whatever it last showed.
    fn hide(&mut self, panel: Panel) {
        self.screen.set_panel_visible(panel, false);
        let state = self.screen.panel(panel).cloned().unwrap_or_default();
        self.report(panel, state);
    }

    fn report(&self, panel: Panel, state: PanelState) {
        (self.hook)(SearchEvent::Progress {
            tab_id: self.tab_id,
            search_id: self.search_id,
            panel,
            state,
        });
    }
}
