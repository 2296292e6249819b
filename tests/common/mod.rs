//! Shared integration test helpers for protein-explorer.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::{MockApi, tp53_api};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a subset
//! of helpers is used per file.

#![allow(dead_code)]

use parking_lot::Mutex;
use protein_explorer::api::{
    AnalysisData, ApiError, ChatReply, DrugData, ProteinApi, ProteinInfo, RefinedQuery,
    StructureData,
};
use protein_explorer::config::Config;
use protein_explorer::search::SearchEvent;
use serde_json::json;
use std::sync::mpsc::{Receiver, Sender, channel};

/// In-memory backend. `None` for an endpoint makes it fail with a remote
/// error message.
#[derive(Default)]
pub struct MockApi {
    pub refined: Option<RefinedQuery>,
    pub info: Option<ProteinInfo>,
    pub structure: Option<StructureData>,
    pub analysis: Option<AnalysisData>,
    pub drugs: Option<DrugData>,
    pub chat_reply: Option<ChatReply>,
    /// Endpoint calls in order, e.g. `"info:TP53"`
    pub calls: Mutex<Vec<String>>,
    /// Every conversation request: (messages, focus subject)
    pub conversations: Mutex<Vec<(Vec<String>, Option<String>)>>,
    /// When set, `protein_info` waits for a message before answering
    pub gate: Mutex<Option<Receiver<()>>>,
}

impl MockApi {
    /// Make `protein_info` block until the returned sender fires.
    pub fn gated(mut self) -> (Self, Sender<()>) {
        let (tx, rx) = channel();
        self.gate = Mutex::new(Some(rx));
        (self, tx)
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

fn remote(what: &str) -> ApiError {
    ApiError::Remote(format!("{what} unavailable"))
}

impl ProteinApi for MockApi {
    fn refine_query(&self, query: &str) -> Result<RefinedQuery, ApiError> {
        self.record(format!("refine:{query}"));
        self.refined.clone().ok_or_else(|| remote("refinement"))
    }

    fn protein_info(&self, protein: &str) -> Result<ProteinInfo, ApiError> {
        if let Some(gate) = self.gate.lock().as_ref() {
            let _ = gate.recv();
        }
        self.record(format!("info:{protein}"));
        self.info.clone().ok_or_else(|| remote("Protein"))
    }

    fn protein_structure(&self, protein: &str) -> Result<StructureData, ApiError> {
        self.record(format!("structure:{protein}"));
        self.structure.clone().ok_or_else(|| remote("structure"))
    }

    fn protein_analysis(&self, protein: &str) -> Result<AnalysisData, ApiError> {
        self.record(format!("analysis:{protein}"));
        self.analysis.clone().ok_or_else(|| remote("analysis"))
    }

    fn drug_associations(&self, protein: &str) -> Result<DrugData, ApiError> {
        self.record(format!("drugs:{protein}"));
        self.drugs.clone().ok_or_else(|| remote("drug data"))
    }

    fn conversation(
        &self,
        messages: &[String],
        focus: Option<&str>,
    ) -> Result<ChatReply, ApiError> {
        self.conversations
            .lock()
            .push((messages.to_vec(), focus.map(str::to_string)));
        self.chat_reply.clone().ok_or_else(|| remote("conversation"))
    }
}

/// A backend that knows everything about TP53.
pub fn tp53_api() -> MockApi {
    MockApi {
        refined: Some(RefinedQuery {
            protein_name: "TP53".to_string(),
            alternative_names: vec!["p53".to_string()],
            description: "Cellular tumor antigen p53".to_string(),
        }),
        info: Some(
            serde_json::from_value(json!({
                "function": {
                    "id": "P04637",
                    "name": "Cellular tumor antigen p53",
                    "gene_names": ["TP53", "P53"],
                    "organism": "Homo sapiens",
                    "function": "Acts as a tumor suppressor."
                }
            }))
            .expect("valid protein info fixture"),
        ),
        structure: Some(
            serde_json::from_value(json!({
                "uniprot_id": "P04637",
                "pdb_data": {"pdb_data": "HEADER\nATOM      1  N   MET A   1\nATOM      2  CA  MET A   1\nEND\n"},
                "structure_metadata": [{"confidenceAvgDistance": "0.93"}]
            }))
            .expect("valid structure fixture"),
        ),
        analysis: Some(AnalysisData {
            analysis: Some("## Overview\n**TP53** is a *tumor suppressor*.".to_string()),
        }),
        drugs: Some(
            serde_json::from_value(json!({
                "drug_associations": {
                    "target_chembl_id": "CHEMBL4096",
                    "target_name": "Cellular tumor antigen p53",
                    "drugs": [
                        {"molecule_chembl_id": "CHEMBL1", "activity": "IC50 = 2.5"},
                        {"molecule_chembl_id": "CHEMBL2", "activity_value": "7.1"}
                    ]
                }
            }))
            .expect("valid drug fixture"),
        ),
        chat_reply: Some(ChatReply {
            response: Some("TP53 guards the genome.".to_string()),
        }),
        ..MockApi::default()
    }
}

/// Default config with confirmation prompts disabled.
pub fn test_config() -> Config {
    Config {
        confirm_tab_delete: false,
        ..Config::default()
    }
}

/// Collect hook events into a vector.
pub struct EventLog {
    events: Mutex<Vec<SearchEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, event: SearchEvent) {
        self.events.lock().push(event);
    }

    pub fn events(&self) -> Vec<SearchEvent> {
        self.events.lock().clone()
    }
}
