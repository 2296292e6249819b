//! Remote data client for the protein explorer backend.
//!
//! The backend exposes query refinement, protein metadata, predicted 3D
//! structures, a textual analysis, ChEMBL drug associations and a
//! conversational endpoint. [`ProteinApi`] is the seam the rest of the
//! application programs against; [`HttpApiClient`] is the `ureq`-backed
//! implementation.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::{HttpApiClient, ProteinApi};
pub use error::ApiError;
pub use types::{
    AnalysisData, ChatReply, DrugAssociations, DrugData, DrugRow, FunctionData, PdbPayload,
    ProteinInfo, RefinedQuery, StructureData, StructureMetadata,
};
