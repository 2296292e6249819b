//! Wire types for backend responses.
//!
//! Every field is defaulted: the backend omits fields it could not resolve
//! (or sends them as `null`), and a partially populated payload is still
//! worth rendering.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Decode `null` as the field's default instead of failing.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One drug association row, kept as an open key/value record.
///
/// The set of columns varies between targets, so rows are rendered from
/// whatever keys the backend sent (in the order it sent them).
pub type DrugRow = Map<String, Value>;

/// Result of `POST /refine-query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinedQuery {
    #[serde(deserialize_with = "null_as_default")]
    pub protein_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub alternative_names: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

impl RefinedQuery {
    /// Fallback used when refinement is unavailable: search the raw query.
    pub fn fallback(query: &str) -> Self {
        Self {
            protein_name: query.to_string(),
            alternative_names: Vec::new(),
            description: "Could not refine query".to_string(),
        }
    }
}

/// Result of `GET /protein/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProteinInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub function: FunctionData,
}

/// UniProt summary of a protein.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionData {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub gene_names: Vec<String>,
    pub organism: Option<String>,
    pub function: Option<String>,
}

/// Result of `GET /protein/{name}/structure`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureData {
    pub uniprot_id: Option<String>,
    pub pdb_data: Option<PdbPayload>,
    #[serde(deserialize_with = "null_as_default")]
    pub structure_metadata: Vec<StructureMetadata>,
}

impl StructureData {
    /// The PDB text, when the backend found a model.
    pub fn pdb(&self) -> Option<&str> {
        self.pdb_data
            .as_ref()
            .and_then(|payload| payload.pdb_data.as_deref())
            .filter(|pdb| !pdb.is_empty())
    }

    /// Average model confidence of the first model, if reported.
    pub fn confidence(&self) -> Option<f64> {
        self.structure_metadata
            .first()
            .and_then(StructureMetadata::confidence)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdbPayload {
    pub pdb_data: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureMetadata {
    /// Sent as a number by some model sources and as a string by others.
    #[serde(rename = "confidenceAvgDistance")]
    pub confidence_avg_distance: Option<Value>,
}

impl StructureMetadata {
    pub fn confidence(&self) -> Option<f64> {
        match self.confidence_avg_distance.as_ref()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Result of `GET /protein/{name}/analysis`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisData {
    pub analysis: Option<String>,
}

/// Result of `GET /protein/{name}/drugs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrugData {
    #[serde(deserialize_with = "null_as_default")]
    pub drug_associations: DrugAssociations,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrugAssociations {
    pub target_chembl_id: Option<String>,
    pub target_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub drugs: Vec<DrugRow>,
}

/// Result of `POST /conversation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatReply {
    pub response: Option<String>,
}

/// Body of `POST /refine-query`.
#[derive(Debug, Serialize)]
pub(crate) struct RefineRequest<'a> {
    pub query: &'a str,
}

/// Body of `POST /conversation`.
#[derive(Debug, Serialize)]
pub(crate) struct ConversationRequest<'a> {
    pub messages: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_confidence_accepts_numbers_and_strings() {
        let numeric: StructureData = serde_json::from_str(
            r#"{"uniprot_id":"P04637","pdb_data":{"pdb_data":"ATOM"},
                "structure_metadata":[{"confidenceAvgDistance":0.93}]}"#,
        )
        .unwrap();
        assert_eq!(numeric.confidence(), Some(0.93));
        assert_eq!(numeric.pdb(), Some("ATOM"));

        let textual: StructureData = serde_json::from_str(
            r#"{"structure_metadata":[{"confidenceAvgDistance":" 0.71 "}]}"#,
        )
        .unwrap();
        assert_eq!(textual.confidence(), Some(0.71));
        assert_eq!(textual.pdb(), None);
    }

    #[test]
    fn missing_fields_decode_to_defaults() {
        let info: ProteinInfo = serde_json::from_str(r#"{"function":{"id":"P04637"}}"#).unwrap();
        assert_eq!(info.function.id.as_deref(), Some("P04637"));
        assert!(info.function.gene_names.is_empty());

        let drugs: DrugData = serde_json::from_str("{}").unwrap();
        assert!(drugs.drug_associations.drugs.is_empty());
    }

    #[test]
    fn null_fields_decode_to_defaults() {
        let info: ProteinInfo =
            serde_json::from_str(r#"{"function":{"id":"P04637","gene_names":null}}"#).unwrap();
        assert_eq!(info.function.id.as_deref(), Some("P04637"));
        assert!(info.function.gene_names.is_empty());

        let info: ProteinInfo = serde_json::from_str(r#"{"function":null}"#).unwrap();
        assert_eq!(info, ProteinInfo::default());

        let drugs: DrugData = serde_json::from_str(r#"{"drug_associations":null}"#).unwrap();
        assert!(drugs.drug_associations.drugs.is_empty());
        let drugs: DrugData = serde_json::from_str(
            r#"{"drug_associations":{"target_chembl_id":"CHEMBL4096","drugs":null}}"#,
        )
        .unwrap();
        assert_eq!(
            drugs.drug_associations.target_chembl_id.as_deref(),
            Some("CHEMBL4096")
        );
        assert!(drugs.drug_associations.drugs.is_empty());

        let structure: StructureData =
            serde_json::from_str(r#"{"pdb_data":null,"structure_metadata":null}"#).unwrap();
        assert_eq!(structure.confidence(), None);
        assert_eq!(structure.pdb(), None);

        let refined: RefinedQuery = serde_json::from_str(
            r#"{"protein_name":null,"alternative_names":null,"description":null}"#,
        )
        .unwrap();
        assert_eq!(refined, RefinedQuery::default());
    }

    #[test]
    fn drug_rows_keep_backend_column_order() {
        let drugs: DrugData = serde_json::from_str(
            r#"{"drug_associations":{"drugs":[{"name":"X","activity":"IC50 = 3.2","phase":"2"}]}}"#,
        )
        .unwrap();
        let keys: Vec<&str> = drugs.drug_associations.drugs[0]
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["name", "activity", "phase"]);
    }

    #[test]
    fn conversation_request_omits_absent_protein() {
        let messages = vec!["hello".to_string()];
        let body = serde_json::to_string(&ConversationRequest {
            messages: &messages,
            protein: None,
        })
        .unwrap();
        assert_eq!(body, r#"{"messages":["hello"]}"#);
    }
}
