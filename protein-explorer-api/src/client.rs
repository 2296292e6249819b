use crate::error::ApiError;
use crate::types::{
    AnalysisData, ChatReply, ConversationRequest, DrugData, ProteinInfo, RefineRequest,
    RefinedQuery, StructureData,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use ureq::Agent;
use url::Url;

/// The operations the explorer needs from its backend.
///
/// Calls are blocking; callers that must stay responsive run them on a
/// worker thread. Implemented by [`HttpApiClient`] and by in-memory fakes
/// in tests.
pub trait ProteinApi: Send + Sync {
    /// Normalize free text ("p53 tumor suppressor") into a protein name.
    fn refine_query(&self, query: &str) -> Result<RefinedQuery, ApiError>;

    fn protein_info(&self, protein: &str) -> Result<ProteinInfo, ApiError>;

    fn protein_structure(&self, protein: &str) -> Result<StructureData, ApiError>;

    fn protein_analysis(&self, protein: &str) -> Result<AnalysisData, ApiError>;

    fn drug_associations(&self, protein: &str) -> Result<DrugData, ApiError>;

    /// Send the whole conversation so far; `focus` names the protein being explored.
    fn conversation(&self, messages: &[String], focus: Option<&str>)
    -> Result<ChatReply, ApiError>;
}

/// `ureq`-backed client for the protein explorer REST API.
pub struct HttpApiClient {
    agent: Agent,
    base_url: Url,
    max_response_bytes: u64,
}

impl HttpApiClient {
    /// Build a client for `base_url` (e.g. `http://localhost:5000/api`).
    pub fn new(
        base_url: &str,
        timeout: Duration,
        max_response_bytes: u64,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            agent: crate::http::agent(timeout),
            base_url,
            max_response_bytes,
        })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    ///
    /// A protein name containing `/` or spaces stays a single segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<String, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        log::debug!("GET {}", url);

        let response = self
            .agent
            .get(&url)
            .header("User-Agent", crate::http::USER_AGENT)
            .header("Accept", "application/json")
            .call();
        self.read_json(&url, response)
    }

    fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        log::debug!("POST {}", url);

        let payload = serde_json::to_string(body).map_err(|source| ApiError::Decode {
            url: url.clone(),
            source,
        })?;
        let response = self
            .agent
            .post(&url)
            .header("User-Agent", crate::http::USER_AGENT)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(payload);
        self.read_json(&url, response)
    }

    fn read_json<T: DeserializeOwned>(
        &self,
        url: &str,
        response: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
    ) -> Result<T, ApiError> {
        let response = response.map_err(|e| match e {
            ureq::Error::StatusCode(code) => ApiError::Status {
                url: url.to_string(),
                code,
            },
            other => ApiError::Transport {
                url: url.to_string(),
                message: other.to_string(),
            },
        })?;

        let mut body = response.into_body();
        let text = body
            .with_config()
            .limit(self.max_response_bytes)
            .read_to_string()
            .map_err(|e| ApiError::Body {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        decode_json(url, &text)
    }
}

/// Decode a response body, surfacing an embedded `"error"` message as
/// [`ApiError::Remote`].
pub(crate) fn decode_json<T: DeserializeOwned>(url: &str, text: &str) -> Result<T, ApiError> {
    let value: Value = serde_json::from_str(text).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })?;

    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(ApiError::Remote(message.to_string()));
    }

    serde_json::from_value(value).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}

impl ProteinApi for HttpApiClient {
    fn refine_query(&self, query: &str) -> Result<RefinedQuery, ApiError> {
        self.post(&["refine-query"], &RefineRequest { query })
    }

    fn protein_info(&self, protein: &str) -> Result<ProteinInfo, ApiError> {
        self.get(&["protein", protein])
    }

    fn protein_structure(&self, protein: &str) -> Result<StructureData, ApiError> {
        self.get(&["protein", protein, "structure"])
    }

    fn protein_analysis(&self, protein: &str) -> Result<AnalysisData, ApiError> {
        self.get(&["protein", protein, "analysis"])
    }

    fn drug_associations(&self, protein: &str) -> Result<DrugData, ApiError> {
        self.get(&["protein", protein, "drugs"])
    }

    fn conversation(
        &self,
        messages: &[String],
        focus: Option<&str>,
    ) -> Result<ChatReply, ApiError> {
        self.post(
            &["conversation"],
            &ConversationRequest {
                messages,
                protein: focus,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpApiClient {
        HttpApiClient::new(base, Duration::from_secs(5), 1024).unwrap()
    }

    #[test]
    fn endpoint_appends_segments() {
        let api = client("http://localhost:5000/api");
        assert_eq!(
            api.endpoint(&["protein", "TP53", "structure"]).unwrap(),
            "http://localhost:5000/api/protein/TP53/structure"
        );
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let api = client("http://localhost:5000/api/");
        assert_eq!(
            api.endpoint(&["refine-query"]).unwrap(),
            "http://localhost:5000/api/refine-query"
        );
    }

    #[test]
    fn endpoint_encodes_protein_names() {
        let api = client("http://localhost:5000/api");
        assert_eq!(
            api.endpoint(&["protein", "heat shock/70"]).unwrap(),
            "http://localhost:5000/api/protein/heat%20shock%2F70"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(matches!(
            HttpApiClient::new("not a url", Duration::from_secs(1), 1),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpApiClient::new("mailto:someone@example.org", Duration::from_secs(1), 1),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn embedded_error_becomes_remote_error() {
        let result: Result<ProteinInfo, ApiError> =
            decode_json("u", r#"{"error":"Protein not found"}"#);
        match result {
            Err(ApiError::Remote(message)) => assert_eq!(message, "Protein not found"),
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let result: Result<ProteinInfo, ApiError> = decode_json("u", "<html>");
        assert!(matches!(result, Err(ApiError::Decode { .. })));
    }
}
