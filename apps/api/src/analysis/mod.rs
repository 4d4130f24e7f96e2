// Analysis pipeline: request building, response schemas, and the client that
// turns model output into typed records.
// All model calls go through llm_client; nothing here speaks HTTP.

pub mod prompts;
pub mod request;
pub mod schema;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::llm_client::{strip_json_fences, ModelBackend};

pub use request::{build_request, AnalysisInput, AnalysisRequest, HeadlineVariant};

/// The fixed category of analysis requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Headline,
    Swot,
    Suitability,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Headline => "headline",
            AnalysisKind::Swot => "swot",
            AnalysisKind::Suitability => "suitability",
        }
    }

    /// The only message a user ever sees when a call of this kind fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            AnalysisKind::Headline => "Failed to analyze headline. Please try again.",
            AnalysisKind::Swot => "Failed to generate SWOT analysis. Please try again.",
            AnalysisKind::Suitability => "Failed to analyze job suitability. Please try again.",
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Transport failure, non-2xx status, empty content, or non-JSON body.
    #[error("{}", .kind.failure_message())]
    Failed { kind: AnalysisKind, cause: String },

    /// Valid JSON that does not satisfy the response schema.
    #[error("{}", .kind.failure_message())]
    MalformedResponse { kind: AnalysisKind, reason: String },
}

impl AnalysisError {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisError::Failed { kind, .. } | AnalysisError::MalformedResponse { kind, .. } => {
                *kind
            }
        }
    }
}

/// A typed result record produced from a model response.
pub trait AnalysisRecord: DeserializeOwned + Send {
    const KIND: AnalysisKind;

    /// Adjusts a freshly parsed record to the contract of the request that
    /// produced it.
    fn conform(&mut self, _request: &AnalysisRequest) {}
}

/// Sends analysis requests to the model and parses the results.
/// Holds no state between calls beyond the backend (and its credential).
#[derive(Clone)]
pub struct AnalysisClient {
    backend: Arc<dyn ModelBackend>,
}

impl AnalysisClient {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self { backend }
    }

    /// One model call. No retries, no caching.
    pub async fn analyze<R: AnalysisRecord>(
        &self,
        request: &AnalysisRequest,
    ) -> Result<R, AnalysisError> {
        let kind = request.kind;
        if kind != R::KIND {
            error!(
                requested = kind.as_str(),
                expected = R::KIND.as_str(),
                "Analysis request routed to the wrong record type"
            );
            return Err(AnalysisError::Failed {
                kind,
                cause: "request kind does not match record type".to_string(),
            });
        }

        let raw = self
            .backend
            .generate_structured(&request.prompt, &request.schema.to_wire())
            .await
            .map_err(|e| {
                error!(kind = kind.as_str(), "Model call failed: {e}");
                AnalysisError::Failed {
                    kind,
                    cause: e.to_string(),
                }
            })?;

        let value: serde_json::Value =
            serde_json::from_str(strip_json_fences(&raw)).map_err(|e| {
                error!(kind = kind.as_str(), "Model returned non-JSON body: {e}");
                AnalysisError::Failed {
                    kind,
                    cause: format!("invalid JSON: {e}"),
                }
            })?;

        request.schema.validate(&value).map_err(|violation| {
            warn!(kind = kind.as_str(), "Malformed model response: {violation}");
            AnalysisError::MalformedResponse {
                kind,
                reason: violation.to_string(),
            }
        })?;

        let mut record: R = serde_json::from_value(value).map_err(|e| {
            warn!(kind = kind.as_str(), "Response did not map to record: {e}");
            AnalysisError::MalformedResponse {
                kind,
                reason: e.to_string(),
            }
        })?;
        record.conform(request);

        debug!(kind = kind.as_str(), "Analysis completed");
        Ok(record)
    }
}
