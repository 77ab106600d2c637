use dispatch_core::config::DashboardConfig;
use dispatch_core::IncidentId;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use triage_registry::{decode_triage_v1, TriagePayloadV1};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("triage request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("triage service returned {0}")]
    Status(u16),
    #[error("incident {0} unknown to triage service")]
    NotFound(IncidentId),
    #[error("malformed triage payload: {0}")]
    Invalid(String),
}

impl IngestError {
    /// Transport failures and server-side errors are worth another attempt;
    /// a missing incident or a bad payload will not change on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            IngestError::Http(_) => true,
            IngestError::Status(code) => *code >= 500 || *code == 429,
            IngestError::NotFound(_) | IngestError::Invalid(_) => false,
        }
    }
}

pub trait TriageSource: Send + Sync + 'static {
    fn transcribe(
        &self,
        id: IncidentId,
    ) -> impl Future<Output = Result<TriagePayloadV1, IngestError>> + Send;
}

#[derive(Clone)]
pub struct TriageClient {
    http: reqwest::Client,
    config: DashboardConfig,
}

impl TriageClient {
    pub fn new(config: &DashboardConfig) -> Result<Self, IngestError> {
        // Transcription runs a speech model server-side; allow it time.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }
}

impl TriageSource for TriageClient {
    fn transcribe(
        &self,
        id: IncidentId,
    ) -> impl Future<Output = Result<TriagePayloadV1, IngestError>> + Send {
        let url = self.config.transcribe_url(id);
        let http = self.http.clone();
        async move {
            tracing::debug!(%url, "requesting triage");
            let response = http.get(&url).send().await?;
            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(IngestError::NotFound(id));
            }
            if !status.is_success() {
                return Err(IngestError::Status(status.as_u16()));
            }
            let body = response.text().await?;
            decode_triage_v1(&body).map_err(IngestError::Invalid)
        }
    }
}
