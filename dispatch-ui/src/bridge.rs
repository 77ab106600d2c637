use dispatch_core::config::DashboardConfig;
use dispatch_core::IncidentId;
use js_sys::Promise;
use std::time::Duration;
use triage_registry::{validate_triage_v1, TriagePayloadV1};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// Baked in at build time; falls back to the local triage service.
pub fn triage_base_url() -> Option<&'static str> {
    option_env!("TRIAGE_BASE_URL")
}

#[derive(Clone, Debug)]
pub struct FetchError {
    pub message: String,
    pub retryable: bool,
}

impl FetchError {
    fn fatal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
        }
    }

    fn transient(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
        }
    }
}

pub async fn transcribe(
    config: &DashboardConfig,
    id: IncidentId,
) -> Result<TriagePayloadV1, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::fatal("window not available"))?;
    let url = config.transcribe_url(id);
    let resp = JsFuture::from(window.fetch_with_str(&url))
        .await
        .map_err(|e| FetchError::transient(format!("fetch failed: {e:?}")))?;
    let resp: Response = resp
        .dyn_into()
        .map_err(|_| FetchError::fatal("fetch did not resolve to a Response"))?;

    let status = resp.status();
    if status == 404 {
        return Err(FetchError::fatal(format!(
            "incident {id} unknown to triage service"
        )));
    }
    if !resp.ok() {
        return Err(FetchError {
            message: format!("triage service returned {status}"),
            retryable: status >= 500 || status == 429,
        });
    }

    let body = resp
        .json()
        .map_err(|e| FetchError::fatal(format!("read body: {e:?}")))?;
    let body = JsFuture::from(body)
        .await
        .map_err(|e| FetchError::transient(format!("read body: {e:?}")))?;
    let payload: TriagePayloadV1 = serde_wasm_bindgen::from_value(body)
        .map_err(|e| FetchError::fatal(format!("invalid triage payload: {e}")))?;
    validate_triage_v1(&payload)
        .map_err(|e| FetchError::fatal(format!("invalid triage payload: {e}")))?;
    Ok(payload)
}

/// Resolves after `duration` on the browser's timer queue.
pub async fn sleep(duration: Duration) {
    let ms = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        }
    });
    let _ = JsFuture::from(promise).await;
}
