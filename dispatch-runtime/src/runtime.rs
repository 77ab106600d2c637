use crate::client::TriageSource;
use crate::state::AppState;
use dispatch_core::config::{RetryPolicy, ScheduleEntry};
use dispatch_core::incident::TriageFailure;
use dispatch_core::{Event, IncidentId};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

pub trait EventSink: Send + Sync + 'static {
    fn emit_json(&self, event: &str, payload: serde_json::Value);
}

pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit_json(&self, _event: &str, _payload: serde_json::Value) {}
}

/// Forwards dashboard events to the tracing subscriber.
pub struct LogSink;

impl EventSink for LogSink {
    fn emit_json(&self, event: &str, payload: serde_json::Value) {
        tracing::debug!(event, %payload, "dashboard event");
    }
}

pub(crate) async fn run_ticker(state: AppState, sink: Arc<dyn EventSink>, period: Duration) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        match state.apply(&Event::Tick) {
            Ok(snapshot) => sink.emit_json(
                "tick",
                serde_json::json!({ "active": snapshot.active_incidents().len() }),
            ),
            Err(err) => tracing::error!(%err, "tick rejected"),
        }
    }
}

/// Waits for the entry's offset, then fetches triage for its incident,
/// retrying per `retry`. Every failed attempt is recorded on the incident so
/// the dashboard shows it as retrying or failed instead of dropping it.
pub(crate) async fn run_ingestion<S: TriageSource>(
    state: AppState,
    source: Arc<S>,
    entry: ScheduleEntry,
    retry: RetryPolicy,
    sink: Arc<dyn EventSink>,
) {
    tokio::time::sleep(entry.delay()).await;
    let id = entry.incident_id;
    let mut attempt = 0;

    loop {
        attempt += 1;
        let error = match source.transcribe(id).await {
            Ok(payload) => match state.apply(&Event::Ingested { id, payload }) {
                Ok(_) => {
                    tracing::info!(incident = %id, attempt, "triage ingested");
                    sink.emit_json("incident-ready", serde_json::json!({ "incident_id": id }));
                    return;
                }
                Err(err) => {
                    tracing::warn!(incident = %id, %err, "triage payload rejected");
                    let failure = retry.failure(attempt, false, err.to_string());
                    record_failure(&state, &sink, id, failure);
                    return;
                }
            },
            Err(err) => err,
        };

        let failure = retry.failure(attempt, error.is_retryable(), error.to_string());
        let exhausted = failure.exhausted;
        tracing::warn!(incident = %id, attempt, retrying = !exhausted, %error, "triage fetch failed");
        record_failure(&state, &sink, id, failure);
        if exhausted {
            return;
        }
        tokio::time::sleep(retry.backoff(attempt)).await;
    }
}

fn record_failure(
    state: &AppState,
    sink: &Arc<dyn EventSink>,
    id: IncidentId,
    failure: TriageFailure,
) {
    let payload = serde_json::json!({
        "incident_id": id,
        "attempts": failure.attempts,
        "reason": failure.reason,
        "exhausted": failure.exhausted,
    });
    if let Err(err) = state.apply(&Event::IngestFailed { id, failure }) {
        tracing::error!(incident = %id, %err, "could not record triage failure");
        return;
    }
    sink.emit_json("triage-failed", payload);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::IngestError;
    use dispatch_core::config::DashboardConfig;
    use std::future::Future;
    use std::sync::Mutex;
    use triage_registry::TriagePayloadV1;

    #[derive(Default)]
    struct CaptureSink {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl EventSink for CaptureSink {
        fn emit_json(&self, event: &str, _payload: serde_json::Value) {
            if let Ok(mut guard) = self.seen.lock() {
                guard.push(event.to_string());
            }
        }
    }

    /// Fails with 503 a fixed number of times, then succeeds.
    struct FlakySource {
        failures_left: Mutex<u32>,
    }

    impl TriageSource for FlakySource {
        fn transcribe(
            &self,
            _id: IncidentId,
        ) -> impl Future<Output = Result<TriagePayloadV1, IngestError>> + Send {
            let fail = {
                let mut left = self.failures_left.lock().expect("lock");
                if *left > 0 {
                    *left -= 1;
                    true
                } else {
                    false
                }
            };
            async move {
                if fail {
                    Err(IngestError::Status(503))
                } else {
                    Ok(TriagePayloadV1 {
                        triage_label: Some("medium".into()),
                        ..Default::default()
                    })
                }
            }
        }
    }

    fn entry(id: u32, delay_secs: u64) -> ScheduleEntry {
        ScheduleEntry {
            incident_id: IncidentId(id),
            delay_secs,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retries_then_ingests() {
        let state = AppState::new(DashboardConfig::default());
        let sink = CaptureSink::default();
        let seen = Arc::clone(&sink.seen);
        let source = Arc::new(FlakySource {
            failures_left: Mutex::new(2),
        });

        run_ingestion(
            state.clone(),
            source,
            entry(2, 5),
            RetryPolicy::default(),
            Arc::new(sink),
        )
        .await;

        let snapshot = state.snapshot();
        let two = snapshot.incident(IncidentId(2)).expect("incident");
        assert!(two.ready);
        assert!(two.triage_failure.is_none());
        let seen = seen.lock().expect("lock").clone();
        assert_eq!(seen, vec!["triage-failed", "triage-failed", "incident-ready"]);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let state = AppState::new(DashboardConfig::default());
        let source = Arc::new(FlakySource {
            failures_left: Mutex::new(10),
        });

        run_ingestion(
            state.clone(),
            source,
            entry(3, 0),
            RetryPolicy::default(),
            Arc::new(NoopSink),
        )
        .await;

        let snapshot = state.snapshot();
        let three = snapshot.incident(IncidentId(3)).expect("incident");
        assert!(!three.ready);
        let failure = three.triage_failure.as_ref().expect("failure");
        assert_eq!(failure.attempts, RetryPolicy::default().max_attempts);
        assert!(failure.exhausted);
        assert_eq!(failure.reason, "triage service returned 503");
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_advances_once_per_period() {
        let state = AppState::new(DashboardConfig::default());
        let task = tokio::spawn(run_ticker(
            state.clone(),
            Arc::new(NoopSink),
            Duration::from_secs(1),
        ));

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        task.abort();

        let snapshot = state.snapshot();
        assert_eq!(snapshot.incident(IncidentId(1)).map(|i| i.time), Some(3));
    }
}
