use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dispatch_core::view::DashboardView;
use dispatch_core::{DashboardError, IncidentId};
use dispatch_runtime::commands;
use dispatch_runtime::state::AppState;

pub fn dashboard_router(state: AppState) -> Router {
    Router::new()
        .route("/api/dashboard", get(handle_dashboard))
        .route("/api/incidents/:id/select", post(handle_select))
        .route("/api/selection/clear", post(handle_clear_selection))
        .route("/api/incidents/:id/dispatch/:unit", post(handle_dispatch))
        .with_state(state)
}

pub struct ApiError(DashboardError);

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

fn status_for(err: &DashboardError) -> StatusCode {
    match err {
        DashboardError::IncidentNotFound(_) => StatusCode::NOT_FOUND,
        DashboardError::InvalidUnitType(_) => StatusCode::BAD_REQUEST,
        DashboardError::UnitsExhausted(_) => StatusCode::CONFLICT,
        DashboardError::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

async fn handle_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    Json(commands::get_dashboard(&state))
}

async fn handle_select(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<DashboardView>, ApiError> {
    Ok(Json(commands::select_incident(&state, Some(IncidentId(id)))?))
}

async fn handle_clear_selection(
    State(state): State<AppState>,
) -> Result<Json<DashboardView>, ApiError> {
    Ok(Json(commands::select_incident(&state, None)?))
}

async fn handle_dispatch(
    State(state): State<AppState>,
    Path((id, unit)): Path<(u32, String)>,
) -> Result<Json<DashboardView>, ApiError> {
    Ok(Json(commands::dispatch_unit(&state, IncidentId(id), &unit)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use dispatch_core::config::DashboardConfig;
    use dispatch_core::UnitPool;
    use tower::ServiceExt;

    fn app(units: UnitPool) -> Router {
        dashboard_router(AppState::new(DashboardConfig {
            units,
            ..Default::default()
        }))
    }

    async fn post(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json"))
    }

    #[tokio::test]
    async fn dashboard_lists_pending_placeholders() {
        let response = app(UnitPool::default())
            .oneshot(
                Request::builder()
                    .uri("/api/dashboard")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let view: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(view["active_calls"], 4);
        assert_eq!(view["pending"].as_array().map(Vec::len), Some(4));
        assert_eq!(view["units"]["ambulances"], 8);
    }

    #[tokio::test]
    async fn dispatch_status_codes() {
        let router = app(UnitPool {
            ambulances: 1,
            fire_trucks: 0,
            police: 1,
        });

        let (status, body) = post(router.clone(), "/api/incidents/1/dispatch/ambulance").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["units"]["ambulances"], 0);

        let (status, _) = post(router.clone(), "/api/incidents/1/dispatch/fire").await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = post(router.clone(), "/api/incidents/1/dispatch/boat").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = post(router, "/api/incidents/42/dispatch/police").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "incident 42 not found");
    }

    #[tokio::test]
    async fn select_and_clear() {
        let router = app(UnitPool::default());
        let (status, body) = post(router.clone(), "/api/incidents/3/select").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selected"]["id"], 3);

        let (status, body) = post(router, "/api/selection/clear").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["selected"].is_null());
    }
}
