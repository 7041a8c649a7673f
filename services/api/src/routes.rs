use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use fincoach::config::AppEnvironment;
use fincoach::finance::{finance_router, FinanceService, FinanceStore};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<S>(service: Arc<FinanceService<S>>) -> Router
where
    S: FinanceStore + 'static,
{
    finance_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Replaces 500 bodies with a generic message unless the environment exposes internals.
pub(crate) async fn redact_internal_errors(
    State(environment): State<AppEnvironment>,
    response: Response,
) -> Response {
    if response.status() != StatusCode::INTERNAL_SERVER_ERROR
        || environment.exposes_internal_errors()
    {
        return response;
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal server error" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware::map_response_with_state;
    use fincoach::error::AppError;
    use fincoach::identity::StaticTokenVerifier;
    use fincoach::storage::SqliteStore;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn failing_router(environment: AppEnvironment) -> Router {
        Router::new()
            .route(
                "/boom",
                get(|| async {
                    Err::<(), AppError>(AppError::from(std::io::Error::other(
                        "disk at /var/lib/fincoach is full",
                    )))
                }),
            )
            .route(
                "/missing",
                get(|| async { Err::<(), AppError>(AppError::NotFound("Scenario")) }),
            )
            .layer(map_response_with_state(environment, redact_internal_errors))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let state = app_state(false);
        let response = readiness_endpoint(Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["status"], "initializing");

        state.readiness.store(true, Ordering::Release);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ready");
    }

    #[tokio::test]
    async fn metrics_are_served_as_prometheus_text() {
        let response = metrics_endpoint(Extension(app_state(true)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn production_hides_internal_error_details() {
        let response = failing_router(AppEnvironment::Production)
            .oneshot(get_request("/boom"))
            .await
            .expect("route responds");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let payload = body_json(response).await;
        assert_eq!(payload["error"], "internal server error");
    }

    #[tokio::test]
    async fn development_keeps_internal_error_details() {
        let response = failing_router(AppEnvironment::Development)
            .oneshot(get_request("/boom"))
            .await
            .expect("route responds");
        let payload = body_json(response).await;
        let message = payload["error"].as_str().expect("error message");
        assert!(message.contains("disk at /var/lib/fincoach is full"));
    }

    #[tokio::test]
    async fn client_errors_pass_through_redaction() {
        let response = failing_router(AppEnvironment::Production)
            .oneshot(get_request("/missing"))
            .await
            .expect("route responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Scenario not found");
    }

    #[tokio::test]
    async fn service_routes_include_operational_endpoints() {
        let store = Arc::new(SqliteStore::open_in_memory().expect("in-memory store"));
        let service = Arc::new(FinanceService::new(
            store,
            Arc::new(StaticTokenVerifier::new()),
        ));
        let router = with_service_routes(service).layer(Extension(app_state(true)));

        let response = router
            .clone()
            .oneshot(get_request("/health"))
            .await
            .expect("route responds");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(get_request("/api/financial-data"))
            .await
            .expect("route responds");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
