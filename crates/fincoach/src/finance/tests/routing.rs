use super::common::*;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::finance::router::{me_handler, profile_handler};
use crate::finance::FinanceService;

#[tokio::test]
async fn profile_handler_returns_internal_error_on_storage_failure() {
    let service = Arc::new(FinanceService::new(
        Arc::new(UnavailableStore),
        Arc::new(verifier()),
    ));
    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::AUTHORIZATION,
        format!("Bearer {ALICE_TOKEN}").parse().expect("valid header"),
    );

    let response = profile_handler::<UnavailableStore>(State(service), headers).await;
    let payload = match response {
        Err(error) => {
            assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
            error.to_string()
        }
        Ok(_) => panic!("expected storage failure"),
    };
    assert!(payload.contains("database offline"));
}

#[tokio::test]
async fn me_handler_rejects_missing_token() {
    let (service, _) = build_service();
    let response = me_handler(State(Arc::new(service)), HeaderMap::new()).await;
    assert!(matches!(
        response,
        Err(crate::error::AppError::Unauthenticated(_))
    ));
}

#[tokio::test]
async fn unregistered_callers_are_told_to_register() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(request(
            Method::GET,
            "/api/financial-data",
            Some(NEWCOMER_TOKEN),
            None,
        ))
        .await
        .expect("route responds");
    let payload = expect_status(response, StatusCode::FORBIDDEN).await;
    assert_eq!(payload["needsRegistration"], json!(true));
}

#[tokio::test]
async fn register_route_accepts_verified_newcomers() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/auth/register",
            Some(NEWCOMER_TOKEN),
            Some(json!({ "name": "Nia" })),
        ))
        .await
        .expect("route responds");
    let payload = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(payload["message"], json!("User registered successfully"));
    assert_eq!(payload["user"]["id"], json!("newcomer"));

    let response = router
        .oneshot(request(
            Method::POST,
            "/api/auth/register",
            Some(NEWCOMER_TOKEN),
            None,
        ))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn put_then_get_reflects_merged_fields() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(request(
            Method::PUT,
            "/api/financial-data",
            Some(ALICE_TOKEN),
            Some(json!({ "monthlySalary": 60000, "monthlyEMI": 6000, "totalDebt": 60000 })),
        ))
        .await
        .expect("route responds");
    let payload = expect_status(response, StatusCode::OK).await;
    assert_eq!(payload["financialData"]["monthlyEMI"], json!(6000.0));

    let response = router
        .oneshot(request(
            Method::GET,
            "/api/financial-data",
            Some(ALICE_TOKEN),
            None,
        ))
        .await
        .expect("route responds");
    let payload = expect_status(response, StatusCode::OK).await;
    assert_eq!(payload["monthlySalary"], json!(60000.0));
    assert_eq!(payload["totalIncome"], json!(60000.0));
    assert_eq!(payload["debtFreeMonths"], json!(10));
    assert_eq!(payload["debtRatioScore"], json!(72));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(request(
            Method::PUT,
            "/api/financial-data",
            Some(ALICE_TOKEN),
            Some(json!({ "rent": "a lot" })),
        ))
        .await
        .expect("route responds");
    let payload = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert!(payload["error"].is_string());
}

#[tokio::test]
async fn tips_route_validates_ids() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/financial-coach/tips?id=2",
            Some(ALICE_TOKEN),
            None,
        ))
        .await
        .expect("route responds");
    let payload = expect_status(response, StatusCode::OK).await;
    assert_eq!(payload["title"], json!("Emergency Fund First"));

    let response = router
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/financial-coach/tips?id=42",
            Some(ALICE_TOKEN),
            None,
        ))
        .await
        .expect("route responds");
    let payload = expect_status(response, StatusCode::NOT_FOUND).await;
    assert_eq!(payload["error"], json!("Tip not found"));

    let response = router
        .oneshot(request(
            Method::GET,
            "/api/financial-coach/tips?id=second",
            Some(ALICE_TOKEN),
            None,
        ))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn foreign_decisions_are_not_found() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/financial-decisions",
            Some(ALICE_TOKEN),
            Some(json!({
                "title": "New laptop",
                "amount": 120000,
                "date": "2025-09-01",
                "category": "Electronics"
            })),
        ))
        .await
        .expect("route responds");
    let payload = expect_status(response, StatusCode::CREATED).await;
    let id = payload["financialDecision"]["id"]
        .as_str()
        .expect("decision id")
        .to_string();

    let uri = format!("/api/financial-decisions/{id}");
    let response = router
        .clone()
        .oneshot(request(Method::GET, &uri, Some(BOB_TOKEN), None))
        .await
        .expect("route responds");
    let payload = expect_status(response, StatusCode::NOT_FOUND).await;
    assert_eq!(payload["error"], json!("Financial decision not found"));

    let response = router
        .oneshot(request(Method::DELETE, &uri, Some(ALICE_TOKEN), None))
        .await
        .expect("route responds");
    let payload = expect_status(response, StatusCode::OK).await;
    assert_eq!(
        payload["message"],
        json!("Financial decision deleted successfully")
    );
}

#[tokio::test]
async fn simulate_route_is_not_captured_by_scenario_ids() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(request(
            Method::POST,
            "/api/scenarios/simulate",
            Some(ALICE_TOKEN),
            Some(json!({ "projectionTimeframe": 0 })),
        ))
        .await
        .expect("route responds");
    let payload = expect_status(response, StatusCode::OK).await;
    assert_eq!(payload["projectionData"]["timeframeYears"], json!(0));
    assert_eq!(
        payload["projectionData"]["currentProjection"],
        json!([{ "year": 0, "netWorth": 0 }])
    );
    assert_eq!(payload["summary"]["percentageGain"], json!(0.0));
    assert!(payload["summary"]["savedScenario"].is_null());
}
