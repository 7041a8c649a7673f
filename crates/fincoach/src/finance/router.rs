use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::accounts::{RegisterRequest, RegistrationResponse};
use super::coach::AskRequest;
use super::decisions::{AnalyzeRequest, DecisionCreated, DecisionId, NewDecisionRequest};
use super::profile::{ProfileUpdate, ProfileUpdateResponse};
use super::repository::FinanceStore;
use super::scenarios::{
    NewScenarioRequest, ScenarioEnvelope, ScenarioId, ScenarioUpdate, SimulateRequest,
};
use super::service::FinanceService;
use crate::error::AppError;

type SharedService<S> = State<Arc<FinanceService<S>>>;

/// Router builder exposing every `/api` endpoint over the finance service.
pub fn finance_router<S>(service: Arc<FinanceService<S>>) -> Router
where
    S: FinanceStore + 'static,
{
    Router::new()
        .route("/api/auth/register", post(register_handler::<S>))
        .route("/api/auth/me", get(me_handler::<S>))
        .route(
            "/api/financial-data",
            get(profile_handler::<S>).put(update_profile_handler::<S>),
        )
        .route("/api/historical-data", get(historical_handler::<S>))
        .route(
            "/api/financial-coach/health-score",
            get(health_score_handler::<S>),
        )
        .route("/api/financial-coach/tips", get(tips_handler::<S>))
        .route("/api/financial-coach/ask", post(ask_handler::<S>))
        .route(
            "/api/financial-decisions",
            get(list_decisions_handler::<S>).post(create_decision_handler::<S>),
        )
        .route(
            "/api/financial-decisions/:id",
            get(decision_handler::<S>).delete(delete_decision_handler::<S>),
        )
        .route(
            "/api/financial-decisions/:id/analyze",
            post(analyze_decision_handler::<S>),
        )
        .route(
            "/api/scenarios",
            get(list_scenarios_handler::<S>).post(create_scenario_handler::<S>),
        )
        .route("/api/scenarios/simulate", post(simulate_handler::<S>))
        .route(
            "/api/scenarios/:id",
            get(scenario_handler::<S>)
                .put(update_scenario_handler::<S>)
                .delete(delete_scenario_handler::<S>),
        )
        .with_state(service)
}

fn message(text: &'static str) -> Json<serde_json::Value> {
    Json(json!({ "message": text }))
}

pub(crate) async fn register_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    payload: Option<Json<RegisterRequest>>,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let identity = service.verify(&headers)?;
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let user = service.register(identity, request, Utc::now())?;
    let body = RegistrationResponse {
        message: "User registered successfully",
        user,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

pub(crate) async fn me_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    Ok(Json(service.me(&caller)?).into_response())
}

pub(crate) async fn profile_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    Ok(Json(service.profile(&caller)?).into_response())
}

pub(crate) async fn update_profile_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    let Json(update) = payload?;
    let now = Utc::now();
    let financial_data = service.update_profile(&caller, update, now.date_naive(), now)?;
    let body = ProfileUpdateResponse {
        message: "Financial data updated successfully",
        financial_data,
    };
    Ok(Json(body).into_response())
}

pub(crate) async fn historical_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    Ok(Json(service.historical(&caller)?).into_response())
}

pub(crate) async fn health_score_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    Ok(Json(service.health_report(&caller)?).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TipQuery {
    id: Option<String>,
}

pub(crate) async fn tips_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Query(query): Query<TipQuery>,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    service.authenticate(&headers)?;
    let id = query
        .id
        .map(|raw| {
            raw.trim()
                .parse::<u32>()
                .map_err(|_| AppError::validation(format!("tip id '{raw}' must be a number")))
        })
        .transpose()?;
    Ok(Json(service.tip(id)?).into_response())
}

pub(crate) async fn ask_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    let Json(request) = payload?;
    Ok(Json(service.ask(&caller, request)?).into_response())
}

pub(crate) async fn list_decisions_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    Ok(Json(service.decisions(&caller)?).into_response())
}

pub(crate) async fn create_decision_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    payload: Result<Json<NewDecisionRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    let Json(request) = payload?;
    let financial_decision = service.create_decision(&caller, request, Utc::now())?;
    let body = DecisionCreated {
        message: "Financial decision created successfully",
        financial_decision,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

pub(crate) async fn decision_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    Ok(Json(service.decision(&caller, &DecisionId(id))?).into_response())
}

pub(crate) async fn delete_decision_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    service.delete_decision(&caller, &DecisionId(id))?;
    Ok(message("Financial decision deleted successfully").into_response())
}

pub(crate) async fn analyze_decision_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    let Json(request) = payload?;
    let today = Utc::now().date_naive();
    let analysis = service.analyze_decision(&caller, &DecisionId(id), request, today)?;
    Ok(Json(analysis).into_response())
}

pub(crate) async fn list_scenarios_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    Ok(Json(service.scenarios(&caller)?).into_response())
}

pub(crate) async fn create_scenario_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    payload: Result<Json<NewScenarioRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    let Json(request) = payload?;
    let scenario = service.create_scenario(&caller, request, Utc::now())?;
    let body = ScenarioEnvelope {
        message: "Scenario created successfully",
        scenario,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

pub(crate) async fn scenario_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    Ok(Json(service.scenario(&caller, &ScenarioId(id))?).into_response())
}

pub(crate) async fn update_scenario_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<ScenarioUpdate>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    let Json(update) = payload?;
    let scenario = service.update_scenario(&caller, &ScenarioId(id), update, Utc::now())?;
    let body = ScenarioEnvelope {
        message: "Scenario updated successfully",
        scenario,
    };
    Ok(Json(body).into_response())
}

pub(crate) async fn delete_scenario_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    service.delete_scenario(&caller, &ScenarioId(id))?;
    Ok(message("Scenario deleted successfully").into_response())
}

pub(crate) async fn simulate_handler<S>(
    State(service): SharedService<S>,
    headers: HeaderMap,
    payload: Result<Json<SimulateRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: FinanceStore + 'static,
{
    let caller = service.authenticate(&headers)?;
    let Json(request) = payload?;
    Ok(Json(service.simulate(&caller, request, Utc::now())?).into_response())
}
