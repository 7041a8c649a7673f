use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::finance::accounts::{Caller, RegisterRequest, UserId, UserRecord};
use crate::finance::decisions::{DecisionId, FinancialDecision};
use crate::finance::profile::{FinancialProfile, HistoricalSnapshot, ProfileUpdate};
use crate::finance::repository::{
    DecisionRepository, ProfileRepository, RepositoryError, ScenarioRepository, UserRepository,
};
use crate::finance::scenarios::{ScenarioConfig, ScenarioId};
use crate::finance::{finance_router, FinanceService};
use crate::identity::{StaticTokenVerifier, VerifiedIdentity};
use crate::storage::SqliteStore;

pub(super) const ALICE_TOKEN: &str = "alice-token";
pub(super) const BOB_TOKEN: &str = "bob-token";
pub(super) const NEWCOMER_TOKEN: &str = "newcomer-token";

pub(super) fn verifier() -> StaticTokenVerifier {
    StaticTokenVerifier::new()
        .with_token(ALICE_TOKEN, "alice", "alice@example.com")
        .with_token(BOB_TOKEN, "bob", "bob@example.com")
        .with_token(NEWCOMER_TOKEN, "newcomer", "newcomer@example.com")
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 17, 10, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn today() -> NaiveDate {
    now().date_naive()
}

pub(super) fn identity(uid: &str) -> VerifiedIdentity {
    VerifiedIdentity {
        uid: uid.to_string(),
        email: format!("{uid}@example.com"),
    }
}

pub(super) fn caller(uid: &str) -> Caller {
    Caller {
        user_id: UserId(uid.to_string()),
        email: format!("{uid}@example.com"),
    }
}

/// Service over an in-memory database with alice and bob registered.
pub(super) fn build_service() -> (FinanceService<SqliteStore>, Arc<SqliteStore>) {
    let store = Arc::new(SqliteStore::open_in_memory().expect("in-memory store"));
    let service = FinanceService::new(store.clone(), Arc::new(verifier()));
    for uid in ["alice", "bob"] {
        service
            .register(identity(uid), RegisterRequest::default(), now())
            .expect("registration succeeds");
    }
    (service, store)
}

pub(super) fn salaried_update() -> ProfileUpdate {
    ProfileUpdate {
        monthly_salary: Some(100_000.0),
        rent: Some(30_000.0),
        utilities: Some(5_000.0),
        groceries: Some(15_000.0),
        subscriptions: Some(5_000.0),
        miscellaneous: Some(15_000.0),
        emergency_fund: Some(150_000.0),
        other_savings: Some(50_000.0),
        sip_monthly: Some(10_000.0),
        ..ProfileUpdate::default()
    }
}

pub(super) fn router_with_service(service: FinanceService<SqliteStore>) -> axum::Router {
    finance_router(Arc::new(service))
}

pub(super) fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).expect("serialize body"))
        }
        None => Body::empty(),
    };
    builder.body(body).expect("valid request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn expect_status(response: Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    read_json_body(response).await
}

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

/// Store whose users resolve but whose every other read and write fails.
pub(super) struct UnavailableStore;

impl UserRepository for UnavailableStore {
    fn create_user(
        &self,
        _user: UserRecord,
        _profile: FinancialProfile,
    ) -> Result<UserRecord, RepositoryError> {
        offline()
    }

    fn fetch_user(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        Ok(Some(UserRecord {
            id: id.clone(),
            email: format!("{id}@example.com"),
            name: None,
            created_at: now(),
        }))
    }
}

impl ProfileRepository for UnavailableStore {
    fn fetch_profile(&self, _owner: &UserId) -> Result<Option<FinancialProfile>, RepositoryError> {
        offline()
    }

    fn save_profile(&self, _profile: &FinancialProfile) -> Result<(), RepositoryError> {
        offline()
    }

    fn upsert_snapshot(&self, _snapshot: &HistoricalSnapshot) -> Result<(), RepositoryError> {
        offline()
    }

    fn snapshots(&self, _owner: &UserId) -> Result<Vec<HistoricalSnapshot>, RepositoryError> {
        offline()
    }
}

impl DecisionRepository for UnavailableStore {
    fn insert_decision(
        &self,
        _decision: FinancialDecision,
    ) -> Result<FinancialDecision, RepositoryError> {
        offline()
    }

    fn decisions(&self, _owner: &UserId) -> Result<Vec<FinancialDecision>, RepositoryError> {
        offline()
    }

    fn fetch_decision(
        &self,
        _owner: &UserId,
        _id: &DecisionId,
    ) -> Result<Option<FinancialDecision>, RepositoryError> {
        offline()
    }

    fn update_decision(&self, _decision: &FinancialDecision) -> Result<(), RepositoryError> {
        offline()
    }

    fn delete_decision(&self, _owner: &UserId, _id: &DecisionId) -> Result<bool, RepositoryError> {
        offline()
    }
}

impl ScenarioRepository for UnavailableStore {
    fn insert_scenario(
        &self,
        _scenario: ScenarioConfig,
    ) -> Result<ScenarioConfig, RepositoryError> {
        offline()
    }

    fn scenarios(&self, _owner: &UserId) -> Result<Vec<ScenarioConfig>, RepositoryError> {
        offline()
    }

    fn fetch_scenario(
        &self,
        _owner: &UserId,
        _id: &ScenarioId,
    ) -> Result<Option<ScenarioConfig>, RepositoryError> {
        offline()
    }

    fn update_scenario(&self, _scenario: &ScenarioConfig) -> Result<(), RepositoryError> {
        offline()
    }

    fn delete_scenario(&self, _owner: &UserId, _id: &ScenarioId) -> Result<bool, RepositoryError> {
        offline()
    }
}
