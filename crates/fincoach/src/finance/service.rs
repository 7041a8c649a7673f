use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::{DateTime, NaiveDate, Utc};
use rand_core::{OsRng, RngCore};

use super::accounts::{Caller, RegisterRequest, UserId, UserRecord};
use super::coach::{answer_question, tip_by_id, tip_for_draw, AskRequest, CoachAnswer, Tip};
use super::decisions::domain::non_blank;
use super::decisions::{
    AnalyzeRequest, DecisionAnalysis, DecisionId, FinancialDecision, NewDecisionRequest,
};
use super::profile::{
    generate_insights, savings_rate, score_profile, FinancialProfile, HealthReport,
    HistoricalSnapshot, ProfileSummary, ProfileUpdate,
};
use super::repository::{FinanceStore, RepositoryError};
use super::scenarios::{
    project, NewScenarioRequest, ScenarioConfig, ScenarioId, ScenarioUpdate, SimulateRequest,
    SimulationResponse, DEFAULT_PROJECTION_YEARS,
};
use crate::error::AppError;
use crate::identity::{bearer_token, IdentityVerifier, VerifiedIdentity};

const PROFILE: &str = "Financial data";
const DECISION: &str = "Financial decision";
const SCENARIO: &str = "Scenario";

/// Service composing identity verification, the finance store and the pure engines.
///
/// Every operation past [`FinanceService::authenticate`] takes the resolved [`Caller`]
/// and scopes its reads and writes to that owner.
pub struct FinanceService<S> {
    store: Arc<S>,
    verifier: Arc<dyn IdentityVerifier>,
}

impl<S> FinanceService<S>
where
    S: FinanceStore + 'static,
{
    pub fn new(store: Arc<S>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { store, verifier }
    }

    /// Verify the bearer token without requiring a local user.
    pub fn verify(&self, headers: &HeaderMap) -> Result<VerifiedIdentity, AppError> {
        let token = bearer_token(headers)?;
        Ok(self.verifier.verify(token)?)
    }

    /// Verify the bearer token and resolve the registered caller.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Caller, AppError> {
        let identity = self.verify(headers)?;
        let user = self
            .store
            .fetch_user(&UserId(identity.uid))?
            .ok_or(AppError::RegistrationRequired)?;
        Ok(Caller {
            user_id: user.id,
            email: user.email,
        })
    }

    pub fn register(
        &self,
        identity: VerifiedIdentity,
        request: RegisterRequest,
        now: DateTime<Utc>,
    ) -> Result<UserRecord, AppError> {
        let user_id = UserId(identity.uid);
        if self.store.fetch_user(&user_id)?.is_some() {
            return Err(AppError::Conflict("User already registered".to_string()));
        }

        let user = UserRecord {
            id: user_id.clone(),
            email: identity.email,
            name: non_blank(request.name),
            created_at: now,
        };
        let profile = FinancialProfile::empty(user_id, now);
        let user = self.store.create_user(user, profile).map_err(|err| match err {
            RepositoryError::Conflict => AppError::Conflict("User already registered".to_string()),
            other => other.into(),
        })?;

        tracing::info!(user_id = %user.id, "registered user");
        Ok(user)
    }

    pub fn me(&self, caller: &Caller) -> Result<UserRecord, AppError> {
        self.store
            .fetch_user(&caller.user_id)?
            .ok_or(AppError::NotFound("User"))
    }

    fn stored_profile(&self, caller: &Caller) -> Result<FinancialProfile, AppError> {
        self.store
            .fetch_profile(&caller.user_id)?
            .ok_or(AppError::NotFound(PROFILE))
    }

    pub fn profile(&self, caller: &Caller) -> Result<ProfileSummary, AppError> {
        Ok(self.stored_profile(caller)?.summary())
    }

    /// Merge the update, rescore, persist and record this month's snapshot.
    pub fn update_profile(
        &self,
        caller: &Caller,
        update: ProfileUpdate,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<FinancialProfile, AppError> {
        update.validate().map_err(AppError::Validation)?;

        let mut profile = self.stored_profile(caller)?;
        update.apply(&mut profile.figures);
        profile.scores = score_profile(&profile.figures);
        profile.updated_at = now;

        self.store.save_profile(&profile)?;
        self.store
            .upsert_snapshot(&HistoricalSnapshot::capture(&profile, today, now))?;

        tracing::debug!(
            user_id = %caller.user_id,
            overall_score = profile.scores.overall_score,
            "financial profile updated"
        );
        Ok(profile)
    }

    pub fn historical(&self, caller: &Caller) -> Result<Vec<HistoricalSnapshot>, AppError> {
        Ok(self.store.snapshots(&caller.user_id)?)
    }

    /// Scores are recomputed from the current figures rather than read back.
    pub fn health_report(&self, caller: &Caller) -> Result<HealthReport, AppError> {
        let profile = self.stored_profile(caller)?;
        let health_score = score_profile(&profile.figures);
        Ok(HealthReport {
            health_score,
            insights: generate_insights(&health_score, &profile.figures),
            savings_rate: savings_rate(&profile.figures),
        })
    }

    pub fn tip(&self, id: Option<u32>) -> Result<Tip, AppError> {
        match id {
            Some(id) => tip_by_id(id).ok_or(AppError::NotFound("Tip")),
            None => Ok(tip_for_draw(OsRng.next_u32())),
        }
    }

    pub fn ask(&self, caller: &Caller, request: AskRequest) -> Result<CoachAnswer, AppError> {
        let question =
            non_blank(request.question).ok_or(AppError::validation("Question is required"))?;
        let profile = self.stored_profile(caller)?;
        Ok(answer_question(&question, &profile.figures))
    }

    pub fn decisions(&self, caller: &Caller) -> Result<Vec<FinancialDecision>, AppError> {
        Ok(self.store.decisions(&caller.user_id)?)
    }

    pub fn create_decision(
        &self,
        caller: &Caller,
        request: NewDecisionRequest,
        now: DateTime<Utc>,
    ) -> Result<FinancialDecision, AppError> {
        let decision = request
            .into_decision(caller.user_id.clone(), now)
            .map_err(AppError::Validation)?;
        Ok(self.store.insert_decision(decision)?)
    }

    pub fn decision(
        &self,
        caller: &Caller,
        id: &DecisionId,
    ) -> Result<FinancialDecision, AppError> {
        self.store
            .fetch_decision(&caller.user_id, id)?
            .ok_or(AppError::NotFound(DECISION))
    }

    pub fn delete_decision(&self, caller: &Caller, id: &DecisionId) -> Result<(), AppError> {
        if !self.store.delete_decision(&caller.user_id, id)? {
            return Err(AppError::NotFound(DECISION));
        }
        tracing::info!(user_id = %caller.user_id, decision_id = %id, "financial decision deleted");
        Ok(())
    }

    /// Record the alternative on the decision and compare it in hindsight as of `today`.
    pub fn analyze_decision(
        &self,
        caller: &Caller,
        id: &DecisionId,
        request: AnalyzeRequest,
        today: NaiveDate,
    ) -> Result<DecisionAnalysis, AppError> {
        let (option, expected_return) = request.validate().map_err(AppError::Validation)?;

        let mut decision = self.decision(caller, id)?;
        decision.alternative_option = Some(option.clone());
        decision.expected_return = Some(expected_return);
        self.store.update_decision(&decision)?;

        Ok(DecisionAnalysis::build(
            &decision,
            option,
            expected_return,
            today,
        ))
    }

    pub fn scenarios(&self, caller: &Caller) -> Result<Vec<ScenarioConfig>, AppError> {
        Ok(self.store.scenarios(&caller.user_id)?)
    }

    pub fn create_scenario(
        &self,
        caller: &Caller,
        request: NewScenarioRequest,
        now: DateTime<Utc>,
    ) -> Result<ScenarioConfig, AppError> {
        let scenario = request
            .into_scenario(caller.user_id.clone(), now)
            .map_err(AppError::Validation)?;
        Ok(self.store.insert_scenario(scenario)?)
    }

    pub fn scenario(&self, caller: &Caller, id: &ScenarioId) -> Result<ScenarioConfig, AppError> {
        self.store
            .fetch_scenario(&caller.user_id, id)?
            .ok_or(AppError::NotFound(SCENARIO))
    }

    pub fn update_scenario(
        &self,
        caller: &Caller,
        id: &ScenarioId,
        update: ScenarioUpdate,
        now: DateTime<Utc>,
    ) -> Result<ScenarioConfig, AppError> {
        let mut scenario = self.scenario(caller, id)?;
        update
            .apply(&mut scenario, now)
            .map_err(AppError::Validation)?;
        self.store.update_scenario(&scenario)?;
        Ok(scenario)
    }

    pub fn delete_scenario(&self, caller: &Caller, id: &ScenarioId) -> Result<(), AppError> {
        if !self.store.delete_scenario(&caller.user_id, id)? {
            return Err(AppError::NotFound(SCENARIO));
        }
        tracing::info!(user_id = %caller.user_id, scenario_id = %id, "scenario deleted");
        Ok(())
    }

    /// Project the caller's profile under the requested overrides.
    ///
    /// `scenarioId` writes the overrides into that owned scenario; otherwise a
    /// `saveName` stores them as a new scenario.
    pub fn simulate(
        &self,
        caller: &Caller,
        request: SimulateRequest,
        now: DateTime<Utc>,
    ) -> Result<SimulationResponse, AppError> {
        let overrides = request.overrides();
        overrides.validate().map_err(AppError::Validation)?;

        let profile = self.stored_profile(caller)?;
        let projection =
            project(&profile.figures, &overrides).map_err(AppError::Validation)?;

        let saved_scenario = if let Some(id) = non_blank(request.scenario_id) {
            let mut scenario = self.scenario(caller, &ScenarioId(id))?;
            ScenarioUpdate::from_overrides(&overrides)
                .apply(&mut scenario, now)
                .map_err(AppError::Validation)?;
            self.store.update_scenario(&scenario)?;
            Some(scenario)
        } else if let Some(name) = non_blank(request.save_name) {
            let timeframe = overrides
                .projection_timeframe
                .filter(|years| *years > 0)
                .unwrap_or(DEFAULT_PROJECTION_YEARS);
            let request = NewScenarioRequest {
                name: Some(name),
                new_rent: overrides.new_rent,
                job_switch_salary: overrides.job_switch_salary,
                sip_investment: overrides.sip_investment,
                expense_growth_rate: overrides.expense_growth_rate,
                projection_timeframe: Some(timeframe),
                one_time_expense: overrides.one_time_expense,
            };
            Some(self.create_scenario(caller, request, now)?)
        } else {
            None
        };

        tracing::debug!(
            user_id = %caller.user_id,
            years = projection.projection_data.timeframe_years,
            net_worth_difference = projection.summary.net_worth_difference,
            "scenario simulated"
        );
        Ok(projection.with_saved_scenario(saved_scenario))
    }
}
