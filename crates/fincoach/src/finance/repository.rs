use super::accounts::{UserId, UserRecord};
use super::decisions::{DecisionId, FinancialDecision};
use super::profile::{FinancialProfile, HistoricalSnapshot};
use super::scenarios::{ScenarioConfig, ScenarioId};

/// Registered users. A user and its zeroed profile are created together.
pub trait UserRepository: Send + Sync {
    fn create_user(
        &self,
        user: UserRecord,
        profile: FinancialProfile,
    ) -> Result<UserRecord, RepositoryError>;
    fn fetch_user(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError>;
}

pub trait ProfileRepository: Send + Sync {
    fn fetch_profile(&self, owner: &UserId) -> Result<Option<FinancialProfile>, RepositoryError>;
    fn save_profile(&self, profile: &FinancialProfile) -> Result<(), RepositoryError>;
    /// Insert or overwrite the snapshot for `(userId, month)`.
    fn upsert_snapshot(&self, snapshot: &HistoricalSnapshot) -> Result<(), RepositoryError>;
    /// Oldest month first.
    fn snapshots(&self, owner: &UserId) -> Result<Vec<HistoricalSnapshot>, RepositoryError>;
}

/// Every lookup is scoped to `owner`; another user's id behaves as absent.
pub trait DecisionRepository: Send + Sync {
    fn insert_decision(
        &self,
        decision: FinancialDecision,
    ) -> Result<FinancialDecision, RepositoryError>;
    /// Most recent decision date first.
    fn decisions(&self, owner: &UserId) -> Result<Vec<FinancialDecision>, RepositoryError>;
    fn fetch_decision(
        &self,
        owner: &UserId,
        id: &DecisionId,
    ) -> Result<Option<FinancialDecision>, RepositoryError>;
    /// Fails with [`RepositoryError::NotFound`] when no owned row matches.
    fn update_decision(&self, decision: &FinancialDecision) -> Result<(), RepositoryError>;
    /// Returns whether an owned row was removed.
    fn delete_decision(&self, owner: &UserId, id: &DecisionId) -> Result<bool, RepositoryError>;
}

/// Every lookup is scoped to `owner`; another user's id behaves as absent.
pub trait ScenarioRepository: Send + Sync {
    fn insert_scenario(&self, scenario: ScenarioConfig)
        -> Result<ScenarioConfig, RepositoryError>;
    /// Newest first.
    fn scenarios(&self, owner: &UserId) -> Result<Vec<ScenarioConfig>, RepositoryError>;
    fn fetch_scenario(
        &self,
        owner: &UserId,
        id: &ScenarioId,
    ) -> Result<Option<ScenarioConfig>, RepositoryError>;
    fn update_scenario(&self, scenario: &ScenarioConfig) -> Result<(), RepositoryError>;
    fn delete_scenario(&self, owner: &UserId, id: &ScenarioId) -> Result<bool, RepositoryError>;
}

/// Everything the finance service persists.
pub trait FinanceStore:
    UserRepository + ProfileRepository + DecisionRepository + ScenarioRepository
{
}

impl<T> FinanceStore for T where
    T: UserRepository + ProfileRepository + DecisionRepository + ScenarioRepository
{
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
