//! Personal finance workflows: profile scoring, coaching content, decision
//! hindsight analysis and what-if scenario projections.
//!
//! Engines under [`profile`], [`decisions`] and [`scenarios`] are pure functions.
//! [`service::FinanceService`] wires them to the repositories and
//! [`router::finance_router`] exposes the service over HTTP.

pub mod accounts;
pub mod coach;
pub mod decisions;
pub mod profile;
pub mod repository;
pub mod router;
pub mod scenarios;
pub mod service;

#[cfg(test)]
mod tests;

pub use accounts::{Caller, RegisterRequest, UserId, UserRecord};
pub use repository::{
    DecisionRepository, FinanceStore, ProfileRepository, RepositoryError, ScenarioRepository,
    UserRepository,
};
pub use router::finance_router;
pub use service::FinanceService;

/// Round half-up to the nearest integer, the convention every engine reports with.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
