//! Financial profile figures, health scoring and advisory insights.

pub mod domain;
pub mod insights;
pub mod scoring;

pub use domain::{
    DerivedTotals, FinancialProfile, HealthScores, HistoricalSnapshot, ProfileFigures,
    ProfileSummary, ProfileUpdate, ProfileUpdateResponse,
};
pub use insights::{generate_insights, savings_rate, HealthReport, Insight, InsightLevel};
pub use scoring::score_profile;
