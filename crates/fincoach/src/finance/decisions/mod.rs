//! Recorded financial decisions and their opportunity-cost analysis.

pub mod analysis;
pub mod domain;

pub use analysis::{analyze_alternative, months_between, DecisionAnalysis, OpportunityAnalysis};
pub use domain::{
    AnalyzeRequest, DecisionCreated, DecisionId, FinancialDecision, NewDecisionRequest,
};
