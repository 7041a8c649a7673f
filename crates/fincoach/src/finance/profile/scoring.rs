use super::domain::{HealthScores, ProfileFigures};
use crate::finance::round_half_up;

/// Months of essential spend that earn a full emergency-fund score.
pub const EMERGENCY_FUND_TARGET_MONTHS: f64 = 6.0;
/// Debt payments at or above this share of income score zero.
pub const DEBT_RATIO_CEILING: f64 = 0.36;
/// Share of income invested monthly that earns a full investment score.
pub const INVESTMENT_RATIO_TARGET: f64 = 0.2;

const EMERGENCY_FUND_WEIGHT: f64 = 0.3;
const DEBT_RATIO_WEIGHT: f64 = 0.3;
const INVESTMENT_WEIGHT: f64 = 0.4;

pub fn score_profile(figures: &ProfileFigures) -> HealthScores {
    let emergency_fund_score = emergency_fund_score(figures);
    let debt_ratio_score = debt_ratio_score(figures);
    let investment_allocation_score = investment_allocation_score(figures);

    let overall = EMERGENCY_FUND_WEIGHT * f64::from(emergency_fund_score)
        + DEBT_RATIO_WEIGHT * f64::from(debt_ratio_score)
        + INVESTMENT_WEIGHT * f64::from(investment_allocation_score);

    HealthScores {
        overall_score: to_score(overall),
        emergency_fund_score,
        debt_ratio_score,
        investment_allocation_score,
    }
}

pub fn emergency_fund_score(figures: &ProfileFigures) -> u8 {
    let coverage = f64::from(figures.emergency_fund_coverage());
    to_score(coverage / EMERGENCY_FUND_TARGET_MONTHS * 100.0)
}

pub fn debt_ratio(figures: &ProfileFigures) -> f64 {
    ratio_of_income(figures.monthly_emi, figures)
}

pub fn debt_ratio_score(figures: &ProfileFigures) -> u8 {
    to_score((1.0 - debt_ratio(figures) / DEBT_RATIO_CEILING) * 100.0)
}

pub fn investment_ratio(figures: &ProfileFigures) -> f64 {
    ratio_of_income(figures.sip_monthly, figures)
}

pub fn investment_allocation_score(figures: &ProfileFigures) -> u8 {
    to_score(investment_ratio(figures) / INVESTMENT_RATIO_TARGET * 100.0)
}

fn ratio_of_income(amount: f64, figures: &ProfileFigures) -> f64 {
    let income = figures.total_income();
    if income > 0.0 {
        amount / income
    } else {
        0.0
    }
}

fn to_score(raw: f64) -> u8 {
    round_half_up(raw).clamp(0.0, 100.0) as u8
}
