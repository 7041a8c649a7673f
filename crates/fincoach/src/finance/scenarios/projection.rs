//! Month-by-month net-worth projection of the current plan against a what-if plan.
//!
//! Both trajectories start from liquid savings (emergency fund plus other savings),
//! compound at a fixed investment return and add each month's savings and SIP
//! contribution. Expenses grow monthly at the plan's growth rate. Values are kept
//! as `f64` throughout and only rounded when a yearly point is recorded.

use serde::Serialize;

use super::domain::{ScenarioConfig, ScenarioOverrides};
use crate::finance::profile::ProfileFigures;
use crate::finance::round_half_up;

/// Yearly expense growth assumed for the current plan.
pub const BASELINE_EXPENSE_GROWTH_RATE: f64 = 0.05;
/// Yearly return on net worth, compounded monthly, for both plans.
pub const ANNUAL_INVESTMENT_RETURN: f64 = 0.10;
pub const DEFAULT_PROJECTION_YEARS: u32 = 10;
pub const MAX_PROJECTION_YEARS: u32 = 100;
/// Largest magnitude a recorded net worth may reach; integers beyond it lose precision as `f64`.
pub const MAX_PROJECTED_NET_WORTH: f64 = 9_007_199_254_740_991.0;

/// Monthly cash-flow assumptions for one trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanInputs {
    pub initial_net_worth: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub monthly_investment: f64,
    /// Fractional yearly growth, e.g. `0.05`.
    pub annual_expense_growth: f64,
}

impl PlanInputs {
    pub fn baseline(figures: &ProfileFigures) -> Self {
        Self {
            initial_net_worth: figures.liquid_net_worth(),
            monthly_income: figures.total_income(),
            monthly_expenses: figures.total_expenses(),
            monthly_investment: figures.sip_monthly,
            annual_expense_growth: BASELINE_EXPENSE_GROWTH_RATE,
        }
    }

    pub fn hypothetical(figures: &ProfileFigures, overrides: &ScenarioOverrides) -> Self {
        let mut adjusted = *figures;
        if let Some(rent) = overrides.new_rent {
            adjusted.rent = rent;
        }
        if let Some(annual_salary) = overrides.job_switch_salary {
            adjusted.monthly_salary = annual_salary / 12.0;
        }

        Self {
            initial_net_worth: figures.liquid_net_worth()
                - overrides.one_time_expense.unwrap_or(0.0),
            monthly_income: adjusted.total_income(),
            monthly_expenses: adjusted.total_expenses(),
            monthly_investment: overrides.sip_investment.unwrap_or(figures.sip_monthly),
            annual_expense_growth: overrides
                .expense_growth_rate
                .map(|pct| pct / 100.0)
                .unwrap_or(BASELINE_EXPENSE_GROWTH_RATE),
        }
    }

    /// Savings in the first projected month, before any expense growth.
    pub fn monthly_savings(&self) -> f64 {
        self.monthly_income - self.monthly_expenses
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub year: u32,
    pub net_worth: i64,
}

impl ProjectionPoint {
    fn record(year: u32, net_worth: f64) -> Result<Self, String> {
        let rounded = round_half_up(net_worth);
        if !rounded.is_finite() || rounded.abs() > MAX_PROJECTED_NET_WORTH {
            return Err(format!(
                "projected net worth in year {year} is outside the supported range of \
                 ±{MAX_PROJECTED_NET_WORTH:.0}"
            ));
        }
        Ok(Self {
            year,
            net_worth: rounded as i64,
        })
    }
}

/// Yearly points for `years` years, preceded by the starting net worth at year 0.
///
/// Fails when a recorded value leaves [`MAX_PROJECTED_NET_WORTH`].
pub fn trajectory(plan: &PlanInputs, years: u32) -> Result<Vec<ProjectionPoint>, String> {
    let monthly_return = ANNUAL_INVESTMENT_RETURN / 12.0;
    let monthly_growth = 1.0 + plan.annual_expense_growth / 12.0;
    let months = years * 12;

    let mut points = Vec::with_capacity(years as usize + 1);
    let mut net_worth = plan.initial_net_worth;
    points.push(ProjectionPoint::record(0, net_worth)?);

    for month in 0..months {
        let expenses = plan.monthly_expenses * monthly_growth.powi(month as i32);
        let savings = plan.monthly_income - expenses;
        net_worth = net_worth * (1.0 + monthly_return) + savings + plan.monthly_investment;

        let elapsed = month + 1;
        if elapsed % 12 == 0 {
            points.push(ProjectionPoint::record(elapsed / 12, net_worth)?);
        }
    }

    Ok(points)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub initial_net_worth: f64,
    pub monthly_savings: f64,
    pub monthly_investments: f64,
    pub final_net_worth: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_time_expense: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSeries {
    pub current_projection: Vec<ProjectionPoint>,
    pub what_if_projection: Vec<ProjectionPoint>,
    pub timeframe_years: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub net_worth_difference: i64,
    /// One decimal place. `None` when the current plan ends at zero but the what-if does not.
    pub percentage_gain: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub current_plan: PlanSummary,
    pub what_if_scenario: PlanSummary,
    pub projection_data: ProjectionSeries,
    pub summary: ProjectionSummary,
}

impl Projection {
    pub fn with_saved_scenario(self, saved_scenario: Option<ScenarioConfig>) -> SimulationResponse {
        SimulationResponse {
            current_plan: self.current_plan,
            what_if_scenario: self.what_if_scenario,
            projection_data: self.projection_data,
            summary: SimulationSummary {
                net_worth_difference: self.summary.net_worth_difference,
                percentage_gain: self.summary.percentage_gain,
                saved_scenario,
            },
        }
    }
}

pub fn project(
    figures: &ProfileFigures,
    overrides: &ScenarioOverrides,
) -> Result<Projection, String> {
    let years = overrides
        .projection_timeframe
        .unwrap_or(DEFAULT_PROJECTION_YEARS);
    let one_time_expense = overrides.one_time_expense.unwrap_or(0.0);

    let baseline = PlanInputs::baseline(figures);
    let hypothetical = PlanInputs::hypothetical(figures, overrides);

    let current_projection = trajectory(&baseline, years)?;
    let what_if_projection = trajectory(&hypothetical, years)?;

    let final_current = final_net_worth(&current_projection);
    let final_what_if = final_net_worth(&what_if_projection);
    let net_worth_difference = final_what_if
        .checked_sub(final_current)
        .ok_or("net worth difference is outside the supported range")?;

    Ok(Projection {
        current_plan: PlanSummary {
            initial_net_worth: baseline.initial_net_worth,
            monthly_savings: baseline.monthly_savings(),
            monthly_investments: baseline.monthly_investment,
            final_net_worth: final_current,
            one_time_expense: None,
        },
        what_if_scenario: PlanSummary {
            initial_net_worth: hypothetical.initial_net_worth,
            monthly_savings: hypothetical.monthly_savings(),
            monthly_investments: hypothetical.monthly_investment,
            final_net_worth: final_what_if,
            one_time_expense: Some(one_time_expense),
        },
        projection_data: ProjectionSeries {
            current_projection,
            what_if_projection,
            timeframe_years: years,
        },
        summary: ProjectionSummary {
            net_worth_difference,
            percentage_gain: percentage_gain(net_worth_difference, final_current),
        },
    })
}

fn final_net_worth(points: &[ProjectionPoint]) -> i64 {
    points.last().map(|point| point.net_worth).unwrap_or_default()
}

fn percentage_gain(difference: i64, baseline_final: i64) -> Option<f64> {
    if baseline_final == 0 {
        return (difference == 0).then_some(0.0);
    }
    let pct = difference as f64 / baseline_final as f64 * 100.0;
    Some(round_half_up(pct * 10.0) / 10.0)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub net_worth_difference: i64,
    pub percentage_gain: Option<f64>,
    pub saved_scenario: Option<ScenarioConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResponse {
    pub current_plan: PlanSummary,
    pub what_if_scenario: PlanSummary,
    pub projection_data: ProjectionSeries,
    pub summary: SimulationSummary,
}
