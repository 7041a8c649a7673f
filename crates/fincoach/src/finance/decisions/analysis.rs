use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::domain::FinancialDecision;

/// Calendar months from `from` to `to`, counted on year/month components only.
/// Negative when `to` precedes `from`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

/// Hindsight comparison of a decision against compounding the same amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityAnalysis {
    pub projected_value: f64,
    pub opportunity_cost: f64,
    pub months_elapsed: i32,
    pub percentage_difference: f64,
}

/// A future-dated decision yields a negative cost of waiting.
pub fn analyze_alternative(
    amount: f64,
    expected_return_pct: f64,
    decided_on: NaiveDate,
    today: NaiveDate,
) -> OpportunityAnalysis {
    let months_elapsed = months_between(decided_on, today);
    let monthly_rate = expected_return_pct / 100.0 / 12.0;
    let projected_value = amount * (1.0 + monthly_rate).powi(months_elapsed);
    let opportunity_cost = projected_value - amount;
    let percentage_difference = if amount != 0.0 {
        opportunity_cost / amount * 100.0
    } else {
        0.0
    };

    OpportunityAnalysis {
        projected_value,
        opportunity_cost,
        months_elapsed,
        percentage_difference,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualDecisionView {
    pub title: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub current_value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeScenarioView {
    pub option: String,
    pub expected_return: f64,
    pub projected_value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisFigures {
    pub opportunity_cost: f64,
    pub months_elapsed: i32,
    pub percentage_difference: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionAnalysis {
    pub actual_decision: ActualDecisionView,
    pub alternative_scenario: AlternativeScenarioView,
    pub analysis: AnalysisFigures,
}

impl DecisionAnalysis {
    pub fn build(
        decision: &FinancialDecision,
        option: String,
        expected_return: f64,
        today: NaiveDate,
    ) -> Self {
        let outcome = analyze_alternative(decision.amount, expected_return, decision.date, today);
        Self {
            actual_decision: ActualDecisionView {
                title: decision.title.clone(),
                amount: decision.amount,
                date: decision.date,
                current_value: decision.amount,
            },
            alternative_scenario: AlternativeScenarioView {
                option,
                expected_return,
                projected_value: outcome.projected_value,
            },
            analysis: AnalysisFigures {
                opportunity_cost: outcome.opportunity_cost,
                months_elapsed: outcome.months_elapsed,
                percentage_difference: outcome.percentage_difference,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn counts_calendar_months_not_days() {
        assert_eq!(months_between(date(2024, 1, 31), date(2024, 2, 1)), 1);
        assert_eq!(months_between(date(2023, 11, 1), date(2024, 2, 28)), 3);
        assert_eq!(months_between(date(2024, 6, 15), date(2024, 6, 1)), 0);
        assert_eq!(months_between(date(2025, 3, 1), date(2024, 3, 1)), -12);
    }

    #[test]
    fn zero_return_has_no_opportunity_cost() {
        for today in [date(2020, 1, 1), date(2024, 1, 1), date(2030, 7, 1)] {
            let outcome = analyze_alternative(50_000.0, 0.0, date(2024, 1, 1), today);
            assert_eq!(outcome.opportunity_cost, 0.0);
            assert_eq!(outcome.percentage_difference, 0.0);
        }
    }

    #[test]
    fn compounds_monthly_over_elapsed_months() {
        let outcome = analyze_alternative(100_000.0, 12.0, date(2024, 1, 10), date(2025, 1, 2));
        assert_eq!(outcome.months_elapsed, 12);
        let expected = 100_000.0 * 1.01_f64.powi(12) - 100_000.0;
        assert!((outcome.opportunity_cost - expected).abs() < 1e-6);
        assert!((outcome.percentage_difference - 12.682_503).abs() < 1e-4);
    }

    #[test]
    fn future_decisions_report_negative_cost() {
        let outcome = analyze_alternative(10_000.0, 12.0, date(2026, 1, 1), date(2025, 1, 1));
        assert_eq!(outcome.months_elapsed, -12);
        assert!(outcome.opportunity_cost < 0.0);
        assert!(outcome.projected_value < 10_000.0);
    }
}
