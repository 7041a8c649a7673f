use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::finance::accounts::UserId;

/// Monthly money figures a user maintains. Every value is non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFigures {
    pub monthly_salary: f64,
    pub freelance_income: f64,
    pub rent: f64,
    pub utilities: f64,
    pub groceries: f64,
    pub subscriptions: f64,
    pub miscellaneous: f64,
    pub total_debt: f64,
    #[serde(rename = "monthlyEMI")]
    pub monthly_emi: f64,
    pub emergency_fund: f64,
    pub other_savings: f64,
    pub sip_monthly: f64,
    pub lump_sum_investment: f64,
}

impl ProfileFigures {
    pub fn total_income(&self) -> f64 {
        self.monthly_salary + self.freelance_income
    }

    pub fn total_expenses(&self) -> f64 {
        self.rent + self.utilities + self.groceries + self.subscriptions + self.miscellaneous
    }

    /// Rent, utilities and groceries: the spend an emergency fund has to cover.
    pub fn essential_expenses(&self) -> f64 {
        self.rent + self.utilities + self.groceries
    }

    pub fn monthly_surplus(&self) -> f64 {
        self.total_income() - self.total_expenses()
    }

    /// Whole months of essential spend covered by the emergency fund.
    pub fn emergency_fund_coverage(&self) -> u32 {
        let essential = self.essential_expenses();
        if essential > 0.0 {
            (self.emergency_fund / essential).floor() as u32
        } else {
            0
        }
    }

    pub fn debt_free_months(&self) -> u32 {
        if self.monthly_emi > 0.0 {
            (self.total_debt / self.monthly_emi).ceil() as u32
        } else {
            0
        }
    }

    /// Liquid starting point for projections.
    pub fn liquid_net_worth(&self) -> f64 {
        self.emergency_fund + self.other_savings
    }
}

/// Normalized 0-100 health indicators derived from [`ProfileFigures`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScores {
    pub overall_score: u8,
    pub emergency_fund_score: u8,
    pub debt_ratio_score: u8,
    pub investment_allocation_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProfile {
    pub user_id: UserId,
    #[serde(flatten)]
    pub figures: ProfileFigures,
    #[serde(flatten)]
    pub scores: HealthScores,
    pub updated_at: DateTime<Utc>,
}

impl FinancialProfile {
    /// Zeroed profile created alongside a new user.
    pub fn empty(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            figures: ProfileFigures::default(),
            scores: HealthScores::default(),
            updated_at: now,
        }
    }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            profile: self.clone(),
            totals: DerivedTotals::from_figures(&self.figures),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedTotals {
    pub total_income: f64,
    pub total_expenses: f64,
    pub monthly_surplus: f64,
    pub debt_free_months: u32,
    pub emergency_fund_coverage: u32,
}

impl DerivedTotals {
    pub fn from_figures(figures: &ProfileFigures) -> Self {
        Self {
            total_income: figures.total_income(),
            total_expenses: figures.total_expenses(),
            monthly_surplus: figures.monthly_surplus(),
            debt_free_months: figures.debt_free_months(),
            emergency_fund_coverage: figures.emergency_fund_coverage(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    #[serde(flatten)]
    pub profile: FinancialProfile,
    #[serde(flatten)]
    pub totals: DerivedTotals,
}

/// Partial update: `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub monthly_salary: Option<f64>,
    pub freelance_income: Option<f64>,
    pub rent: Option<f64>,
    pub utilities: Option<f64>,
    pub groceries: Option<f64>,
    pub subscriptions: Option<f64>,
    pub miscellaneous: Option<f64>,
    pub total_debt: Option<f64>,
    #[serde(rename = "monthlyEMI")]
    pub monthly_emi: Option<f64>,
    pub emergency_fund: Option<f64>,
    pub other_savings: Option<f64>,
    pub sip_monthly: Option<f64>,
    pub lump_sum_investment: Option<f64>,
}

impl ProfileUpdate {
    fn fields(&self) -> [(&'static str, Option<f64>); 13] {
        [
            ("monthlySalary", self.monthly_salary),
            ("freelanceIncome", self.freelance_income),
            ("rent", self.rent),
            ("utilities", self.utilities),
            ("groceries", self.groceries),
            ("subscriptions", self.subscriptions),
            ("miscellaneous", self.miscellaneous),
            ("totalDebt", self.total_debt),
            ("monthlyEMI", self.monthly_emi),
            ("emergencyFund", self.emergency_fund),
            ("otherSavings", self.other_savings),
            ("sipMonthly", self.sip_monthly),
            ("lumpSumInvestment", self.lump_sum_investment),
        ]
    }

    /// Reject negative or non-finite amounts, naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in self.fields() {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(format!("{field} must be a non-negative amount"));
                }
            }
        }
        Ok(())
    }

    pub fn apply(&self, figures: &mut ProfileFigures) {
        merge(&mut figures.monthly_salary, self.monthly_salary);
        merge(&mut figures.freelance_income, self.freelance_income);
        merge(&mut figures.rent, self.rent);
        merge(&mut figures.utilities, self.utilities);
        merge(&mut figures.groceries, self.groceries);
        merge(&mut figures.subscriptions, self.subscriptions);
        merge(&mut figures.miscellaneous, self.miscellaneous);
        merge(&mut figures.total_debt, self.total_debt);
        merge(&mut figures.monthly_emi, self.monthly_emi);
        merge(&mut figures.emergency_fund, self.emergency_fund);
        merge(&mut figures.other_savings, self.other_savings);
        merge(&mut figures.sip_monthly, self.sip_monthly);
        merge(&mut figures.lump_sum_investment, self.lump_sum_investment);
    }
}

fn merge(slot: &mut f64, value: Option<f64>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateResponse {
    pub message: &'static str,
    pub financial_data: FinancialProfile,
}

/// Frozen copy of a profile for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalSnapshot {
    pub user_id: UserId,
    pub month: NaiveDate,
    #[serde(flatten)]
    pub figures: ProfileFigures,
    pub recorded_at: DateTime<Utc>,
}

impl HistoricalSnapshot {
    pub fn capture(profile: &FinancialProfile, today: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            user_id: profile.user_id.clone(),
            month: month_start(today),
            figures: profile.figures,
            recorded_at: now,
        }
    }
}

/// First day of the calendar month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figures() -> ProfileFigures {
        ProfileFigures {
            monthly_salary: 80_000.0,
            freelance_income: 20_000.0,
            rent: 20_000.0,
            utilities: 5_000.0,
            groceries: 10_000.0,
            subscriptions: 2_000.0,
            miscellaneous: 3_000.0,
            total_debt: 100_000.0,
            monthly_emi: 30_000.0,
            emergency_fund: 120_000.0,
            ..ProfileFigures::default()
        }
    }

    #[test]
    fn derived_totals_follow_figures() {
        let totals = DerivedTotals::from_figures(&figures());
        assert_eq!(totals.total_income, 100_000.0);
        assert_eq!(totals.total_expenses, 40_000.0);
        assert_eq!(totals.monthly_surplus, 60_000.0);
        assert_eq!(totals.debt_free_months, 4);
        assert_eq!(totals.emergency_fund_coverage, 3);
    }

    #[test]
    fn coverage_and_payoff_are_zero_without_denominators() {
        let figures = ProfileFigures {
            emergency_fund: 5_000.0,
            total_debt: 10_000.0,
            ..ProfileFigures::default()
        };
        assert_eq!(figures.emergency_fund_coverage(), 0);
        assert_eq!(figures.debt_free_months(), 0);
    }

    #[test]
    fn update_merges_only_present_fields() {
        let mut stored = figures();
        let update = ProfileUpdate {
            rent: Some(25_000.0),
            sip_monthly: Some(0.0),
            ..ProfileUpdate::default()
        };
        update.apply(&mut stored);

        assert_eq!(stored.rent, 25_000.0);
        assert_eq!(stored.sip_monthly, 0.0);
        assert_eq!(stored.monthly_salary, 80_000.0);
        assert_eq!(stored.monthly_emi, 30_000.0);
    }

    #[test]
    fn update_rejects_negative_amounts() {
        let update = ProfileUpdate {
            monthly_emi: Some(-1.0),
            ..ProfileUpdate::default()
        };
        let message = update.validate().expect_err("negative EMI rejected");
        assert!(message.contains("monthlyEMI"));

        let update = ProfileUpdate {
            rent: Some(f64::NAN),
            ..ProfileUpdate::default()
        };
        assert!(update.validate().is_err());
        assert!(ProfileUpdate::default().validate().is_ok());
    }

    #[test]
    fn update_reads_camel_case_payloads() {
        let update: ProfileUpdate =
            serde_json::from_str(r#"{"monthlySalary": 50000, "monthlyEMI": 1200.5}"#)
                .expect("payload parses");
        assert_eq!(update.monthly_salary, Some(50_000.0));
        assert_eq!(update.monthly_emi, Some(1_200.5));
        assert_eq!(update.rent, None);
    }

    #[test]
    fn snapshots_key_on_first_of_month() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 17).expect("valid date");
        assert_eq!(
            month_start(today),
            NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date")
        );
    }
}
