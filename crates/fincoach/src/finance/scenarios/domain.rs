use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::projection::MAX_PROJECTION_YEARS;
use crate::finance::accounts::UserId;
use crate::finance::decisions::domain::non_blank;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub String);

impl ScenarioId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hypothetical parameters layered over the current profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOverrides {
    /// Monthly rent.
    pub new_rent: Option<f64>,
    /// Annual salary; projections divide it by 12.
    pub job_switch_salary: Option<f64>,
    /// Monthly SIP contribution.
    pub sip_investment: Option<f64>,
    /// Yearly expense growth in percent.
    pub expense_growth_rate: Option<f64>,
    pub projection_timeframe: Option<u32>,
    pub one_time_expense: Option<f64>,
}

impl ScenarioOverrides {
    pub fn validate(&self) -> Result<(), String> {
        let amounts = [
            ("newRent", self.new_rent),
            ("jobSwitchSalary", self.job_switch_salary),
            ("sipInvestment", self.sip_investment),
            ("oneTimeExpense", self.one_time_expense),
        ];
        for (field, value) in amounts {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(format!("{field} must be a non-negative amount"));
                }
            }
        }
        if let Some(rate) = self.expense_growth_rate {
            if !rate.is_finite() || rate <= -100.0 {
                return Err("expenseGrowthRate must be a percentage above -100".to_string());
            }
        }
        if let Some(years) = self.projection_timeframe {
            if years > MAX_PROJECTION_YEARS {
                return Err(format!(
                    "projectionTimeframe must be at most {MAX_PROJECTION_YEARS} years"
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioConfig {
    pub id: ScenarioId,
    pub user_id: UserId,
    pub name: String,
    pub new_rent: Option<f64>,
    pub job_switch_salary: Option<f64>,
    pub sip_investment: Option<f64>,
    pub expense_growth_rate: Option<f64>,
    pub projection_timeframe: u32,
    pub one_time_expense: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScenarioConfig {
    pub fn overrides(&self) -> ScenarioOverrides {
        ScenarioOverrides {
            new_rent: self.new_rent,
            job_switch_salary: self.job_switch_salary,
            sip_investment: self.sip_investment,
            expense_growth_rate: self.expense_growth_rate,
            projection_timeframe: Some(self.projection_timeframe),
            one_time_expense: self.one_time_expense,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScenarioRequest {
    pub name: Option<String>,
    pub new_rent: Option<f64>,
    pub job_switch_salary: Option<f64>,
    pub sip_investment: Option<f64>,
    pub expense_growth_rate: Option<f64>,
    pub projection_timeframe: Option<u32>,
    pub one_time_expense: Option<f64>,
}

impl NewScenarioRequest {
    pub fn overrides(&self) -> ScenarioOverrides {
        ScenarioOverrides {
            new_rent: self.new_rent,
            job_switch_salary: self.job_switch_salary,
            sip_investment: self.sip_investment,
            expense_growth_rate: self.expense_growth_rate,
            projection_timeframe: self.projection_timeframe,
            one_time_expense: self.one_time_expense,
        }
    }

    pub fn into_scenario(
        self,
        owner: UserId,
        now: DateTime<Utc>,
    ) -> Result<ScenarioConfig, String> {
        const REQUIRED: &str = "Name and projection timeframe are required";

        let overrides = self.overrides();
        overrides.validate()?;
        let name = non_blank(self.name).ok_or(REQUIRED)?;
        let projection_timeframe = overrides
            .projection_timeframe
            .filter(|years| *years > 0)
            .ok_or(REQUIRED)?;

        Ok(ScenarioConfig {
            id: ScenarioId::generate(),
            user_id: owner,
            name,
            new_rent: overrides.new_rent,
            job_switch_salary: overrides.job_switch_salary,
            sip_investment: overrides.sip_investment,
            expense_growth_rate: overrides.expense_growth_rate,
            projection_timeframe,
            one_time_expense: overrides.one_time_expense,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update. Outer `None` leaves a field untouched; `Some(None)` clears an
/// optional override (sent as JSON `null`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub new_rent: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub job_switch_salary: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub sip_investment: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expense_growth_rate: Option<Option<f64>>,
    #[serde(default)]
    pub projection_timeframe: Option<u32>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub one_time_expense: Option<Option<f64>>,
}

impl ScenarioUpdate {
    /// Update carrying every override the caller supplied to a simulation.
    pub fn from_overrides(overrides: &ScenarioOverrides) -> Self {
        Self {
            name: None,
            new_rent: overrides.new_rent.map(Some),
            job_switch_salary: overrides.job_switch_salary.map(Some),
            sip_investment: overrides.sip_investment.map(Some),
            expense_growth_rate: overrides.expense_growth_rate.map(Some),
            projection_timeframe: overrides.projection_timeframe.filter(|years| *years > 0),
            one_time_expense: overrides.one_time_expense.map(Some),
        }
    }

    pub fn apply(
        self,
        scenario: &mut ScenarioConfig,
        now: DateTime<Utc>,
    ) -> Result<(), String> {
        let mut next = scenario.clone();
        if let Some(name) = self.name {
            next.name = non_blank(Some(name)).ok_or("name must not be blank")?;
        }
        if let Some(years) = self.projection_timeframe {
            if years == 0 {
                return Err("projectionTimeframe must be at least 1 year".to_string());
            }
            next.projection_timeframe = years;
        }
        if let Some(value) = self.new_rent {
            next.new_rent = value;
        }
        if let Some(value) = self.job_switch_salary {
            next.job_switch_salary = value;
        }
        if let Some(value) = self.sip_investment {
            next.sip_investment = value;
        }
        if let Some(value) = self.expense_growth_rate {
            next.expense_growth_rate = value;
        }
        if let Some(value) = self.one_time_expense {
            next.one_time_expense = value;
        }

        next.overrides().validate()?;
        next.updated_at = now;
        *scenario = next;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    pub new_rent: Option<f64>,
    pub job_switch_salary: Option<f64>,
    pub sip_investment: Option<f64>,
    pub expense_growth_rate: Option<f64>,
    pub projection_timeframe: Option<u32>,
    pub one_time_expense: Option<f64>,
    /// Existing scenario to overwrite with these overrides.
    pub scenario_id: Option<String>,
    /// Name for a new scenario saved from these overrides.
    pub save_name: Option<String>,
}

impl SimulateRequest {
    pub fn overrides(&self) -> ScenarioOverrides {
        ScenarioOverrides {
            new_rent: self.new_rent,
            job_switch_salary: self.job_switch_salary,
            sip_investment: self.sip_investment,
            expense_growth_rate: self.expense_growth_rate,
            projection_timeframe: self.projection_timeframe,
            one_time_expense: self.one_time_expense,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioEnvelope {
    pub message: &'static str,
    pub scenario: ScenarioConfig,
}
